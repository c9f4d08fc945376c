// Core modules
pub mod config;
pub mod context;
pub mod element;
pub mod error;
pub mod grammar;
pub mod input;
pub mod reference;
pub mod tree;

// Grammar tooling
pub mod indent;
pub mod meta;

// Re-export key types for public API
pub use config::{CursorConfig, DEFAULT_LOOKAHEAD, ParseConfig};
pub use context::ParsingContext;
pub use element::{ElementId, ElementKind, ParsingElement, TokenConfig, WordConfig};
pub use error::{ParsingError, Result};
pub use grammar::Grammar;
pub use input::{Cursor, CursorStatus};
pub use reference::{Cardinality, Reference};
pub use tree::{Match, MatchData, MatchInfo, TokenCaptures};

/// Parses `input` against a grammar declared in the textual definition
/// language (see the `meta` module).
///
/// This is the simplest entry point: one call builds the grammar and runs
/// it over an in-memory string. Reuse the `Grammar` from
/// `meta::grammar_from_source` instead when parsing more than once.
///
/// # Examples
///
/// ```
/// let source = r#"
///     NUMBER := "\d+" ;
///     OP     := "[+*/-]" ;
///     Suffix := OP NUMBER ;
///     Expr   := NUMBER Suffix* ;
///     __axiom__ = Expr ;
/// "#;
///
/// let m = tessera::parse(source, "1+2*3").unwrap().unwrap();
/// assert_eq!(m.length(), 5);
/// ```
pub fn parse(grammar_source: &str, input: &str) -> Result<Option<Match>> {
    let mut grammar = meta::grammar_from_source(grammar_source)?;
    grammar.parse_str(input)
}
