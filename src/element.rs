/// Parsing elements: the polymorphic recognizers a grammar is made of.
///
/// An element is a tagged configuration; recognition dispatches on the
/// `ElementKind` sum in one place (`Grammar::recognize`). Composite elements
/// (`Group`, `Rule`) hold their children as ordered `Reference` edges that
/// carry element ids, never owning pointers, so elements can be shared
/// between parents and grammars can be cyclic.
use crate::context::ParsingContext;
use crate::error::Result;
use crate::reference::Reference;
use crate::tree::Match;
use std::fmt;
use std::sync::Arc;

pub(crate) mod group;
pub(crate) mod predicate;
pub(crate) mod rule;
pub(crate) mod token;
pub(crate) mod word;

pub use token::TokenConfig;
pub use word::WordConfig;

/// Handle to an element inside its grammar's registry. Ids are only
/// meaningful with the grammar that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Position of the element in the grammar's registry.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callback run by a procedure element. Always succeeds unless it returns an
/// error, which aborts the parse.
pub type ProcedureFn = Box<dyn Fn(&mut ParsingContext<'_>) -> Result<()> + Send + Sync>;

/// Callback run by a condition element. `Ok(false)` is a plain recognition
/// failure; `Err` aborts the parse.
pub type ConditionFn = Box<dyn Fn(&mut ParsingContext<'_>) -> Result<bool> + Send + Sync>;

/// Post-parse action attached to an element, applied to its matches in
/// post-order by `Grammar::process`.
pub type ActionFn = Box<dyn Fn(&Match, &mut ParsingContext<'_>) -> Result<()> + Send + Sync>;

/// The six element variants.
pub enum ElementKind {
    /// A literal byte string.
    Word(WordConfig),
    /// An anchored regular expression.
    Token(TokenConfig),
    /// Ordered choice between child references.
    Group(Vec<Reference>),
    /// Concatenation of child references.
    Rule(Vec<Reference>),
    /// Zero-width side effect.
    Procedure(ProcedureFn),
    /// Zero-width predicate.
    Condition(ConditionFn),
}

impl ElementKind {
    /// Short tag used in debug output and error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Word(_) => "word",
            ElementKind::Token(_) => "token",
            ElementKind::Group(_) => "group",
            ElementKind::Rule(_) => "rule",
            ElementKind::Procedure(_) => "procedure",
            ElementKind::Condition(_) => "condition",
        }
    }
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Word(config) => f.debug_tuple("Word").field(config).finish(),
            ElementKind::Token(config) => f.debug_tuple("Token").field(config).finish(),
            ElementKind::Group(children) => f.debug_tuple("Group").field(children).finish(),
            ElementKind::Rule(children) => f.debug_tuple("Rule").field(children).finish(),
            ElementKind::Procedure(_) => f.write_str("Procedure(..)"),
            ElementKind::Condition(_) => f.write_str("Condition(..)"),
        }
    }
}

/// One node of the grammar's element graph.
pub struct ParsingElement {
    pub(crate) id: Option<usize>,
    pub(crate) name: Option<Arc<str>>,
    pub(crate) kind: ElementKind,
    pub(crate) action: Option<ActionFn>,
}

impl ParsingElement {
    pub(crate) fn new(kind: ElementKind) -> Self {
        Self {
            id: None,
            name: None,
            kind,
            action: None,
        }
    }

    /// Breadth-first id assigned by `Grammar::prepare`, `None` before the
    /// grammar has been prepared.
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    /// Debug name set through `Grammar::name`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// True for the composite variants (`Group`, `Rule`).
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, ElementKind::Group(_) | ElementKind::Rule(_))
    }

    /// Child references of a composite, `None` for leaves and predicates.
    pub fn children(&self) -> Option<&[Reference]> {
        match &self.kind {
            ElementKind::Group(children) | ElementKind::Rule(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Reference>> {
        match &mut self.kind {
            ElementKind::Group(children) | ElementKind::Rule(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn action(&self) -> Option<&ActionFn> {
        self.action.as_ref()
    }
}

impl fmt::Debug for ParsingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsingElement")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}
