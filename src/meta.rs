/// Textual grammar definitions.
///
/// Grammars can be declared as text instead of through the builder API:
///
/// ```text
/// SPACE   := "\s+" ;
/// NUMBER  := "-?\d+" ;
/// NAME    := "[a-zA-Z][\w-]*" ;
/// Atom    := NAME | NUMBER ;
/// Items   := Value Items? ;
/// List    := '(' Items? ')' ;
/// Value   := List | Atom ;
/// __axiom__ = Value ;
/// __skip__  = SPACE ;
/// ```
///
/// Double quotes declare a token (the content is a regex, passed through
/// verbatim except for `\"`), single quotes a word, bare identifiers are
/// references to other definitions, parentheses build anonymous sub-elements
/// and a postfix `?`, `*` or `+` sets the reference cardinality. A body that
/// is a `|`-alternation becomes a group, any other body a rule; a body that
/// is a single quoted literal becomes the word or token itself. `#` starts
/// a line comment.
///
/// Definitions may reference each other in any order, recursively; the
/// builder resolves forward references with a first pass that registers
/// every name before bodies are filled in.
use crate::element::ElementId;
use crate::error::{ParsingError, Result};
use crate::grammar::Grammar;
use crate::reference::{Cardinality, Reference};

use nom::Err as NomErr;
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, multispace1, not_line_ending, satisfy};
use nom::combinator::{map, opt, recognize, value};
use nom::error::ErrorKind;
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{pair, preceded, tuple};

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Definition { name: String, body: Body },
    Axiom(String),
    Skip(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Body {
    alternatives: Vec<Vec<Term>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Term {
    primary: Primary,
    cardinality: Cardinality,
}

#[derive(Debug, Clone, PartialEq)]
enum Primary {
    Word(String),
    Token(String),
    Symbol(String),
    Group(Body),
}

fn nom_error(input: &str) -> NomErr<nom::error::Error<&str>> {
    NomErr::Error(nom::error::Error::new(input, ErrorKind::Tag))
}

/// Eats whitespace and `#` line comments.
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(char('#'), not_line_ending)),
        ))),
    )(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// A single-quoted word literal; every `\x` escape collapses to `x`.
fn word_literal(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    if !matches!(chars.next(), Some((_, '\''))) {
        return Err(nom_error(input));
    }
    let mut literal = String::new();
    let mut escaped = false;
    for (index, c) in chars {
        if escaped {
            literal.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '\'' {
            return Ok((&input[index + 1..], literal));
        } else {
            literal.push(c);
        }
    }
    Err(nom_error(input))
}

/// A double-quoted token pattern. The content is a regex, so backslash
/// escapes pass through untouched; only `\"` is unescaped.
fn token_pattern(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    if !matches!(chars.next(), Some((_, '"'))) {
        return Err(nom_error(input));
    }
    let mut pattern = String::new();
    let mut escaped = false;
    for (index, c) in chars {
        if escaped {
            if c != '"' {
                pattern.push('\\');
            }
            pattern.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((&input[index + 1..], pattern));
        } else {
            pattern.push(c);
        }
    }
    Err(nom_error(input))
}

fn cardinality(input: &str) -> IResult<&str, Cardinality> {
    map(
        opt(alt((
            value(Cardinality::Optional, char('?')),
            value(Cardinality::ManyOptional, char('*')),
            value(Cardinality::Many, char('+')),
        ))),
        |c| c.unwrap_or(Cardinality::One),
    )(input)
}

fn primary(input: &str) -> IResult<&str, Primary> {
    alt((
        map(token_pattern, Primary::Token),
        map(word_literal, Primary::Word),
        map(
            tuple((char('('), body, ws, char(')'))),
            |(_, inner, _, _)| Primary::Group(inner),
        ),
        map(identifier, |name: &str| Primary::Symbol(name.to_string())),
    ))(input)
}

fn term(input: &str) -> IResult<&str, Term> {
    map(pair(primary, cardinality), |(primary, cardinality)| Term {
        primary,
        cardinality,
    })(input)
}

fn sequence(input: &str) -> IResult<&str, Vec<Term>> {
    many1(preceded(ws, term))(input)
}

fn body(input: &str) -> IResult<&str, Body> {
    map(
        separated_list1(preceded(ws, char('|')), sequence),
        |alternatives| Body { alternatives },
    )(input)
}

fn definition(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((identifier, ws, tag(":="), body, ws, char(';'))),
        |(name, _, _, body, _, _)| Statement::Definition {
            name: name.to_string(),
            body,
        },
    )(input)
}

fn axiom_directive(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((tag("__axiom__"), ws, char('='), ws, identifier, ws, char(';'))),
        |(_, _, _, _, name, _, _)| Statement::Axiom(name.to_string()),
    )(input)
}

fn skip_directive(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((tag("__skip__"), ws, char('='), ws, identifier, ws, char(';'))),
        |(_, _, _, _, name, _, _)| Statement::Skip(name.to_string()),
    )(input)
}

fn statement(input: &str) -> IResult<&str, Statement> {
    alt((axiom_directive, skip_directive, definition))(input)
}

fn parse_source(source: &str) -> Result<Vec<Statement>> {
    let mut rest = source;
    let mut statements = Vec::new();
    loop {
        if let Ok((after, ())) = ws(rest) {
            rest = after;
        }
        if rest.is_empty() {
            break;
        }
        match statement(rest) {
            Ok((after, parsed)) => {
                statements.push(parsed);
                rest = after;
            }
            Err(_) => {
                return Err(ParsingError::grammar(format!(
                    "syntax error in grammar definition at byte {}",
                    source.len() - rest.len()
                )));
            }
        }
    }
    Ok(statements)
}

/// A body that is exactly one unquantified word or token literal; such a
/// definition becomes the leaf element itself rather than a wrapper rule.
fn leaf_primary(body: &Body) -> Option<&Primary> {
    let [sequence] = body.alternatives.as_slice() else {
        return None;
    };
    let [term] = sequence.as_slice() else {
        return None;
    };
    if term.cardinality != Cardinality::One {
        return None;
    }
    match &term.primary {
        leaf @ (Primary::Word(_) | Primary::Token(_)) => Some(leaf),
        _ => None,
    }
}

fn term_to_reference(grammar: &mut Grammar, term: &Term) -> Result<Reference> {
    let element = match &term.primary {
        Primary::Word(literal) => grammar.word(literal),
        Primary::Token(pattern) => grammar.token(pattern)?,
        Primary::Symbol(name) => grammar.symbol(name).ok_or_else(|| {
            ParsingError::grammar(format!("reference to undefined symbol `{}`", name))
        })?,
        Primary::Group(inner) => build_anonymous(grammar, inner)?,
    };
    Ok(Reference::new(element, term.cardinality))
}

fn alternative_to_reference(grammar: &mut Grammar, sequence: &[Term]) -> Result<Reference> {
    if let [term] = sequence {
        term_to_reference(grammar, term)
    } else {
        let references: Vec<Reference> = sequence
            .iter()
            .map(|term| term_to_reference(grammar, term))
            .collect::<Result<_>>()?;
        Ok(Reference::one(grammar.rule(references)))
    }
}

fn body_to_references(grammar: &mut Grammar, body: &Body) -> Result<Vec<Reference>> {
    if let [sequence] = body.alternatives.as_slice() {
        sequence
            .iter()
            .map(|term| term_to_reference(grammar, term))
            .collect()
    } else {
        body.alternatives
            .iter()
            .map(|sequence| alternative_to_reference(grammar, sequence))
            .collect()
    }
}

/// Builds an anonymous element for a parenthesized sub-body.
fn build_anonymous(grammar: &mut Grammar, body: &Body) -> Result<ElementId> {
    let references = body_to_references(grammar, body)?;
    if body.alternatives.len() > 1 {
        Ok(grammar.group(references))
    } else {
        Ok(grammar.rule(references))
    }
}

fn resolve(grammar: &Grammar, name: &str) -> Result<ElementId> {
    grammar
        .symbol(name)
        .ok_or_else(|| ParsingError::grammar(format!("directive names undefined symbol `{}`", name)))
}

/// Builds a prepared grammar from a textual definition.
pub fn grammar_from_source(source: &str) -> Result<Grammar> {
    let statements = parse_source(source)?;
    let mut grammar = Grammar::new();

    // First pass: register every defined name so bodies can reference
    // definitions in any order. Leaf definitions become their element
    // directly; composite ones get an empty placeholder of the right kind.
    for statement in &statements {
        if let Statement::Definition { name, body } = statement {
            if grammar.symbol(name).is_some() {
                return Err(ParsingError::grammar(format!(
                    "duplicate definition of `{}`",
                    name
                )));
            }
            let id = match leaf_primary(body) {
                Some(Primary::Token(pattern)) => grammar.token(pattern)?,
                Some(Primary::Word(literal)) => grammar.word(literal),
                _ if body.alternatives.len() > 1 => grammar.group(Vec::<Reference>::new()),
                _ => grammar.rule(Vec::<Reference>::new()),
            };
            grammar.name(id, name);
        }
    }

    // Second pass: fill composite bodies and apply directives.
    for statement in &statements {
        match statement {
            Statement::Definition { name, body } => {
                if leaf_primary(body).is_some() {
                    continue;
                }
                let Some(id) = grammar.symbol(name) else {
                    continue;
                };
                let references = body_to_references(&mut grammar, body)?;
                grammar.set_children(id, references)?;
            }
            Statement::Axiom(name) => {
                let id = resolve(&grammar, name)?;
                grammar.set_axiom(id);
            }
            Statement::Skip(name) => {
                let id = resolve(&grammar, name)?;
                grammar.set_skip(id);
            }
        }
    }

    if grammar.axiom().is_none() {
        return Err(ParsingError::grammar("grammar defines no __axiom__"));
    }
    grammar.prepare();
    Ok(grammar)
}
