/// References: decorated edges from a composite element to a child.
///
/// A reference wraps an element id with a cardinality and an optional name.
/// The cardinality loop lives here: composites never repeat children
/// themselves, they delegate to `Reference::recognize`, which produces a
/// single match (for `one`/`optional`) or a `next`-linked chain (for the
/// `many` cardinalities).
use crate::context::ParsingContext;
use crate::element::ElementId;
use crate::error::Result;
use crate::grammar::Grammar;
use crate::tree::Match;
use std::fmt;
use std::sync::Arc;

/// How many times a reference's element may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cardinality {
    /// Exactly one match; failure propagates.
    One,
    /// Zero or one match; absence becomes an empty match.
    Optional,
    /// One or more matches; zero propagates failure.
    Many,
    /// Zero or more matches; absence becomes an empty match.
    ManyOptional,
}

impl Cardinality {
    /// The conventional one-character spelling (`1`, `?`, `+`, `*`).
    pub fn symbol(self) -> char {
        match self {
            Cardinality::One => '1',
            Cardinality::Optional => '?',
            Cardinality::Many => '+',
            Cardinality::ManyOptional => '*',
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An edge from a composite element to a child element.
#[derive(Debug, Clone)]
pub struct Reference {
    element: ElementId,
    cardinality: Cardinality,
    name: Option<Arc<str>>,
}

impl Reference {
    /// Wraps `element` with an explicit cardinality.
    pub fn new(element: ElementId, cardinality: Cardinality) -> Self {
        Self {
            element,
            cardinality,
            name: None,
        }
    }

    /// Exactly-one reference, the default.
    pub fn one(element: ElementId) -> Self {
        Self::new(element, Cardinality::One)
    }

    /// Zero-or-one reference.
    pub fn optional(element: ElementId) -> Self {
        Self::new(element, Cardinality::Optional)
    }

    /// One-or-more reference.
    pub fn many(element: ElementId) -> Self {
        Self::new(element, Cardinality::Many)
    }

    /// Zero-or-more reference.
    pub fn many_optional(element: ElementId) -> Self {
        Self::new(element, Cardinality::ManyOptional)
    }

    /// Names the reference so consumer code can look its matches up with
    /// `Match::child_named`.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Applies the cardinality policy around the element's recognition.
    ///
    /// For `many`/`many_optional` the element is recognized repeatedly and
    /// the sub-matches are linked into a `next` chain; the loop ends on the
    /// first failure (the element has already rewound to just after the last
    /// success) or after a single zero-width success, which would otherwise
    /// repeat forever.
    pub(crate) fn recognize(
        &self,
        grammar: &Grammar,
        ctx: &mut ParsingContext<'_>,
    ) -> Result<Option<Box<Match>>> {
        match self.cardinality {
            Cardinality::One | Cardinality::Optional => {
                match grammar.recognize(self.element, ctx)? {
                    Some(m) => Ok(Some(self.stamp(m))),
                    None if self.cardinality == Cardinality::Optional => {
                        Ok(Some(self.stamp(Match::empty(ctx.cursor.offset()))))
                    }
                    None => Ok(None),
                }
            }
            Cardinality::Many | Cardinality::ManyOptional => {
                let mut matches: Vec<Box<Match>> = Vec::new();
                loop {
                    match grammar.recognize(self.element, ctx)? {
                        Some(m) => {
                            let zero_width = m.length() == 0;
                            matches.push(self.stamp(m));
                            if zero_width {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                if matches.is_empty() {
                    if self.cardinality == Cardinality::ManyOptional {
                        Ok(Some(self.stamp(Match::empty(ctx.cursor.offset()))))
                    } else {
                        Ok(None)
                    }
                } else {
                    Ok(Some(link_chain(matches)))
                }
            }
        }
    }

    fn stamp(&self, mut m: Box<Match>) -> Box<Match> {
        if let Some(name) = &self.name {
            m.set_name(name.clone());
        }
        m
    }
}

impl From<ElementId> for Reference {
    fn from(element: ElementId) -> Self {
        Reference::one(element)
    }
}

/// Links fresh single-node matches into a `next` chain, front to back.
fn link_chain(matches: Vec<Box<Match>>) -> Box<Match> {
    let mut head: Option<Box<Match>> = None;
    for mut m in matches.into_iter().rev() {
        m.set_next(head.take());
        head = Some(m);
    }
    head.expect("chain is never empty")
}
