/// The match tree produced by recognition.
///
/// A `Match` records where a parsing element succeeded and links to the
/// matches around it: `child` points at the first sub-match of a composite,
/// `next` at the following sibling (also used to chain repetitions produced
/// under a `many`/`many_optional` reference). Recognition failure is not a
/// `Match`; it is the `None` arm of the recognition result, so no sentinel
/// value exists to allocate or free.
use crate::element::ElementId;
use std::fmt::Write as _;
use std::sync::Arc;

/// Variant-specific payload carried by a match.
#[derive(Debug, Clone, Default)]
pub enum MatchData {
    /// No payload (composites, predicates, empty matches).
    #[default]
    None,
    /// The literal recognized by a word element.
    Word(Arc<str>),
    /// The capture groups recognized by a token element.
    Token(TokenCaptures),
}

/// Capture groups copied out of the input buffer by a token match.
/// Group 0 is the whole match.
#[derive(Debug, Clone, Default)]
pub struct TokenCaptures {
    groups: Vec<Option<Vec<u8>>>,
}

impl TokenCaptures {
    pub(crate) fn new(groups: Vec<Option<Vec<u8>>>) -> Self {
        Self { groups }
    }

    /// Number of groups, including group 0.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The bytes of group `index`, or `None` when the group is out of range
    /// or did not participate in the match.
    pub fn group(&self, index: usize) -> Option<&[u8]> {
        self.groups.get(index)?.as_deref()
    }

    /// The bytes of group `index` as UTF-8 text, when valid.
    pub fn group_str(&self, index: usize) -> Option<&str> {
        std::str::from_utf8(self.group(index)?).ok()
    }
}

/// Flat summary of a match node, convenient for reporting and serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchInfo {
    pub offset: usize,
    pub length: usize,
    pub element: Option<ElementId>,
    pub name: Option<String>,
}

/// One node of the match tree.
#[derive(Debug, Clone)]
pub struct Match {
    offset: usize,
    length: usize,
    element: Option<ElementId>,
    name: Option<Arc<str>>,
    data: MatchData,
    child: Option<Box<Match>>,
    next: Option<Box<Match>>,
}

impl Match {
    fn node(offset: usize, length: usize, element: Option<ElementId>, data: MatchData) -> Box<Match> {
        Box::new(Match {
            offset,
            length,
            element,
            name: None,
            data,
            child: None,
            next: None,
        })
    }

    /// A successful match of `length` bytes produced by `element`.
    pub(crate) fn success(offset: usize, length: usize, element: ElementId) -> Box<Match> {
        Self::node(offset, length, Some(element), MatchData::None)
    }

    /// A successful match carrying a data payload.
    pub(crate) fn with_data(
        offset: usize,
        length: usize,
        element: ElementId,
        data: MatchData,
    ) -> Box<Match> {
        Self::node(offset, length, Some(element), data)
    }

    /// A zero-width success produced by a procedure or condition element.
    pub(crate) fn zero_width(offset: usize, element: ElementId) -> Box<Match> {
        Self::node(offset, 0, Some(element), MatchData::None)
    }

    /// The empty match: a success of length zero with no producing element,
    /// standing in for an absent `optional`/`many_optional` repetition.
    pub(crate) fn empty(offset: usize) -> Box<Match> {
        Self::node(offset, 0, None, MatchData::None)
    }

    /// Absolute input offset where recognition began.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of input bytes consumed by this node (excluding siblings).
    pub fn length(&self) -> usize {
        self.length
    }

    /// The producing element, absent for empty matches.
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// The name of the reference this match was produced under, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The variant payload.
    pub fn data(&self) -> &MatchData {
        &self.data
    }

    /// First sub-match of a composite.
    pub fn child(&self) -> Option<&Match> {
        self.child.as_deref()
    }

    /// Next sibling in the parent's chain.
    pub fn next(&self) -> Option<&Match> {
        self.next.as_deref()
    }

    /// True for the empty match (zero length, no producing element).
    pub fn is_empty(&self) -> bool {
        self.length == 0 && self.element.is_none()
    }

    /// Shortcut to a token match's `index`-th capture group.
    pub fn capture_group(&self, index: usize) -> Option<&[u8]> {
        match &self.data {
            MatchData::Token(captures) => captures.group(index),
            _ => None,
        }
    }

    /// Iterates the sub-matches of this node, following `child` then `next`.
    pub fn children(&self) -> Children<'_> {
        Children {
            current: self.child.as_deref(),
        }
    }

    /// Finds the first sub-match produced under a reference named `name`.
    pub fn child_named(&self, name: &str) -> Option<&Match> {
        self.children().find(|m| m.name() == Some(name))
    }

    /// Flat summary of this node.
    pub fn info(&self) -> MatchInfo {
        MatchInfo {
            offset: self.offset,
            length: self.length,
            element: self.element,
            name: self.name().map(str::to_string),
        }
    }

    /// Walks the tree in pre-order, calling `callback` with each node and
    /// its step index. The callback returns `false` to stop the walk early.
    /// Returns the number of nodes visited.
    pub fn walk<F>(&self, callback: &mut F) -> usize
    where
        F: FnMut(&Match, usize) -> bool,
    {
        let mut step = 0;
        self.walk_pre(callback, &mut step);
        step
    }

    // Sibling chains are unbounded (one node per repetition), so the walk
    // loops over `next` and only recurses into `child`, whose depth the
    // recognition depth guard already bounds.
    fn walk_pre<F>(&self, callback: &mut F, step: &mut usize) -> bool
    where
        F: FnMut(&Match, usize) -> bool,
    {
        let mut node = self;
        loop {
            if !callback(node, *step) {
                return false;
            }
            *step += 1;
            if let Some(child) = node.child.as_deref()
                && !child.walk_pre(callback, step)
            {
                return false;
            }
            match node.next.as_deref() {
                Some(next) => node = next,
                None => return true,
            }
        }
    }

    /// Walks the tree in post-order (children before their parent), the
    /// order in which user actions are applied after a parse.
    pub fn walk_post<F>(&self, callback: &mut F) -> usize
    where
        F: FnMut(&Match, usize) -> bool,
    {
        let mut step = 0;
        self.walk_post_inner(callback, &mut step);
        step
    }

    fn walk_post_inner<F>(&self, callback: &mut F, step: &mut usize) -> bool
    where
        F: FnMut(&Match, usize) -> bool,
    {
        let mut node = self;
        loop {
            if let Some(child) = node.child.as_deref()
                && !child.walk_post_inner(callback, step)
            {
                return false;
            }
            if !callback(node, *step) {
                return false;
            }
            *step += 1;
            match node.next.as_deref() {
                Some(next) => node = next,
                None => return true,
            }
        }
    }

    /// Renders an indented debug view of the tree.
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        let label = match (self.name(), self.element) {
            (Some(name), _) => name.to_string(),
            (None, Some(id)) => format!("#{}", id.index()),
            (None, None) => "(empty)".to_string(),
        };
        let _ = writeln!(
            out,
            "{:indent$}{} @{}+{}",
            "",
            label,
            self.offset,
            self.length,
            indent = depth * 2
        );
        for child in self.children() {
            child.write_tree(out, depth + 1);
        }
    }

    pub(crate) fn set_name(&mut self, name: Arc<str>) {
        self.name = Some(name);
    }

    pub(crate) fn set_child(&mut self, child: Box<Match>) {
        self.child = Some(child);
    }

    pub(crate) fn set_next(&mut self, next: Option<Box<Match>>) {
        self.next = next;
    }

    /// Attaches `sibling` at the end of this node's `next` chain.
    pub(crate) fn append_sibling(&mut self, sibling: Box<Match>) {
        let mut tail = self;
        while tail.next.is_some() {
            tail = tail.next.as_deref_mut().unwrap();
        }
        tail.next = Some(sibling);
    }
}

// Sibling chains can grow as long as the input (one node per repetition),
// so they are unlinked iteratively instead of recursing through Box drops.
impl Drop for Match {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

/// Iterator over a composite match's sub-matches.
pub struct Children<'a> {
    current: Option<&'a Match>,
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Match;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next();
        Some(node)
    }
}
