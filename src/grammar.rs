/// The grammar: an arena-owned graph of parsing elements.
///
/// Elements live in a registry vector and are addressed by `ElementId`;
/// references between them carry ids rather than owning pointers, so
/// sub-grammars can be shared between parents and recursion (direct or
/// mutual) is ordinary. The grammar is built incrementally, prepared once
/// (breadth-first id assignment), and can then be reused, and even mutated
/// between runs, for any number of parses.
use crate::context::ParsingContext;
use crate::element::{predicate, ElementKind, ParsingElement};
use crate::element::{group, rule, token, word};
use crate::element::{ElementId, TokenConfig, WordConfig};
use crate::error::{ParsingError, Result};
use crate::input::Cursor;
use crate::reference::Reference;
use crate::tree::Match;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;

/// A grammar: the element registry plus its axiom and optional skip element.
///
/// ```
/// use tessera::{Grammar, Reference};
///
/// # fn main() -> tessera::Result<()> {
/// let mut g = Grammar::new();
/// let number = g.token(r"\d+")?;
/// let op = g.token(r"[+*/-]")?;
/// let suffix = g.rule([Reference::one(op), Reference::one(number)]);
/// let expr = g.rule([Reference::one(number), Reference::many_optional(suffix)]);
/// g.set_axiom(expr);
///
/// let m = g.parse_str("1+2*3")?.expect("expression matches");
/// assert_eq!(m.length(), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct Grammar {
    elements: Vec<ParsingElement>,
    symbols: HashMap<Arc<str>, ElementId>,
    axiom: Option<ElementId>,
    skip: Option<ElementId>,
    prepared: bool,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: ElementKind) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(ParsingElement::new(kind));
        self.prepared = false;
        id
    }

    /// Creates a word element matching `literal`.
    pub fn word(&mut self, literal: &str) -> ElementId {
        self.push(ElementKind::Word(WordConfig::new(literal)))
    }

    /// Creates a token element from `pattern`, compiled eagerly; a malformed
    /// pattern is reported here, not at parse time.
    pub fn token(&mut self, pattern: &str) -> Result<ElementId> {
        Ok(self.push(ElementKind::Token(TokenConfig::compile(pattern)?)))
    }

    /// Creates a group (ordered choice) element.
    pub fn group<I, R>(&mut self, children: I) -> ElementId
    where
        I: IntoIterator<Item = R>,
        R: Into<Reference>,
    {
        let children = children.into_iter().map(Into::into).collect();
        self.push(ElementKind::Group(children))
    }

    /// Creates a rule (concatenation) element.
    pub fn rule<I, R>(&mut self, children: I) -> ElementId
    where
        I: IntoIterator<Item = R>,
        R: Into<Reference>,
    {
        let children = children.into_iter().map(Into::into).collect();
        self.push(ElementKind::Rule(children))
    }

    /// Creates a zero-width procedure element around `callback`.
    pub fn procedure<F>(&mut self, callback: F) -> ElementId
    where
        F: Fn(&mut ParsingContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.push(ElementKind::Procedure(Box::new(callback)))
    }

    /// Creates a zero-width condition element around `callback`.
    pub fn condition<F>(&mut self, callback: F) -> ElementId
    where
        F: Fn(&mut ParsingContext<'_>) -> Result<bool> + Send + Sync + 'static,
    {
        self.push(ElementKind::Condition(Box::new(callback)))
    }

    /// Names an element (for debugging and the symbol table), returning the
    /// id transparently so calls can be chained through construction.
    pub fn name(&mut self, id: ElementId, name: &str) -> ElementId {
        let name: Arc<str> = Arc::from(name);
        self.elements[id.0].name = Some(name.clone());
        self.symbols.insert(name, id);
        id
    }

    /// Attaches a post-parse action to an element, applied to its matches by
    /// `process`. Returns the id transparently.
    pub fn action<F>(&mut self, id: ElementId, callback: F) -> ElementId
    where
        F: Fn(&Match, &mut ParsingContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.elements[id.0].action = Some(Box::new(callback));
        id
    }

    /// Looks up an element id by the name given to `name`.
    pub fn symbol(&self, name: &str) -> Option<ElementId> {
        self.symbols.get(name).copied()
    }

    /// The element behind `id`.
    pub fn element(&self, id: ElementId) -> &ParsingElement {
        &self.elements[id.0]
    }

    /// Iterates every element in the registry, reachable or not.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ParsingElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId(index), element))
    }

    /// Number of elements in the registry.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Sets the root element recognition starts from.
    pub fn set_axiom(&mut self, id: ElementId) {
        self.axiom = Some(id);
        self.prepared = false;
    }

    pub fn axiom(&self) -> Option<ElementId> {
        self.axiom
    }

    /// Sets the element applied between rule children to consume
    /// insignificant input (whitespace, comments).
    pub fn set_skip(&mut self, id: ElementId) {
        self.skip = Some(id);
        self.prepared = false;
    }

    pub fn skip(&self) -> Option<ElementId> {
        self.skip
    }

    /// Appends a child reference to a composite element. Fails on leaves.
    pub fn add_child(&mut self, parent: ElementId, reference: impl Into<Reference>) -> Result<()> {
        let reference = reference.into();
        let tag = self.elements[parent.0].kind().tag();
        match self.elements[parent.0].children_mut() {
            Some(children) => {
                children.push(reference);
                self.prepared = false;
                Ok(())
            }
            None => Err(ParsingError::grammar(format!(
                "cannot add a child to {} element {}",
                tag, parent
            ))),
        }
    }

    /// Replaces the children of a composite element. This is the dynamic
    /// update primitive: a rule can be redefined between parse runs, and it
    /// is also how recursive grammars close the loop over a placeholder
    /// created with `rule([])`.
    pub fn set_children<I, R>(&mut self, parent: ElementId, children: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: Into<Reference>,
    {
        let tag = self.elements[parent.0].kind().tag();
        let replacement: Vec<Reference> = children.into_iter().map(Into::into).collect();
        match self.elements[parent.0].children_mut() {
            Some(slot) => {
                *slot = replacement;
                self.prepared = false;
                Ok(())
            }
            None => Err(ParsingError::grammar(format!(
                "cannot set children on {} element {}",
                tag, parent
            ))),
        }
    }

    /// True once `prepare` has run and no mutation has happened since.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Assigns breadth-first ids starting from the axiom: each reachable
    /// element is visited exactly once (cycles are expected), numbered by
    /// its distance-ordered discovery. A skip element that is not reachable
    /// from the axiom continues the same sequence. Ids are stable until the
    /// grammar is mutated and re-prepared.
    pub fn prepare(&mut self) {
        for element in &mut self.elements {
            element.id = None;
        }
        let mut next_id = 0;
        let mut visited = vec![false; self.elements.len()];
        let mut queue = VecDeque::new();
        for root in [self.axiom, self.skip].into_iter().flatten() {
            if visited[root.0] {
                continue;
            }
            visited[root.0] = true;
            queue.push_back(root);
            while let Some(id) = queue.pop_front() {
                self.elements[id.0].id = Some(next_id);
                next_id += 1;
                let children: Vec<ElementId> = self.elements[id.0]
                    .children()
                    .map(|refs| refs.iter().map(Reference::element).collect())
                    .unwrap_or_default();
                for child in children {
                    if !visited[child.0] {
                        visited[child.0] = true;
                        queue.push_back(child);
                    }
                }
            }
        }
        self.prepared = true;
    }

    fn ensure_prepared(&mut self) {
        if !self.prepared {
            self.prepare();
        }
    }

    /// Recognizes `id` at the cursor's current position.
    ///
    /// Returns `Ok(Some(_))` with the cursor advanced past the match,
    /// `Ok(None)` with the cursor restored to where it was (the rewind
    /// contract every composite relies on), or `Err` when a callback or the
    /// input aborts the run.
    pub fn recognize(
        &self,
        id: ElementId,
        ctx: &mut ParsingContext<'_>,
    ) -> Result<Option<Box<Match>>> {
        ctx.enter()?;
        let element = self.element(id);
        let result = match &element.kind {
            ElementKind::Word(config) => word::recognize(config, id, ctx),
            ElementKind::Token(config) => token::recognize(config, id, ctx),
            ElementKind::Group(children) => group::recognize(self, children, id, ctx),
            ElementKind::Rule(children) => rule::recognize(self, children, id, ctx),
            ElementKind::Procedure(callback) => predicate::recognize_procedure(callback, id, ctx),
            ElementKind::Condition(callback) => predicate::recognize_condition(callback, id, ctx),
        };
        ctx.leave();
        result
    }

    /// Runs the skip element at the cursor with `many_optional` semantics,
    /// discarding whatever it matches. The `in_skip` flag keeps the skip
    /// element from eliding inside itself.
    pub(crate) fn apply_skip(&self, ctx: &mut ParsingContext<'_>) -> Result<()> {
        let Some(skip) = self.skip else {
            return Ok(());
        };
        if ctx.in_skip {
            return Ok(());
        }
        ctx.in_skip = true;
        let result = self.consume_skip(skip, ctx);
        ctx.in_skip = false;
        result
    }

    fn consume_skip(&self, skip: ElementId, ctx: &mut ParsingContext<'_>) -> Result<()> {
        loop {
            match self.recognize(skip, ctx)? {
                Some(m) if m.length() > 0 => continue,
                _ => return Ok(()),
            }
        }
    }

    /// Parses with an existing context, recognizing the axiom at the
    /// cursor's current position. The grammar must have been prepared.
    /// `Ok(None)` is the non-exceptional "axiom did not match" outcome.
    pub fn parse_with(&self, ctx: &mut ParsingContext<'_>) -> Result<Option<Match>> {
        let axiom = self
            .axiom
            .ok_or_else(|| ParsingError::grammar("grammar has no axiom"))?;
        if !self.prepared {
            return Err(ParsingError::grammar(
                "grammar must be prepared before parsing",
            ));
        }
        Ok(self.recognize(axiom, ctx)?.map(|m| *m))
    }

    /// Parses input from a cursor, preparing the grammar first if needed.
    /// The cursor is borrowed, so the caller can inspect its position
    /// afterwards; on failure it is left where the parse began.
    pub fn parse_from_cursor(&mut self, cursor: &mut Cursor) -> Result<Option<Match>> {
        self.ensure_prepared();
        let grammar: &Grammar = self;
        let mut ctx = ParsingContext::new(grammar, cursor);
        grammar.parse_with(&mut ctx)
    }

    /// Parses the file at `path`.
    pub fn parse_from_path(&mut self, path: impl AsRef<Path>) -> Result<Option<Match>> {
        let mut cursor = Cursor::from_path(path)?;
        self.parse_from_cursor(&mut cursor)
    }

    /// Parses an in-memory string.
    pub fn parse_str(&mut self, input: &str) -> Result<Option<Match>> {
        let mut cursor = Cursor::from_text(input);
        self.parse_from_cursor(&mut cursor)
    }

    /// Parses in-memory bytes.
    pub fn parse_bytes(&mut self, input: impl Into<Vec<u8>>) -> Result<Option<Match>> {
        let mut cursor = Cursor::from_bytes(input);
        self.parse_from_cursor(&mut cursor)
    }

    /// Applies element actions over a finished match tree in post-order
    /// (children before parents, siblings left to right). Returns the
    /// number of nodes visited.
    pub fn process(&self, root: &Match, ctx: &mut ParsingContext<'_>) -> Result<usize> {
        let mut steps = 0;
        self.process_inner(root, ctx, &mut steps)?;
        Ok(steps)
    }

    // Like the match walkers, this loops over the unbounded `next` chain and
    // only recurses into `child`.
    fn process_inner(
        &self,
        m: &Match,
        ctx: &mut ParsingContext<'_>,
        steps: &mut usize,
    ) -> Result<()> {
        let mut node = m;
        loop {
            if let Some(child) = node.child() {
                self.process_inner(child, ctx, steps)?;
            }
            if let Some(id) = node.element()
                && let Some(action) = self.element(id).action()
            {
                action(node, ctx)?;
            }
            *steps += 1;
            match node.next() {
                Some(next) => node = next,
                None => return Ok(()),
            }
        }
    }

    /// Walks the element graph depth-first from the axiom, visiting each
    /// reachable element once. The callback returns `false` to stop early;
    /// the return value is the number of elements visited.
    pub fn walk_elements<F>(&self, callback: &mut F) -> usize
    where
        F: FnMut(ElementId, &ParsingElement, usize) -> bool,
    {
        let mut visited = HashSet::new();
        let mut step = 0;
        if let Some(axiom) = self.axiom {
            self.walk_element(axiom, callback, &mut visited, &mut step);
        }
        step
    }

    fn walk_element<F>(
        &self,
        id: ElementId,
        callback: &mut F,
        visited: &mut HashSet<usize>,
        step: &mut usize,
    ) -> bool
    where
        F: FnMut(ElementId, &ParsingElement, usize) -> bool,
    {
        if !visited.insert(id.0) {
            return true;
        }
        let element = self.element(id);
        if !callback(id, element, *step) {
            return false;
        }
        *step += 1;
        if let Some(children) = element.children() {
            for reference in children {
                if !self.walk_element(reference.element(), callback, visited, step) {
                    return false;
                }
            }
        }
        true
    }
}
