/// Group elements: ordered choice.
///
/// Children are tried in declaration order; the first reference that
/// recognizes wins and becomes the group match's child. Each child rewinds
/// the cursor itself on failure, so the group performs no bookkeeping of its
/// own.
use crate::context::ParsingContext;
use crate::element::ElementId;
use crate::error::Result;
use crate::grammar::Grammar;
use crate::reference::Reference;
use crate::tree::Match;

pub(crate) fn recognize(
    grammar: &Grammar,
    children: &[Reference],
    element: ElementId,
    ctx: &mut ParsingContext<'_>,
) -> Result<Option<Box<Match>>> {
    let start = ctx.cursor.offset();
    for reference in children {
        if let Some(branch) = reference.recognize(grammar, ctx)? {
            let length = ctx.cursor.offset() - start;
            let mut parent = Match::success(start, length, element);
            parent.set_child(branch);
            return Ok(Some(parent));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use crate::context::ParsingContext;
    use crate::grammar::Grammar;
    use crate::input::Cursor;
    use crate::reference::Reference;

    #[test]
    fn first_matching_branch_wins() {
        let mut grammar = Grammar::new();
        let ab = grammar.word("ab");
        let a = grammar.word("a");
        let group = grammar.group([Reference::one(ab), Reference::one(a)]);

        let mut cursor = Cursor::from_text("ab");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);
        let m = grammar.recognize(group, &mut ctx).unwrap().unwrap();
        assert_eq!(m.length(), 2);
        assert_eq!(m.child().unwrap().element(), Some(ab));
    }

    #[test]
    fn later_branch_matches_when_earlier_fails() {
        let mut grammar = Grammar::new();
        let ab = grammar.word("ab");
        let a = grammar.word("a");
        let group = grammar.group([Reference::one(ab), Reference::one(a)]);

        let mut cursor = Cursor::from_text("a");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);
        let m = grammar.recognize(group, &mut ctx).unwrap().unwrap();
        assert_eq!(m.length(), 1);
        assert_eq!(m.child().unwrap().element(), Some(a));
    }

    #[test]
    fn all_branches_failing_leaves_cursor_at_start() {
        let mut grammar = Grammar::new();
        let x = grammar.word("x");
        let y = grammar.word("y");
        let group = grammar.group([Reference::one(x), Reference::one(y)]);

        let mut cursor = Cursor::from_text("z");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);
        assert!(grammar.recognize(group, &mut ctx).unwrap().is_none());
        assert_eq!(ctx.cursor.offset(), 0);
    }

    #[test]
    fn branch_cardinality_is_respected() {
        let mut grammar = Grammar::new();
        let a = grammar.word("a");
        let b = grammar.word("b");
        let group = grammar.group([Reference::many(a), Reference::one(b)]);

        let mut cursor = Cursor::from_text("aaab");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);
        let m = grammar.recognize(group, &mut ctx).unwrap().unwrap();
        // The group consumed the whole repetition of the first branch.
        assert_eq!(m.length(), 3);
        assert_eq!(m.children().count(), 3);
    }
}
