/// Rule elements: concatenation.
///
/// Children are recognized in declaration order, with the grammar's skip
/// element applied before each one. Sub-matches are chained as siblings
/// under the rule match; skip consumption never appears in that chain. Any
/// child failure rewinds the cursor to the rule's start offset, which is
/// the contract that lets an enclosing group try its next branch.
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
    let mut chain: Option<Box<Match>> = None;
    for reference in children {
        grammar.apply_skip(ctx)?;
        match reference.recognize(grammar, ctx)? {
            Some(sub) => match chain.as_mut() {
                None => chain = Some(sub),
                Some(head) => head.append_sibling(sub),
            },
            None => {
                ctx.cursor.move_to(start)?;
                return Ok(None);
            }
        }
    }
    let mut parent = Match::success(start, ctx.cursor.offset() - start, element);
    if let Some(head) = chain {
        parent.set_child(head);
    }
    Ok(Some(parent))
}
