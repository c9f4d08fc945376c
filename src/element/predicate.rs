/// Procedure and condition elements: zero-width recognizers backed by user
/// callbacks.
///
/// A procedure always succeeds after running its side effect; a condition
/// gates recognition on an arbitrary predicate over the parsing context.
/// Neither consumes input, and an `Err` from either unwinds the whole parse.
use crate::context::ParsingContext;
use crate::element::{ConditionFn, ElementId, ProcedureFn};
use crate::error::Result;
use crate::tree::Match;

pub(crate) fn recognize_procedure(
    callback: &ProcedureFn,
    element: ElementId,
    ctx: &mut ParsingContext<'_>,
) -> Result<Option<Box<Match>>> {
    let offset = ctx.cursor.offset();
    callback(ctx)?;
    Ok(Some(Match::zero_width(offset, element)))
}

pub(crate) fn recognize_condition(
    callback: &ConditionFn,
    element: ElementId,
    ctx: &mut ParsingContext<'_>,
) -> Result<Option<Box<Match>>> {
    let offset = ctx.cursor.offset();
    if callback(ctx)? {
        Ok(Some(Match::zero_width(offset, element)))
    } else {
        Ok(None)
    }
}
