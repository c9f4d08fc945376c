/// Indentation utilities: ready-made procedure and condition elements for
/// layout-sensitive grammars.
///
/// The helpers keep a stack of indentation columns in the parsing context's
/// state slot. A grammar pushes the current column where a block opens
/// (`indent`), gates block members on that column (`check_indent`) and pops
/// it where the block closes (`dedent`).
use crate::element::ElementId;
use crate::grammar::Grammar;

/// Stack of indentation columns, stored in the context state.
#[derive(Debug, Clone, Default)]
pub struct IndentStack {
    columns: Vec<usize>,
}

impl IndentStack {
    /// The innermost recorded column; 1 (the line start) when empty.
    pub fn current(&self) -> usize {
        self.columns.last().copied().unwrap_or(1)
    }

    /// Nesting depth.
    pub fn depth(&self) -> usize {
        self.columns.len()
    }

    pub fn push(&mut self, column: usize) {
        self.columns.push(column);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.columns.pop()
    }
}

/// Creates a procedure that pushes the cursor's current column.
pub fn indent(grammar: &mut Grammar) -> ElementId {
    grammar.procedure(|ctx| {
        let column = ctx.cursor.column();
        ctx.state_entry::<IndentStack>().push(column);
        Ok(())
    })
}

/// Creates a procedure that pops the innermost recorded column.
pub fn dedent(grammar: &mut Grammar) -> ElementId {
    grammar.procedure(|ctx| {
        ctx.state_entry::<IndentStack>().pop();
        Ok(())
    })
}

/// Creates a condition that succeeds when the cursor sits at the innermost
/// recorded column.
pub fn check_indent(grammar: &mut Grammar) -> ElementId {
    grammar.condition(|ctx| {
        let column = ctx.cursor.column();
        Ok(ctx.state_entry::<IndentStack>().current() == column)
    })
}
