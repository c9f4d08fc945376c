/// Word elements recognize a literal byte string at the cursor.
use crate::context::ParsingContext;
use crate::element::ElementId;
use crate::error::Result;
use crate::tree::{Match, MatchData};
use std::sync::Arc;

/// Configuration of a word element.
#[derive(Debug, Clone)]
pub struct WordConfig {
    literal: Arc<str>,
}

impl WordConfig {
    pub(crate) fn new(literal: &str) -> Self {
        Self {
            literal: Arc::from(literal),
        }
    }

    /// The literal this word matches.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Byte length of the literal.
    pub fn len(&self) -> usize {
        self.literal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }
}

pub(crate) fn recognize(
    config: &WordConfig,
    element: ElementId,
    ctx: &mut ParsingContext<'_>,
) -> Result<Option<Box<Match>>> {
    let start = ctx.cursor.offset();
    let bytes = config.literal.as_bytes();
    if !ctx.cursor.starts_with(bytes)? {
        return Ok(None);
    }
    ctx.cursor.move_by(bytes.len() as isize)?;
    Ok(Some(Match::with_data(
        start,
        bytes.len(),
        element,
        MatchData::Word(config.literal.clone()),
    )))
}

#[cfg(test)]
mod tests {
    use crate::context::ParsingContext;
    use crate::grammar::Grammar;
    use crate::input::Cursor;
    use crate::tree::MatchData;

    #[test]
    fn matches_literal_and_advances() {
        let mut grammar = Grammar::new();
        let word = grammar.word("foo");
        let mut cursor = Cursor::from_text("foobar");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        let m = grammar.recognize(word, &mut ctx).unwrap().unwrap();
        assert_eq!(m.offset(), 0);
        assert_eq!(m.length(), 3);
        assert_eq!(ctx.cursor.offset(), 3);
        assert!(matches!(m.data(), MatchData::Word(w) if &**w == "foo"));
    }

    #[test]
    fn mismatch_leaves_cursor_in_place() {
        let mut grammar = Grammar::new();
        let word = grammar.word("foo");
        let mut cursor = Cursor::from_text("fiasco");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        assert!(grammar.recognize(word, &mut ctx).unwrap().is_none());
        assert_eq!(ctx.cursor.offset(), 0);
    }

    #[test]
    fn fails_on_truncated_input() {
        let mut grammar = Grammar::new();
        let word = grammar.word("foobar");
        let mut cursor = Cursor::from_text("foo");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        assert!(grammar.recognize(word, &mut ctx).unwrap().is_none());
        assert_eq!(ctx.cursor.offset(), 0);
    }

    #[test]
    fn utf8_literals_match_bytewise() {
        let mut grammar = Grammar::new();
        let word = grammar.word("héllo");
        let mut cursor = Cursor::from_text("héllo!");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        let m = grammar.recognize(word, &mut ctx).unwrap().unwrap();
        assert_eq!(m.length(), "héllo".len());
    }
}
