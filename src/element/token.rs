/// Token elements recognize a regular expression anchored at the cursor.
///
/// Patterns are compiled once at construction, wrapped as `\A(?:pattern)` so
/// the match is pinned to the start of the cursor window without rewriting
/// the pattern itself. Matching is done with `regex::bytes`, which keeps the
/// engine byte-oriented and UTF-8 transparent. Because the cursor window is
/// bounded by the lookahead configuration, so is the longest possible token
/// match.
use crate::context::ParsingContext;
use crate::element::ElementId;
use crate::error::{ParsingError, Result};
use crate::tree::{Match, MatchData, TokenCaptures};
use regex::bytes::Regex;

/// Configuration of a token element.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pattern: String,
    regex: Regex,
}

impl TokenConfig {
    pub(crate) fn compile(pattern: &str) -> Result<Self> {
        let anchored = format!(r"\A(?:{})", pattern);
        let regex = Regex::new(&anchored).map_err(|error| {
            ParsingError::grammar(format!("invalid token pattern {:?}: {}", pattern, error))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The source pattern, as given to `Grammar::token`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

pub(crate) fn recognize(
    config: &TokenConfig,
    element: ElementId,
    ctx: &mut ParsingContext<'_>,
) -> Result<Option<Box<Match>>> {
    let start = ctx.cursor.offset();
    let (length, groups) = {
        let window = ctx.cursor.window();
        match config.regex.captures(window) {
            None => return Ok(None),
            Some(captures) => {
                let length = captures.get(0).map(|whole| whole.end()).unwrap_or(0);
                let groups: Vec<Option<Vec<u8>>> = (0..captures.len())
                    .map(|index| captures.get(index).map(|group| group.as_bytes().to_vec()))
                    .collect();
                (length, groups)
            }
        }
    };
    ctx.cursor.move_by(length as isize)?;
    Ok(Some(Match::with_data(
        start,
        length,
        element,
        MatchData::Token(TokenCaptures::new(groups)),
    )))
}

#[cfg(test)]
mod tests {
    use crate::context::ParsingContext;
    use crate::error::ParsingError;
    use crate::grammar::Grammar;
    use crate::input::Cursor;

    #[test]
    fn matches_anchored_at_cursor() {
        let mut grammar = Grammar::new();
        let number = grammar.token(r"\d+").unwrap();
        let mut cursor = Cursor::from_text("42abc");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        let m = grammar.recognize(number, &mut ctx).unwrap().unwrap();
        assert_eq!(m.length(), 2);
        assert_eq!(m.capture_group(0), Some(&b"42"[..]));
        assert_eq!(ctx.cursor.offset(), 2);
    }

    #[test]
    fn does_not_search_past_the_cursor() {
        let mut grammar = Grammar::new();
        let number = grammar.token(r"\d+").unwrap();
        let mut cursor = Cursor::from_text("abc42");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        assert!(grammar.recognize(number, &mut ctx).unwrap().is_none());
        assert_eq!(ctx.cursor.offset(), 0);
    }

    #[test]
    fn records_capture_groups() {
        let mut grammar = Grammar::new();
        let assign = grammar.token(r"(\w+)\s*=\s*(\d+)").unwrap();
        let mut cursor = Cursor::from_text("answer = 42;");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        let m = grammar.recognize(assign, &mut ctx).unwrap().unwrap();
        assert_eq!(m.capture_group(1), Some(&b"answer"[..]));
        assert_eq!(m.capture_group(2), Some(&b"42"[..]));
        assert_eq!(m.capture_group(3), None);
    }

    #[test]
    fn unmatched_group_is_none_but_in_range() {
        let mut grammar = Grammar::new();
        let opt = grammar.token(r"a(b)?c").unwrap();
        let mut cursor = Cursor::from_text("ac");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        let m = grammar.recognize(opt, &mut ctx).unwrap().unwrap();
        match m.data() {
            crate::tree::MatchData::Token(captures) => {
                assert_eq!(captures.len(), 2);
                assert_eq!(captures.group(1), None);
            }
            other => panic!("expected token data, got {:?}", other),
        }
    }

    #[test]
    fn zero_width_pattern_matches_empty() {
        let mut grammar = Grammar::new();
        let star = grammar.token(r"x*").unwrap();
        let mut cursor = Cursor::from_text("yyy");
        let mut ctx = ParsingContext::new(&grammar, &mut cursor);

        let m = grammar.recognize(star, &mut ctx).unwrap().unwrap();
        assert_eq!(m.length(), 0);
        assert_eq!(ctx.cursor.offset(), 0);
    }

    #[test]
    fn bad_pattern_is_a_grammar_error() {
        let mut grammar = Grammar::new();
        let error = grammar.token(r"[unclosed").unwrap_err();
        assert!(matches!(error, ParsingError::Grammar { .. }));
        assert!(format!("{}", error).contains("[unclosed"));
    }
}
