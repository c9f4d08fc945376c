/// Error handling for the parsing-element engine.
///
/// Recognition failure is deliberately *not* represented here: a failed
/// recognition is an `Ok(None)` value consumed by the backtracking logic,
/// never an error. The variants below cover construction mistakes, input
/// problems and user-callback aborts.
use std::fmt;

/// Main error type for the engine.
#[derive(Debug)]
pub enum ParsingError {
    /// Grammar construction errors: malformed token pattern, a child added
    /// to a leaf element, a missing axiom, an unresolved symbol.
    Grammar { message: String },

    /// The cursor could not open or read its input source.
    Io { source: std::io::Error },

    /// A procedure or condition callback aborted the parse.
    Callback {
        element: Option<String>,
        message: String,
    },

    /// Recognition recursed past the configured depth bound, usually a sign
    /// of unguarded left recursion.
    DepthLimit { offset: usize, limit: usize },
}

impl ParsingError {
    /// Creates a grammar-construction error.
    pub fn grammar(message: impl Into<String>) -> Self {
        ParsingError::Grammar {
            message: message.into(),
        }
    }

    /// Creates a callback-abort error, optionally tagged with the name of
    /// the element whose callback failed.
    pub fn callback(element: Option<&str>, message: impl Into<String>) -> Self {
        ParsingError::Callback {
            element: element.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsingError::Grammar { message } => {
                write!(f, "Grammar error: {}", message)
            }
            ParsingError::Io { source } => {
                write!(f, "IO error: {}", source)
            }
            ParsingError::Callback { element, message } => match element {
                Some(name) => write!(f, "Callback error in `{}`: {}", name, message),
                None => write!(f, "Callback error: {}", message),
            },
            ParsingError::DepthLimit { offset, limit } => {
                write!(
                    f,
                    "Recognition depth exceeded {} at offset {}",
                    limit, offset
                )
            }
        }
    }
}

impl std::error::Error for ParsingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParsingError::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(error: std::io::Error) -> Self {
        ParsingError::Io { source: error }
    }
}

/// Convenience type alias for Results in the engine.
pub type Result<T> = std::result::Result<T, ParsingError>;
