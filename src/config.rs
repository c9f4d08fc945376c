/// Configuration structs for the cursor and the parse run.
///
/// Both types follow the plain-struct-with-`Default` convention: all fields
/// are public, and builder-style setters are provided for fluent
/// construction.

/// The number of bytes the cursor keeps buffered ahead of its position.
/// This bounds how far a single token match can reach into the input.
pub const DEFAULT_LOOKAHEAD: usize = 64 * 1024;

/// Configuration for the input cursor.
#[derive(Debug, Clone)]
pub struct CursorConfig {
    /// Minimum number of bytes kept buffered ahead of the cursor until the
    /// input source is exhausted.
    pub lookahead: usize,
    /// The byte counted as a line separator (LF by default).
    pub line_separator: u8,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            line_separator: b'\n',
        }
    }
}

impl CursorConfig {
    /// Creates a configuration with the default lookahead and separator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lookahead window size.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Sets the line-separator byte.
    pub fn with_line_separator(mut self, separator: u8) -> Self {
        self.line_separator = separator;
        self
    }
}

/// Configuration for a parse run.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Maximum recognition depth before the run is aborted with
    /// `ParsingError::DepthLimit`. Protects left-recursive grammars from
    /// overflowing the stack.
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

impl ParseConfig {
    /// Creates a configuration with the default depth bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum recognition depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
