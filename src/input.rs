/// Buffered cursor over an input byte stream.
///
/// The cursor is the single view the recognizers have of the input: a
/// growable byte buffer fed from a `Read` source, an absolute byte offset,
/// and a line counter maintained by scanning moved-over regions for the
/// separator byte. The buffer is conservative: everything read so far is
/// retained, so any previously reached offset can be sought again, which is
/// what makes backtracking across composite elements cheap.
///
/// Iteration is byte-oriented and UTF-8 transparent; multi-byte sequences
/// pass through the buffer unchanged and are never decoded here.
use crate::config::CursorConfig;
use crate::error::Result;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Lifecycle status of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CursorStatus {
    /// Constructed, not yet moved.
    Init,
    /// Moving through input with more bytes still to come from the source.
    Processing,
    /// The source is exhausted but unconsumed bytes remain in the buffer.
    InputEnded,
    /// The source is exhausted and the cursor sits at the final offset.
    Ended,
}

/// A sliding-window cursor over a byte source.
pub struct Cursor {
    source: Option<Box<dyn Read>>,
    buffer: Vec<u8>,
    offset: usize,
    lines: usize,
    status: CursorStatus,
    config: CursorConfig,
}

impl Cursor {
    fn new(source: Option<Box<dyn Read>>, buffer: Vec<u8>, config: CursorConfig) -> Self {
        Self {
            source,
            buffer,
            offset: 0,
            lines: 0,
            status: CursorStatus::Init,
            config,
        }
    }

    /// Opens the file at `path` with the default configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_path_with(path, CursorConfig::default())
    }

    /// Opens the file at `path` with an explicit configuration.
    pub fn from_path_with(path: impl AsRef<Path>, config: CursorConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader_with(BufReader::new(file), config)
    }

    /// Wraps an arbitrary `Read` source with the default configuration.
    pub fn from_reader(reader: impl Read + 'static) -> Result<Self> {
        Self::from_reader_with(reader, CursorConfig::default())
    }

    /// Wraps an arbitrary `Read` source with an explicit configuration.
    /// The lookahead window is primed immediately so that `window()` and
    /// `remaining()` are meaningful before the first move.
    pub fn from_reader_with(reader: impl Read + 'static, config: CursorConfig) -> Result<Self> {
        let mut cursor = Self::new(Some(Box::new(reader)), Vec::new(), config);
        cursor.refill()?;
        Ok(cursor)
    }

    /// Builds a cursor over an in-memory string.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    /// Builds a cursor over in-memory bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(None, bytes.into(), CursorConfig::default())
    }

    /// Builds a cursor over in-memory bytes with an explicit configuration.
    pub fn from_bytes_with(bytes: impl Into<Vec<u8>>, config: CursorConfig) -> Self {
        Self::new(None, bytes.into(), config)
    }

    /// Current absolute byte offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current 1-based line number, derived from the separators seen before
    /// the cursor.
    pub fn line(&self) -> usize {
        self.lines + 1
    }

    /// Current 1-based column, computed by scanning back to the previous
    /// separator byte.
    pub fn column(&self) -> usize {
        let separator = self.config.line_separator;
        match self.buffer[..self.offset]
            .iter()
            .rposition(|&byte| byte == separator)
        {
            Some(position) => self.offset - position,
            None => self.offset + 1,
        }
    }

    /// Lifecycle status.
    pub fn status(&self) -> CursorStatus {
        self.status
    }

    /// True iff more bytes may still be produced at or after the cursor.
    pub fn has_more(&self) -> bool {
        self.offset < self.buffer.len() || self.source.is_some()
    }

    /// Bytes currently buffered ahead of the cursor. At least the configured
    /// lookahead unless the source is exhausted.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    /// The buffered bytes from the cursor to the end of the buffer. Leaf
    /// matchers operate on this slice; its length bounds how far a single
    /// token match can reach.
    pub fn window(&self) -> &[u8] {
        &self.buffer[self.offset..]
    }

    /// True iff the buffered window starts with `prefix`, pulling more input
    /// when the prefix is longer than what is currently buffered.
    pub fn starts_with(&mut self, prefix: &[u8]) -> Result<bool> {
        self.ensure(prefix.len())?;
        Ok(self.window().starts_with(prefix))
    }

    /// Moves the cursor by a signed byte delta, maintaining the line counter
    /// and the lookahead invariant. Returns `false` when the end (or start)
    /// of input prevented the full move; the cursor is then clamped.
    pub fn move_by(&mut self, delta: isize) -> Result<bool> {
        let complete = if delta >= 0 {
            let ahead = delta as usize;
            self.ensure(ahead)?;
            let target = self.offset + ahead;
            let stop = target.min(self.buffer.len());
            self.lines += count_separators(
                &self.buffer[self.offset..stop],
                self.config.line_separator,
            );
            self.offset = stop;
            self.refill()?;
            stop == target
        } else {
            let back = delta.unsigned_abs();
            let target = self.offset.saturating_sub(back);
            self.lines -= count_separators(
                &self.buffer[target..self.offset],
                self.config.line_separator,
            );
            let complete = self.offset - target == back;
            self.offset = target;
            complete
        };
        self.update_status();
        Ok(complete)
    }

    /// Seeks to an absolute offset. Always succeeds for offsets within the
    /// retained buffer; offsets past the end of input clamp and return
    /// `false`, like `move_by`.
    pub fn move_to(&mut self, offset: usize) -> Result<bool> {
        self.move_by(offset as isize - self.offset as isize)
    }

    /// Pulls from the source until at least `ahead` bytes sit past the
    /// cursor or the source is exhausted.
    fn ensure(&mut self, ahead: usize) -> Result<()> {
        while self.remaining() < ahead {
            let remaining = self.remaining();
            let Some(source) = self.source.as_mut() else {
                break;
            };
            let want = self.config.lookahead.max(ahead - remaining);
            let mut chunk = vec![0u8; want];
            let read = source.read(&mut chunk)?;
            if read == 0 {
                self.source = None;
                break;
            }
            chunk.truncate(read);
            self.buffer.extend_from_slice(&chunk);
        }
        Ok(())
    }

    /// Restores the lookahead invariant after a forward move.
    fn refill(&mut self) -> Result<()> {
        self.ensure(self.config.lookahead)
    }

    fn update_status(&mut self) {
        self.status = if self.source.is_some() {
            CursorStatus::Processing
        } else if self.offset < self.buffer.len() {
            CursorStatus::InputEnded
        } else {
            CursorStatus::Ended
        };
    }
}

fn count_separators(region: &[u8], separator: u8) -> usize {
    region.iter().filter(|&&byte| byte == separator).count()
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset)
            .field("buffered", &self.buffer.len())
            .field("line", &self.line())
            .field("status", &self.status)
            .finish()
    }
}
