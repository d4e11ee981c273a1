use std::collections::VecDeque;
use std::io;

use super::source::CharSource;

/// Random access by absolute offset over a forward-only [`CharSource`].
///
/// Chars are retained from the oldest offset not yet released by
/// [`free_before`](Self::free_before) up to the furthest offset read, so
/// memory is bounded by the caller's lookahead window.
pub struct LookaheadBuffer<S> {
    source: S,
    buf: VecDeque<char>,
    /// Absolute offset of `buf[0]`.
    start: usize,
    exhausted: bool,
}

impl<S: CharSource> LookaheadBuffer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buf: VecDeque::new(),
            start: 0,
            exhausted: false,
        }
    }

    /// Char at absolute `offset`, pulling from the source as needed.
    /// Returns `None` once the source is exhausted.
    pub fn get(&mut self, offset: usize) -> io::Result<Option<char>> {
        if offset < self.start {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "offset {offset} was already freed (buffer starts at {})",
                    self.start
                ),
            ));
        }
        while offset >= self.end() {
            if self.exhausted {
                return Ok(None);
            }
            match self.source.read_char()? {
                Some(c) => self.buf.push_back(c),
                None => {
                    self.exhausted = true;
                    return Ok(None);
                }
            }
        }
        Ok(self.buf.get(offset - self.start).copied())
    }

    /// Release every retained char strictly before `offset`.
    pub fn free_before(&mut self, offset: usize) {
        let count = offset.saturating_sub(self.start).min(self.buf.len());
        self.buf.drain(..count);
        self.start += count;
    }

    /// Rewind the source and discard all buffered state.
    pub fn reset(&mut self) -> io::Result<()> {
        self.source.rewind()?;
        self.buf.clear();
        self.start = 0;
        self.exhausted = false;
        Ok(())
    }

    /// Number of chars currently retained.
    pub fn retained(&self) -> usize {
        self.buf.len()
    }

    fn end(&self) -> usize {
        self.start + self.buf.len()
    }
}
