//! Streaming transliteration filter with offset correction.
//!
//! `EwtsFilter` pulls chars from a [`CharSource`], cuts them into chunks,
//! converts each chunk through a [`Transliterate`] implementation and emits
//! the result one char at a time. Every chunk whose replacement differs in
//! length from its input is recorded in an [`OffsetCorrector`], so output
//! positions can be mapped back onto the original text.

mod chunk;
mod lookahead;
mod offsets;
mod source;

pub use chunk::{chunks, is_chunk_end, Chunks, MAX_CHUNK_LEN};
pub use lookahead::LookaheadBuffer;
pub use offsets::OffsetCorrector;
pub use source::{CharSource, ForwardSource, ReaderSource, StrSource};

use std::io;

use tracing::trace;

use crate::translit::{Mode, Transliterate};

#[derive(Debug)]
enum State {
    NoPendingReplacement,
    EmittingReplacement { chars: Vec<char>, cursor: usize },
    Finished,
}

pub struct EwtsFilter<S, C> {
    buffer: LookaheadBuffer<S>,
    converter: C,
    mode: Mode,
    state: State,
    /// Absolute input offset of the next unread char.
    input_off: usize,
    offsets: OffsetCorrector,
}

impl<S: CharSource, C: Transliterate> EwtsFilter<S, C> {
    pub fn new(source: S, converter: C, mode: Mode) -> Self {
        Self {
            buffer: LookaheadBuffer::new(source),
            converter,
            mode,
            state: State::NoPendingReplacement,
            input_off: 0,
            offsets: OffsetCorrector::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Next output char, or `None` at end of stream.
    pub fn read(&mut self) -> io::Result<Option<char>> {
        loop {
            match &mut self.state {
                State::EmittingReplacement { chars, cursor } => {
                    let c = chars[*cursor];
                    *cursor += 1;
                    if *cursor == chars.len() {
                        self.state = State::NoPendingReplacement;
                    }
                    return Ok(Some(c));
                }
                State::Finished => return Ok(None),
                State::NoPendingReplacement => self.next_replacement()?,
            }
        }
    }

    /// Fill `buf` with output chars. Returns the number written; `0` for a
    /// non-empty `buf` means end of stream.
    pub fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.read()? {
                Some(c) => *slot = c,
                None => break,
            }
            n += 1;
        }
        Ok(n)
    }

    /// Drain the remaining output into a `String`.
    pub fn read_to_string(&mut self) -> io::Result<String> {
        let mut out = String::new();
        while let Some(c) = self.read()? {
            out.push(c);
        }
        Ok(out)
    }

    /// Input position corresponding to output position `output_pos`.
    pub fn correct_offset(&self, output_pos: usize) -> usize {
        self.offsets.correct(output_pos)
    }

    /// Rewind the source and forget all conversion state.
    pub fn reset(&mut self) -> io::Result<()> {
        self.buffer.reset()?;
        self.state = State::NoPendingReplacement;
        self.input_off = 0;
        self.offsets.clear();
        Ok(())
    }

    /// Cut the next chunk, convert it and move to the matching state.
    fn next_replacement(&mut self) -> io::Result<()> {
        let chunk_start = self.input_off;
        let mut chunk = String::new();
        let mut len = 0;
        while let Some(c) = self.buffer.get(self.input_off)? {
            self.input_off += 1;
            len += 1;
            chunk.push(c);
            if is_chunk_end(c, len) {
                break;
            }
        }
        self.buffer.free_before(self.input_off);

        if len == 0 {
            self.state = State::Finished;
            return Ok(());
        }

        let replacement: Vec<char> = self
            .converter
            .to_unicode(&chunk, self.mode)
            .chars()
            .collect();
        trace!(
            chunk_start,
            chunk_len = len,
            replacement_len = replacement.len(),
            "converted chunk"
        );
        // An empty conversion ends the stream even when input remains.
        if replacement.is_empty() {
            self.state = State::Finished;
            return Ok(());
        }

        self.offsets.record(self.input_off, len, replacement.len());
        self.state = State::EmittingReplacement {
            chars: replacement,
            cursor: 0,
        };
        Ok(())
    }
}

impl<S: CharSource, C: Transliterate> Iterator for EwtsFilter<S, C> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}
