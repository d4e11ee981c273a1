//! Chunk boundaries for incremental transliteration.
//!
//! Romanization schemes are not self-delimiting, so conversion works on
//! bounded chunks. A chunk ends right after a delimiter (`' '`, `'*'`, `'_'`),
//! right after a non-ASCII char, once it holds [`MAX_CHUNK_LEN`] chars, or at
//! end of input.

use crate::unicode::{is_chunk_delimiter, is_non_ascii};

pub const MAX_CHUNK_LEN: usize = 32;

/// Whether a chunk that just received `c` and now holds `len` chars is
/// complete.
pub fn is_chunk_end(c: char, len: usize) -> bool {
    is_chunk_delimiter(c) || is_non_ascii(c) || len >= MAX_CHUNK_LEN
}

/// Iterate over the chunks of an in-memory string.
pub fn chunks(text: &str) -> Chunks<'_> {
    Chunks { rest: text }
}

pub struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let mut end = self.rest.len();
        for (len, (idx, c)) in self.rest.char_indices().enumerate() {
            if is_chunk_end(c, len + 1) {
                end = idx + c.len_utf8();
                break;
            }
        }
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}
