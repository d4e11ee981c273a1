//! Forward-only character streams feeding the lookahead buffer.

use std::io::{self, BufRead, Seek, SeekFrom};

/// A forward-only stream of chars that may optionally be rewound.
pub trait CharSource {
    /// Next char, or `None` once the stream is exhausted.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// Restart the stream from its first char.
    fn rewind(&mut self) -> io::Result<()>;
}

/// In-memory text. Always rewindable.
pub struct StrSource {
    text: String,
    pos: usize,
}

impl StrSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
        }
    }
}

impl CharSource for StrSource {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let c = self.text[self.pos..].chars().next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        Ok(c)
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.pos = 0;
        Ok(())
    }
}

/// UTF-8 decoding over a seekable reader; rewinds by seeking to the start.
pub struct ReaderSource<R> {
    inner: R,
}

impl<R: BufRead + Seek> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead + Seek> CharSource for ReaderSource<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        read_utf8_char(&mut self.inner)
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

/// UTF-8 decoding over a reader that cannot be rewound (pipes, sockets).
pub struct ForwardSource<R> {
    inner: R,
}

impl<R: BufRead> ForwardSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> CharSource for ForwardSource<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        read_utf8_char(&mut self.inner)
    }

    fn rewind(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "source cannot be rewound",
        ))
    }
}

/// Decode one UTF-8 scalar from `reader`. A sequence cut short by end of
/// input or an invalid sequence is `InvalidData`.
fn read_utf8_char<R: BufRead>(reader: &mut R) -> io::Result<Option<char>> {
    let mut bytes = [0u8; 4];
    let first = match read_byte(reader)? {
        Some(b) => b,
        None => return Ok(None),
    };
    bytes[0] = first;
    let width = match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(invalid_utf8()),
    };
    for slot in bytes.iter_mut().take(width).skip(1) {
        *slot = read_byte(reader)?.ok_or_else(invalid_utf8)?;
    }
    std::str::from_utf8(&bytes[..width])
        .ok()
        .and_then(|s| s.chars().next())
        .map(Some)
        .ok_or_else(invalid_utf8)
}

fn read_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let Some(&b) = buf.first() else {
            return Ok(None);
        };
        reader.consume(1);
        return Ok(Some(b));
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn drain(source: &mut impl CharSource) -> String {
        let mut out = String::new();
        while let Some(c) = source.read_char().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_str_source_rewind() {
        let mut source = StrSource::new("bla ཀ");
        assert_eq!(drain(&mut source), "bla ཀ");
        assert_eq!(source.read_char().unwrap(), None);
        source.rewind().unwrap();
        assert_eq!(drain(&mut source), "bla ཀ");
    }

    #[test]
    fn test_reader_source_decodes_multibyte() {
        let mut source = ReaderSource::new(Cursor::new("rgya ྱ 😀".as_bytes().to_vec()));
        assert_eq!(drain(&mut source), "rgya ྱ 😀");
        source.rewind().unwrap();
        assert_eq!(source.read_char().unwrap(), Some('r'));
    }

    #[test]
    fn test_forward_source_cannot_rewind() {
        let mut source = ForwardSource::new(Cursor::new(b"ka".to_vec()));
        assert_eq!(drain(&mut source), "ka");
        let err = source.rewind().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_truncated_sequence_is_invalid_data() {
        // First two bytes of the three-byte encoding of U+0F40.
        let mut source = ForwardSource::new(Cursor::new(vec![b'k', 0xE0, 0xBD]));
        assert_eq!(source.read_char().unwrap(), Some('k'));
        let err = source.read_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_invalid_lead_byte() {
        let mut source = ForwardSource::new(Cursor::new(vec![0xFF]));
        assert_eq!(
            source.read_char().unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }
}
