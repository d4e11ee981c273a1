//! Character-level classification for Tibetan text and EWTS input.

/// The Tibetan block (U+0F00..U+0FFF).
pub fn is_tibetan(c: char) -> bool {
    ('\u{0F00}'..='\u{0FFF}').contains(&c)
}

/// Subjoined consonants (U+0F90..U+0FBC), the stacked forms written below
/// a root letter.
pub fn is_subjoined(c: char) -> bool {
    ('\u{0F90}'..='\u{0FBC}').contains(&c)
}

/// Explicit separators in transliterated input. A chunk ends right after one
/// of these.
pub fn is_chunk_delimiter(c: char) -> bool {
    matches!(c, ' ' | '*' | '_')
}

/// Characters above the ASCII range are never part of a romanization
/// sequence: they are either already Tibetan or foreign text.
pub fn is_non_ascii(c: char) -> bool {
    c as u32 > 127
}
