//! Transliteration of romanized Tibetan into Unicode.
//!
//! The filter only depends on the [`Transliterate`] trait. [`TableConverter`]
//! is a table-driven implementation good enough for search normalization; it
//! does not attempt full EWTS stacking rules.

mod config;
mod table;

use std::fmt;
use std::str::FromStr;

pub use config::{default_toml, parse_table_toml, ConversionTable, TableError};
pub use table::TableConverter;

/// Romanization scheme of the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Extended Wylie.
    #[default]
    Ewts,
    /// Diacritic-based THL/DTS scheme.
    Dts,
    /// ALA-LC romanization.
    Alalc,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ewts => "ewts",
            Mode::Dts => "dts",
            Mode::Alalc => "alalc",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown input method: {0} (expected ewts, dts or alalc)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ewts" => Ok(Mode::Ewts),
            "dts" => Ok(Mode::Dts),
            "alalc" => Ok(Mode::Alalc),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Converts one chunk of romanized text into Tibetan Unicode.
///
/// Implementations must be total: text they cannot interpret is passed
/// through or dropped, never reported as an error. An empty result is
/// allowed.
pub trait Transliterate {
    fn to_unicode(&self, chunk: &str, mode: Mode) -> String;
}

impl<T: Transliterate + ?Sized> Transliterate for &T {
    fn to_unicode(&self, chunk: &str, mode: Mode) -> String {
        (**self).to_unicode(chunk, mode)
    }
}

impl<T: Transliterate + ?Sized> Transliterate for std::sync::Arc<T> {
    fn to_unicode(&self, chunk: &str, mode: Mode) -> String {
        (**self).to_unicode(chunk, mode)
    }
}
