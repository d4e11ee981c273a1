use std::collections::BTreeMap;

use serde::Deserialize;

use super::{Mode, UnknownMode};
use crate::unicode::{is_subjoined, is_tibetan};

pub const DEFAULT_TABLE_TOML: &str = include_str!("default_table.toml");

/// Returns the embedded default conversion table.
pub fn default_toml() -> &'static str {
    DEFAULT_TABLE_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[consonants] table is empty")]
    Empty,
    #[error("non-ASCII key in the base table: {0}")]
    NonAsciiKey(String),
    #[error("consonant {0} has no [subjoined] form")]
    MissingSubjoined(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),
}

/// Romanization → Unicode table, with optional per-mode overlays.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionTable {
    /// Carrier letter for a vowel that has no preceding consonant.
    pub vowel_base: String,
    /// Consonants written subjoined when they directly follow another
    /// consonant of the same stack.
    #[serde(default)]
    pub stack_followers: Vec<String>,
    pub consonants: BTreeMap<String, String>,
    pub subjoined: BTreeMap<String, String>,
    pub vowels: BTreeMap<String, String>,
    #[serde(default)]
    pub symbols: BTreeMap<String, String>,
    #[serde(default)]
    pub modes: BTreeMap<String, ModeOverlay>,
}

/// Entries added to (or replacing) the base table for one [`Mode`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeOverlay {
    #[serde(default)]
    pub consonants: BTreeMap<String, String>,
    #[serde(default)]
    pub subjoined: BTreeMap<String, String>,
    #[serde(default)]
    pub vowels: BTreeMap<String, String>,
    #[serde(default)]
    pub symbols: BTreeMap<String, String>,
}

impl ConversionTable {
    /// Overlays keyed by parsed [`Mode`].
    pub fn overlays(&self) -> Result<Vec<(Mode, &ModeOverlay)>, TableError> {
        self.modes
            .iter()
            .map(|(name, overlay)| Ok((name.parse::<Mode>()?, overlay)))
            .collect()
    }
}

/// Parse and validate a conversion table.
pub fn parse_table_toml(toml_str: &str) -> Result<ConversionTable, TableError> {
    let table: ConversionTable =
        toml::from_str(toml_str).map_err(|e| TableError::Parse(e.to_string()))?;

    if table.consonants.is_empty() {
        return Err(TableError::Empty);
    }

    for key in table
        .consonants
        .keys()
        .chain(table.vowels.keys())
        .chain(table.symbols.keys())
    {
        if !key.is_ascii() {
            return Err(TableError::NonAsciiKey(key.clone()));
        }
    }

    validate_letters(&table.consonants, &table.subjoined, &table.subjoined)?;

    if !table.vowel_base.chars().all(is_tibetan) || table.vowel_base.is_empty() {
        return Err(TableError::InvalidValue {
            key: "vowel_base".to_string(),
            reason: "must be a Tibetan letter".to_string(),
        });
    }

    for follower in &table.stack_followers {
        if !table.consonants.contains_key(follower) {
            return Err(TableError::InvalidValue {
                key: format!("stack_followers.{follower}"),
                reason: "not a consonant".to_string(),
            });
        }
    }

    for (_, overlay) in table.overlays()? {
        validate_letters(&overlay.consonants, &overlay.subjoined, &table.subjoined)?;
    }

    Ok(table)
}

/// Every consonant needs a subjoined form, and every subjoined value must be
/// made of subjoined letters.
fn validate_letters(
    consonants: &BTreeMap<String, String>,
    subjoined: &BTreeMap<String, String>,
    fallback: &BTreeMap<String, String>,
) -> Result<(), TableError> {
    for (key, value) in consonants {
        if value.is_empty() || !value.chars().all(is_tibetan) {
            return Err(TableError::InvalidValue {
                key: format!("consonants.{key}"),
                reason: "must be Tibetan letters".to_string(),
            });
        }
        if !subjoined.contains_key(key) && !fallback.contains_key(key) {
            return Err(TableError::MissingSubjoined(key.clone()));
        }
    }
    for (key, value) in subjoined {
        if value.is_empty() || !value.chars().all(is_subjoined) {
            return Err(TableError::InvalidValue {
                key: format!("subjoined.{key}"),
                reason: "must be subjoined letters".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
vowel_base = "ཨ"
stack_followers = ["y"]

[consonants]
k = "ཀ"
y = "ཡ"

[subjoined]
k = "ྐ"
y = "ྱ"

[vowels]
a = ""
i = "ི"
"#;

    #[test]
    fn parse_minimal_table() {
        let table = parse_table_toml(MINIMAL).unwrap();
        assert_eq!(table.consonants.len(), 2);
        assert_eq!(table.vowels["a"], "");
        assert!(table.symbols.is_empty());
        assert!(table.overlays().unwrap().is_empty());
    }

    #[test]
    fn parse_default_table() {
        let table = parse_table_toml(DEFAULT_TABLE_TOML).unwrap();
        assert!(table.consonants.len() >= 30);
        let modes: Vec<Mode> = table.overlays().unwrap().into_iter().map(|(m, _)| m).collect();
        assert!(modes.contains(&Mode::Dts));
        assert!(modes.contains(&Mode::Alalc));
    }

    #[test]
    fn error_empty_consonants() {
        let toml = "vowel_base = \"ཨ\"\n[consonants]\n[subjoined]\n[vowels]\n";
        assert!(matches!(
            parse_table_toml(toml).unwrap_err(),
            TableError::Empty
        ));
    }

    #[test]
    fn error_missing_subjoined() {
        let toml = MINIMAL.replace("y = \"ྱ\"", "");
        match parse_table_toml(&toml).unwrap_err() {
            TableError::MissingSubjoined(key) => assert_eq!(key, "y"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_non_ascii_base_key() {
        let toml = MINIMAL.replace("i = \"ི\"", "\"ī\" = \"ཱི\"");
        assert!(matches!(
            parse_table_toml(&toml).unwrap_err(),
            TableError::NonAsciiKey(_)
        ));
    }

    #[test]
    fn error_subjoined_value_not_subjoined() {
        let toml = MINIMAL.replace("k = \"ྐ\"", "k = \"ཀ\"");
        assert!(matches!(
            parse_table_toml(&toml).unwrap_err(),
            TableError::InvalidValue { .. }
        ));
    }

    #[test]
    fn error_unknown_mode() {
        let toml = format!("{MINIMAL}\n[modes.iast.vowels]\n\"ā\" = \"ཱ\"\n");
        assert!(matches!(
            parse_table_toml(&toml).unwrap_err(),
            TableError::UnknownMode(_)
        ));
    }

    #[test]
    fn overlay_may_use_non_ascii_keys() {
        let toml = format!("{MINIMAL}\n[modes.alalc.vowels]\n\"ā\" = \"ཱ\"\n");
        let table = parse_table_toml(&toml).unwrap();
        let overlays = table.overlays().unwrap();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].0, Mode::Alalc);
    }

    #[test]
    fn error_invalid_toml() {
        assert!(matches!(
            parse_table_toml("not valid toml {{{").unwrap_err(),
            TableError::Parse(_)
        ));
    }
}
