use std::collections::{BTreeMap, HashMap};

use super::config::{parse_table_toml, ConversionTable, TableError, DEFAULT_TABLE_TOML};
use super::{Mode, Transliterate};

/// Joins two consonants into one stack.
const STACK_MARKER: char = '+';
/// Keeps two consonants apart (`g.y` is ག + ཡ, not གྱ).
const STACK_BREAK: char = '.';

#[derive(Debug, Clone)]
enum Token {
    Consonant {
        root: String,
        subjoined: String,
        follower: bool,
    },
    Vowel(String),
    Symbol(String),
}

/// Lookup table for one mode.
#[derive(Debug, Clone, Default)]
struct ModeTable {
    tokens: HashMap<String, Token>,
    max_key_chars: usize,
}

impl ModeTable {
    fn insert(&mut self, key: &str, token: Token) {
        self.max_key_chars = self.max_key_chars.max(key.chars().count());
        self.tokens.insert(key.to_string(), token);
    }

    /// Longest key that is a prefix of `chars`, with its length in chars.
    fn longest(&self, chars: &[char]) -> Option<(usize, &Token)> {
        let limit = self.max_key_chars.min(chars.len());
        let mut key: String = chars[..limit].iter().collect();
        for len in (1..=limit).rev() {
            if let Some(token) = self.tokens.get(&key) {
                return Some((len, token));
            }
            key.pop();
        }
        None
    }

    fn add_letters(
        &mut self,
        consonants: &BTreeMap<String, String>,
        subjoined: &BTreeMap<String, String>,
        fallback: &BTreeMap<String, String>,
        followers: &[String],
    ) {
        for (key, root) in consonants {
            let Some(sub) = subjoined.get(key).or_else(|| fallback.get(key)) else {
                continue;
            };
            self.insert(
                key,
                Token::Consonant {
                    root: root.clone(),
                    subjoined: sub.clone(),
                    follower: followers.contains(key),
                },
            );
        }
    }

    fn add_vowels(&mut self, vowels: &BTreeMap<String, String>) {
        for (key, sign) in vowels {
            self.insert(key, Token::Vowel(sign.clone()));
        }
    }

    fn add_symbols(&mut self, symbols: &BTreeMap<String, String>) {
        for (key, value) in symbols {
            self.insert(key, Token::Symbol(value.clone()));
        }
    }
}

/// Greedy table-driven converter.
///
/// Handles consonant stacking for `y r l w` followers and explicit `+`,
/// vowel signs with the `ཨ` carrier, punctuation and digits. Anything the
/// table does not know is copied through unchanged.
#[derive(Debug, Clone)]
pub struct TableConverter {
    vowel_base: String,
    tables: HashMap<Mode, ModeTable>,
}

impl TableConverter {
    /// Converter over the embedded default table.
    pub fn new() -> Self {
        Self::from_toml(DEFAULT_TABLE_TOML).expect("embedded conversion table must be valid")
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, TableError> {
        Self::from_table(&parse_table_toml(toml_str)?)
    }

    pub fn from_table(table: &ConversionTable) -> Result<Self, TableError> {
        let mut base = ModeTable::default();
        base.add_letters(
            &table.consonants,
            &table.subjoined,
            &table.subjoined,
            &table.stack_followers,
        );
        base.add_vowels(&table.vowels);
        base.add_symbols(&table.symbols);

        let mut tables = HashMap::new();
        for mode in [Mode::Ewts, Mode::Dts, Mode::Alalc] {
            tables.insert(mode, base.clone());
        }
        for (mode, overlay) in table.overlays()? {
            let Some(mode_table) = tables.get_mut(&mode) else {
                continue;
            };
            mode_table.add_letters(
                &overlay.consonants,
                &overlay.subjoined,
                &table.subjoined,
                &table.stack_followers,
            );
            mode_table.add_vowels(&overlay.vowels);
            mode_table.add_symbols(&overlay.symbols);
        }

        Ok(Self {
            vowel_base: table.vowel_base.clone(),
            tables,
        })
    }
}

impl Default for TableConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Transliterate for TableConverter {
    fn to_unicode(&self, chunk: &str, mode: Mode) -> String {
        let Some(table) = self.tables.get(&mode) else {
            return chunk.to_string();
        };
        let chars: Vec<char> = chunk.chars().collect();
        let mut out = String::with_capacity(chunk.len() * 3);
        // Set while the last token was a consonant still waiting for a vowel.
        let mut in_stack = false;
        let mut force_stack = false;
        let mut i = 0;

        while i < chars.len() {
            if in_stack && chars[i] == STACK_MARKER {
                force_stack = true;
                i += 1;
                continue;
            }
            if in_stack && chars[i] == STACK_BREAK {
                in_stack = false;
                i += 1;
                continue;
            }

            let Some((len, token)) = table.longest(&chars[i..]) else {
                out.push(chars[i]);
                in_stack = false;
                force_stack = false;
                i += 1;
                continue;
            };

            match token {
                Token::Consonant {
                    root,
                    subjoined,
                    follower,
                } => {
                    if in_stack && (force_stack || *follower) {
                        out.push_str(subjoined);
                    } else {
                        out.push_str(root);
                    }
                    in_stack = true;
                }
                Token::Vowel(sign) => {
                    if !in_stack {
                        out.push_str(&self.vowel_base);
                    }
                    out.push_str(sign);
                    in_stack = false;
                }
                Token::Symbol(value) => {
                    out.push_str(value);
                    in_stack = false;
                }
            }
            force_stack = false;
            i += len;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ewts(s: &str) -> String {
        TableConverter::new().to_unicode(s, Mode::Ewts)
    }

    #[test]
    fn test_root_and_follower() {
        assert_eq!(ewts("bla "), "བླ་");
        assert_eq!(ewts("bla"), "བླ");
        assert_eq!(ewts("rgya"), "རགྱ");
    }

    #[test]
    fn test_prefix_letters_do_not_stack() {
        assert_eq!(ewts("dkar"), "དཀར");
        assert_eq!(ewts("mgyogs"), "མགྱོགས");
    }

    #[test]
    fn test_explicit_stack_and_break() {
        assert_eq!(ewts("s+ga"), "སྒ");
        assert_eq!(ewts("g.ya"), "གཡ");
        assert_eq!(ewts("gya"), "གྱ");
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(ewts("tsha"), "ཚ");
        assert_eq!(ewts("nga"), "ང");
        assert_eq!(ewts("kai"), "ཀཻ");
    }

    #[test]
    fn test_standalone_vowels() {
        assert_eq!(ewts("a"), "ཨ");
        assert_eq!(ewts("o"), "ཨོ");
        assert_eq!(ewts("'o"), "འོ");
    }

    #[test]
    fn test_symbols_and_digits() {
        assert_eq!(ewts("ka/"), "ཀ།");
        assert_eq!(ewts("//"), "༎");
        assert_eq!(ewts("2024"), "༢༠༢༤");
        assert_eq!(ewts("oM "), "ཨོཾ་");
    }

    #[test]
    fn test_unknown_passthrough() {
        assert_eq!(ewts("ཀ"), "ཀ");
        assert_eq!(ewts("ka?"), "ཀ?");
        assert_eq!(ewts("\n"), "\n");
    }

    #[test]
    fn test_vowel_a_only_chunk_is_not_empty() {
        assert!(!ewts("a").is_empty());
    }

    #[test]
    fn test_modes() {
        let conv = TableConverter::new();
        assert_eq!(conv.to_unicode("ṅ", Mode::Dts), "ང");
        assert_eq!(conv.to_unicode("ṅ", Mode::Alalc), "ང");
        assert_eq!(conv.to_unicode("ṅ", Mode::Ewts), "ṅ");
        assert_eq!(conv.to_unicode("ʹ", Mode::Alalc), "འ");
        assert_eq!(conv.to_unicode("ʹ", Mode::Dts), "ʹ");
        // Base EWTS entries stay available in every mode.
        assert_eq!(conv.to_unicode("bla ", Mode::Alalc), "བླ་");
    }

    #[test]
    fn test_custom_table() {
        let toml = r#"
vowel_base = "ཨ"
[consonants]
k = "ཀ"
[subjoined]
k = "ྐ"
[vowels]
a = ""
"#;
        let conv = TableConverter::from_toml(toml).unwrap();
        assert_eq!(conv.to_unicode("ka", Mode::Ewts), "ཀ");
        assert_eq!(conv.to_unicode("k+ka", Mode::Ewts), "ཀྐ");
        assert_eq!(conv.to_unicode(" ", Mode::Ewts), " ");
    }
}
