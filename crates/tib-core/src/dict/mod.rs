//! Compiled dictionary trie.
//!
//! `RawTrie` collects `key value` entries from dictionary sources. Reducing it
//! merges identical subtrees into a DAG (`Trie`), which can be stored in the
//! TBTR binary format and loaded back with the same lookup results.

mod loader;
mod raw;
mod reduce;
mod trie;
mod trie_io;

pub use loader::{build_trie, load_sources, parse_source};
pub use raw::RawTrie;
pub use reduce::reduce;
pub use trie::{CommonPrefixes, Entries, Trie, TrieStats};
pub use trie_io::{load, store};

use std::io;
use std::path::PathBuf;

/// Errors from building, reducing, storing and loading tries.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot read {}: {source}", path.display())]
    SourceUnreadable { path: PathBuf, source: io::Error },

    #[error("{source_name}:{line_no}: malformed dictionary line ({reason}): {line:?}")]
    MalformedLine {
        source_name: String,
        line_no: usize,
        line: String,
        reason: &'static str,
    },

    #[error("cannot write trie: {0}")]
    Serialization(#[source] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected TBTR)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("corrupt trie data: {0}")]
    Corrupt(String),

    #[error("trie contains a cycle")]
    Cycle,
}

/// Index of a node in a trie arena.
pub(crate) type NodeId = u32;

/// A trie node: outgoing edges sorted by label, plus an optional index into
/// the value table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct Node {
    pub(crate) edges: Vec<(char, NodeId)>,
    pub(crate) value: Option<u32>,
}

impl Node {
    pub(crate) fn child(&self, label: char) -> Option<NodeId> {
        self.edges
            .binary_search_by_key(&label, |&(c, _)| c)
            .ok()
            .map(|i| self.edges[i].1)
    }
}
