use std::collections::HashMap;

use super::reduce::rebuild;
use super::{DictError, Node, NodeId, Trie};

/// Mutable prefix tree filled by insertion. Node 0 is the root.
///
/// Values are interned, so equal values share one id; this is what lets the
/// reducer compare terminal values by id.
#[derive(Debug, Clone)]
pub struct RawTrie {
    pub(crate) nodes: Vec<Node>,
    pub(crate) values: Vec<String>,
    value_ids: HashMap<String, u32>,
    len: usize,
}

impl RawTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            values: Vec::new(),
            value_ids: HashMap::new(),
            len: 0,
        }
    }

    /// Insert `key → value`, replacing any existing value. Returns the
    /// previous value.
    pub fn insert(&mut self, key: &str, value: &str) -> Option<String> {
        let mut node = 0usize;
        for c in key.chars() {
            node = match self.nodes[node].edges.binary_search_by_key(&c, |&(l, _)| l) {
                Ok(i) => self.nodes[node].edges[i].1 as usize,
                Err(i) => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].edges.insert(i, (c, child as NodeId));
                    child
                }
            };
        }
        let value_id = self.intern(value);
        let previous = self.nodes[node].value.replace(value_id);
        match previous {
            Some(id) => Some(self.values[id as usize].clone()),
            None => {
                self.len += 1;
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = &self.nodes[0];
        for c in key.chars() {
            node = &self.nodes[node.child(c)? as usize];
        }
        node.value.map(|id| self.values[id as usize].as_str())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Freeze into a queryable [`Trie`] without merging any subtrees.
    pub fn freeze(self) -> Result<Trie, DictError> {
        rebuild(self, false)
    }

    fn intern(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.value_ids.get(value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value.to_string());
        self.value_ids.insert(value.to_string(), id);
        id
    }
}

impl Default for RawTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut raw = RawTrie::new();
        assert_eq!(raw.insert("ཀ", "k"), None);
        assert_eq!(raw.insert("ཀར", "kar"), None);
        assert_eq!(raw.get("ཀ"), Some("k"));
        assert_eq!(raw.get("ཀར"), Some("kar"));
        assert_eq!(raw.get("ཀརམ"), None);
        assert_eq!(raw.get("ཁ"), None);
        assert_eq!(raw.len(), 2);
        // root + ཀ + ར
        assert_eq!(raw.node_count(), 3);
    }

    #[test]
    fn test_overwrite_keeps_len() {
        let mut raw = RawTrie::new();
        raw.insert("abc", "1");
        assert_eq!(raw.insert("abc", "2"), Some("1".to_string()));
        assert_eq!(raw.get("abc"), Some("2"));
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn test_prefix_without_value() {
        let mut raw = RawTrie::new();
        raw.insert("abc", "1");
        assert_eq!(raw.get("ab"), None);
        assert_eq!(raw.get(""), None);
    }

    #[test]
    fn test_values_are_interned() {
        let mut raw = RawTrie::new();
        raw.insert("a", "x");
        raw.insert("b", "x");
        raw.insert("c", "y");
        assert_eq!(raw.values.len(), 2);
    }

    #[test]
    fn test_edges_stay_sorted() {
        let mut raw = RawTrie::new();
        for key in ["m", "b", "z", "a"] {
            raw.insert(key, key);
        }
        let labels: Vec<char> = raw.nodes[0].edges.iter().map(|&(c, _)| c).collect();
        assert_eq!(labels, vec!['a', 'b', 'm', 'z']);
    }
}
