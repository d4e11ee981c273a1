use std::iter::FusedIterator;
use std::str::Chars;

use super::{Node, NodeId};

/// Immutable dictionary trie, possibly with shared subtrees.
///
/// Nodes are stored in post-order: every child id is smaller than its
/// parent's id.
#[derive(Debug, Clone)]
pub struct Trie {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) values: Vec<String>,
    len: usize,
}

/// Size summary of a [`Trie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieStats {
    pub keys: usize,
    pub nodes: usize,
    pub edges: usize,
    pub values: usize,
    pub value_bytes: usize,
}

impl Trie {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId, values: Vec<String>, len: usize) -> Self {
        Self {
            nodes,
            root,
            values,
            len,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let node = self.walk(key)?;
        node.value.map(|id| self.value(id))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys that are prefixes of `query`, shortest first, as
    /// `(char_len, value)` pairs.
    pub fn common_prefix_search<'q>(&self, query: &'q str) -> CommonPrefixes<'_, 'q> {
        CommonPrefixes {
            trie: self,
            chars: query.chars(),
            node: Some(self.root),
            depth: 0,
        }
    }

    /// The longest key that is a prefix of `query`.
    pub fn longest_match(&self, query: &str) -> Option<(usize, &str)> {
        self.common_prefix_search(query).last()
    }

    /// All entries whose key starts with `prefix`, in key order.
    pub fn predictive_search(&self, prefix: &str) -> Entries<'_> {
        let stack = match self.walk_id(prefix) {
            Some(id) => vec![(id, prefix.to_string())],
            None => Vec::new(),
        };
        Entries { trie: self, stack }
    }

    /// All entries in key order.
    pub fn iter(&self) -> Entries<'_> {
        self.predictive_search("")
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

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// Number of distinct values.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn stats(&self) -> TrieStats {
        TrieStats {
            keys: self.len,
            nodes: self.node_count(),
            edges: self.edge_count(),
            values: self.values.len(),
            value_bytes: self.values.iter().map(String::len).sum(),
        }
    }

    fn value(&self, id: u32) -> &str {
        &self.values[id as usize]
    }

    fn walk(&self, key: &str) -> Option<&Node> {
        self.walk_id(key).map(|id| &self.nodes[id as usize])
    }

    fn walk_id(&self, key: &str) -> Option<NodeId> {
        let mut id = self.root;
        for c in key.chars() {
            id = self.nodes[id as usize].child(c)?;
        }
        Some(id)
    }
}

impl<'a> IntoIterator for &'a Trie {
    type Item = (String, &'a str);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Trie::common_prefix_search`].
pub struct CommonPrefixes<'t, 'q> {
    trie: &'t Trie,
    chars: Chars<'q>,
    node: Option<NodeId>,
    depth: usize,
}

impl<'t> Iterator for CommonPrefixes<'t, '_> {
    type Item = (usize, &'t str);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.node {
            let node = &self.trie.nodes[id as usize];
            let depth = self.depth;
            self.node = self.chars.next().and_then(|c| node.child(c));
            self.depth += 1;
            if let Some(value) = node.value {
                return Some((depth, self.trie.value(value)));
            }
        }
        None
    }
}

impl FusedIterator for CommonPrefixes<'_, '_> {}

/// Depth-first iterator over `(key, value)` entries, in key order.
pub struct Entries<'a> {
    trie: &'a Trie,
    stack: Vec<(NodeId, String)>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (String, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, key)) = self.stack.pop() {
            let node = &self.trie.nodes[id as usize];
            for &(label, child) in node.edges.iter().rev() {
                let mut child_key = key.clone();
                child_key.push(label);
                self.stack.push((child, child_key));
            }
            if let Some(value) = node.value {
                return Some((key, self.trie.value(value)));
            }
        }
        None
    }
}

impl FusedIterator for Entries<'_> {}

#[cfg(test)]
mod tests {
    use crate::dict::{reduce, RawTrie, Trie};

    fn sample() -> Trie {
        let mut raw = RawTrie::new();
        for (k, v) in [
            ("བཀྲ", "NOUN"),
            ("བཀྲ་ཤིས", "NOUN"),
            ("བཀྲ་ཤིས་བདེ་ལེགས", "INTJ"),
            ("བདེ", "ADJ"),
            ("ལེགས", "ADJ"),
        ] {
            raw.insert(k, v);
        }
        reduce(raw).unwrap()
    }

    #[test]
    fn test_get_and_contains() {
        let trie = sample();
        assert_eq!(trie.get("བཀྲ་ཤིས"), Some("NOUN"));
        assert_eq!(trie.get("བཀྲ་ཤིས་བདེ་ལེགས"), Some("INTJ"));
        assert!(trie.contains("ལེགས"));
        assert!(!trie.contains("བཀ"));
        assert!(!trie.contains("ཀ"));
        assert_eq!(trie.len(), 5);
    }

    #[test]
    fn test_common_prefix_search() {
        let trie = sample();
        let hits: Vec<(usize, &str)> = trie.common_prefix_search("བཀྲ་ཤིས་བདེ་ལེགས་སོ").collect();
        assert_eq!(hits, vec![(3, "NOUN"), (7, "NOUN"), (16, "INTJ")]);
    }

    #[test]
    fn test_common_prefix_search_no_match() {
        let trie = sample();
        assert_eq!(trie.common_prefix_search("ཀ").count(), 0);
        assert_eq!(trie.common_prefix_search("").count(), 0);
    }

    #[test]
    fn test_longest_match_outlives_query() {
        let trie = sample();
        let value = {
            let query = String::from("བདེ་བ");
            trie.longest_match(&query).map(|(_, v)| v)
        };
        assert_eq!(value, Some("ADJ"));
    }

    #[test]
    fn test_longest_match() {
        let trie = sample();
        assert_eq!(trie.longest_match("བཀྲ་ཤིས་ཡིན"), Some((7, "NOUN")));
        assert_eq!(trie.longest_match("བདེ་བ"), Some((3, "ADJ")));
        assert_eq!(trie.longest_match("ཀ"), None);
    }

    #[test]
    fn test_predictive_search_in_key_order() {
        let trie = sample();
        let keys: Vec<String> = trie.predictive_search("བཀྲ").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["བཀྲ", "བཀྲ་ཤིས", "བཀྲ་ཤིས་བདེ་ལེགས"]);
        assert_eq!(trie.predictive_search("ཀ").count(), 0);
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let trie = sample();
        let entries: Vec<(String, &str)> = trie.iter().collect();
        assert_eq!(entries.len(), 5);
        let mut sorted = entries.clone();
        sorted.sort();
        assert_eq!(entries, sorted);
        for (key, value) in &trie {
            assert_eq!(trie.get(&key), Some(value));
        }
    }

    #[test]
    fn test_stats() {
        let trie = sample();
        let stats = trie.stats();
        assert_eq!(stats.keys, 5);
        assert_eq!(stats.nodes, trie.node_count());
        assert_eq!(stats.values, 3);
        assert_eq!(stats.value_bytes, "NOUN".len() + "INTJ".len() + "ADJ".len());
        assert_eq!(stats.edges, trie.edge_count());
    }
}
