use std::collections::HashMap;

use tracing::{debug, debug_span};

use super::{DictError, Node, NodeId, RawTrie, Trie};

/// Merge structurally identical subtrees of `raw`.
///
/// Two nodes are merged when they carry the same value and their edges have
/// the same labels leading to the same (already merged) children. Every key
/// keeps its value.
pub fn reduce(raw: RawTrie) -> Result<Trie, DictError> {
    rebuild(raw, true)
}

/// Renumber `raw` into a fresh arena in post-order, so every child id is
/// smaller than its parent's and the root comes last. With `merge`, nodes
/// equal to one already emitted are replaced by it.
pub(crate) fn rebuild(raw: RawTrie, merge: bool) -> Result<Trie, DictError> {
    let _span = debug_span!("rebuild_trie", merge).entered();
    let raw_nodes = raw.nodes.len();

    let mut new_ids: Vec<Option<NodeId>> = vec![None; raw_nodes];
    let mut on_path = vec![false; raw_nodes];
    let mut nodes: Vec<Node> = Vec::new();
    let mut key_counts: Vec<usize> = Vec::new();
    let mut canonical: HashMap<Node, NodeId> = HashMap::new();
    let mut values: Vec<String> = Vec::new();
    let mut value_ids: HashMap<u32, u32> = HashMap::new();

    // (raw index, children already scheduled)
    let mut stack: Vec<(usize, bool)> = vec![(0, false)];
    while let Some((idx, expanded)) = stack.pop() {
        if !expanded {
            if new_ids[idx].is_some() {
                continue;
            }
            if on_path[idx] {
                return Err(DictError::Cycle);
            }
            on_path[idx] = true;
            stack.push((idx, true));
            for &(_, child) in raw.nodes[idx].edges.iter().rev() {
                let child = child as usize;
                if on_path[child] {
                    return Err(DictError::Cycle);
                }
                if new_ids[child].is_none() {
                    stack.push((child, false));
                }
            }
            continue;
        }

        let raw_node = &raw.nodes[idx];
        let mut edges = Vec::with_capacity(raw_node.edges.len());
        let mut keys = usize::from(raw_node.value.is_some());
        for &(label, child) in &raw_node.edges {
            let id = new_ids[child as usize].ok_or(DictError::Cycle)?;
            keys += key_counts[id as usize];
            edges.push((label, id));
        }
        let value = raw_node.value.map(|old| {
            *value_ids.entry(old).or_insert_with(|| {
                values.push(raw.values[old as usize].clone());
                (values.len() - 1) as u32
            })
        });
        let node = Node { edges, value };

        let id = match canonical.get(&node) {
            Some(&existing) if merge => existing,
            _ => {
                let id = nodes.len() as NodeId;
                if merge {
                    canonical.insert(node.clone(), id);
                }
                nodes.push(node);
                key_counts.push(keys);
                id
            }
        };
        new_ids[idx] = Some(id);
        on_path[idx] = false;
    }

    let root = new_ids[0].ok_or(DictError::Cycle)?;
    let len = key_counts[root as usize];
    debug!(
        raw_nodes,
        nodes = nodes.len(),
        keys = len,
        values = values.len(),
        "trie rebuilt"
    );
    Ok(Trie::from_parts(nodes, root, values, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from(pairs: &[(&str, &str)]) -> RawTrie {
        let mut raw = RawTrie::new();
        for (k, v) in pairs {
            raw.insert(k, v);
        }
        raw
    }

    #[test]
    fn test_shared_suffixes_are_merged() {
        // "ka" and "kha" style keys ending in the same letter with the same value.
        let raw = raw_from(&[("ab", "1"), ("cb", "1"), ("db", "1")]);
        let before = raw.node_count();
        let trie = reduce(raw).unwrap();
        assert_eq!(before, 7);
        // root, one shared "b"-parent, one shared leaf.
        assert_eq!(trie.node_count(), 3);
        assert_eq!(trie.get("ab"), Some("1"));
        assert_eq!(trie.get("cb"), Some("1"));
        assert_eq!(trie.get("db"), Some("1"));
        assert_eq!(trie.get("b"), None);
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn test_different_values_are_not_merged() {
        let raw = raw_from(&[("ab", "1"), ("cb", "2")]);
        let trie = reduce(raw).unwrap();
        // root, two distinct parents, two distinct leaves.
        assert_eq!(trie.node_count(), 5);
        assert_eq!(trie.get("ab"), Some("1"));
        assert_eq!(trie.get("cb"), Some("2"));
    }

    #[test]
    fn test_same_structure_different_labels() {
        let raw = raw_from(&[("ab", "1"), ("cd", "1")]);
        let trie = reduce(raw).unwrap();
        // The leaves merge; the parents differ by edge label.
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn test_overwritten_values_are_dropped() {
        let mut raw = raw_from(&[("a", "old")]);
        raw.insert("a", "new");
        let trie = reduce(raw).unwrap();
        assert_eq!(trie.value_count(), 1);
        assert_eq!(trie.get("a"), Some("new"));
    }

    #[test]
    fn test_freeze_keeps_every_node() {
        let raw = raw_from(&[("ab", "1"), ("cb", "1")]);
        let before = raw.node_count();
        let trie = raw.freeze().unwrap();
        assert_eq!(trie.node_count(), before);
        assert_eq!(trie.get("cb"), Some("1"));
    }

    #[test]
    fn test_children_precede_parents() {
        let raw = raw_from(&[("abc", "1"), ("abd", "2"), ("x", "1")]);
        let trie = reduce(raw).unwrap();
        for (id, node) in trie.nodes.iter().enumerate() {
            for &(_, child) in &node.edges {
                assert!((child as usize) < id);
            }
        }
        assert_eq!(trie.root as usize, trie.nodes.len() - 1);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut raw = raw_from(&[("ab", "1")]);
        // Point the leaf back at the root.
        let leaf = raw.nodes.len() - 1;
        raw.nodes[leaf].edges.push(('z', 0));
        assert!(matches!(reduce(raw), Err(DictError::Cycle)));
    }

    #[test]
    fn test_empty_trie() {
        let trie = reduce(RawTrie::new()).unwrap();
        assert_eq!(trie.node_count(), 1);
        assert!(trie.is_empty());
        assert_eq!(trie.get(""), None);
    }

    #[test]
    fn test_deep_key_does_not_overflow() {
        let key = "ཀ".repeat(100_000);
        let raw = raw_from(&[(key.as_str(), "deep")]);
        let trie = reduce(raw).unwrap();
        assert_eq!(trie.get(&key), Some("deep"));
    }
}
