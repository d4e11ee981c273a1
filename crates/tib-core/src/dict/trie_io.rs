use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, info};

use super::{DictError, Node, NodeId, Trie};

pub(crate) const MAGIC: &[u8; 4] = b"TBTR";
pub(crate) const VERSION: u8 = 1;
pub(crate) const HEADER_SIZE: usize = 32;

const NO_VALUE: u32 = u32::MAX;

/// Write `trie` in the TBTR format.
pub fn store<W: Write>(trie: &Trie, mut sink: W) -> Result<(), DictError> {
    let bytes = trie.to_bytes()?;
    sink.write_all(&bytes).map_err(DictError::Serialization)?;
    sink.flush().map_err(DictError::Serialization)
}

/// Read a TBTR trie from `source`.
pub fn load<R: Read>(mut source: R) -> Result<Trie, DictError> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    Trie::from_bytes(&data)
}

fn to_u32(n: usize, what: &str) -> Result<u32, DictError> {
    n.try_into()
        .map_err(|_| DictError::Corrupt(format!("{what} exceeds u32::MAX")))
}

impl Trie {
    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let node_count = to_u32(self.nodes.len(), "node count")?;
        let edge_count = to_u32(self.edge_count(), "edge count")?;
        let value_count = to_u32(self.values.len(), "value count")?;
        let pool_len = to_u32(self.values.iter().map(String::len).sum(), "string pool")?;

        let mut body = Vec::with_capacity(
            (2 * self.nodes.len() + 2 * edge_count as usize + self.values.len() + 2) * 4
                + pool_len as usize,
        );
        let mut start = 0u32;
        body.extend_from_slice(&start.to_le_bytes());
        for node in &self.nodes {
            start += node.edges.len() as u32;
            body.extend_from_slice(&start.to_le_bytes());
        }
        for node in &self.nodes {
            body.extend_from_slice(&node.value.unwrap_or(NO_VALUE).to_le_bytes());
        }
        for node in &self.nodes {
            for &(label, _) in &node.edges {
                body.extend_from_slice(&(label as u32).to_le_bytes());
            }
        }
        for node in &self.nodes {
            for &(_, target) in &node.edges {
                body.extend_from_slice(&target.to_le_bytes());
            }
        }
        let mut offset = 0u32;
        body.extend_from_slice(&offset.to_le_bytes());
        for value in &self.values {
            offset += value.len() as u32;
            body.extend_from_slice(&offset.to_le_bytes());
        }
        for value in &self.values {
            body.extend_from_slice(value.as_bytes());
        }

        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]); // reserved
        buf.extend_from_slice(&node_count.to_le_bytes());
        buf.extend_from_slice(&edge_count.to_le_bytes());
        buf.extend_from_slice(&value_count.to_le_bytes());
        buf.extend_from_slice(&pool_len.to_le_bytes());
        buf.extend_from_slice(&self.root.to_le_bytes());
        buf.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        if data.len() < 5 {
            return Err(DictError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(DictError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }

        let mut header = Words::new(&data[8..HEADER_SIZE]);
        let node_count = header.next_usize()?;
        let edge_count = header.next_usize()?;
        let value_count = header.next_usize()?;
        let pool_len = header.next_usize()?;
        let root = header.next_u32()?;
        let stored = header.next_u32()?;

        let expected = (node_count + 1 + node_count + 2 * edge_count + value_count + 1) * 4
            + pool_len;
        let body = &data[HEADER_SIZE..];
        if body.len() < expected {
            return Err(DictError::InvalidHeader);
        }
        if body.len() > expected {
            return Err(DictError::Corrupt(format!(
                "{} trailing bytes",
                body.len() - expected
            )));
        }
        let computed = crc32fast::hash(body);
        if computed != stored {
            return Err(DictError::ChecksumMismatch { stored, computed });
        }
        if node_count == 0 {
            return Err(DictError::Corrupt("trie has no nodes".into()));
        }
        if root as usize >= node_count {
            return Err(DictError::Corrupt(format!("root {root} out of range")));
        }

        let mut words = Words::new(&body[..expected - pool_len]);
        let edge_starts = words.take(node_count + 1)?;
        let node_values = words.take(node_count)?;
        let labels = words.take(edge_count)?;
        let targets = words.take(edge_count)?;
        let value_starts = words.take(value_count + 1)?;
        let pool = &body[expected - pool_len..];

        let values = decode_values(&value_starts, pool)?;

        if edge_starts[0] != 0 || edge_starts[node_count] as usize != edge_count {
            return Err(DictError::Corrupt("edge offsets do not cover edge arrays".into()));
        }
        let mut nodes = Vec::with_capacity(node_count);
        let mut key_counts: Vec<usize> = Vec::with_capacity(node_count);
        for id in 0..node_count {
            let (lo, hi) = (edge_starts[id] as usize, edge_starts[id + 1] as usize);
            if lo > hi {
                return Err(DictError::Corrupt(format!("node {id}: edge offsets decrease")));
            }
            let value = match node_values[id] {
                NO_VALUE => None,
                v if (v as usize) < value_count => Some(v),
                v => return Err(DictError::Corrupt(format!("node {id}: value id {v} out of range"))),
            };
            let mut keys = usize::from(value.is_some());
            let mut edges = Vec::with_capacity(hi - lo);
            for e in lo..hi {
                let label = char::from_u32(labels[e]).ok_or_else(|| {
                    DictError::Corrupt(format!("node {id}: invalid label {:#x}", labels[e]))
                })?;
                if edges.last().is_some_and(|&(prev, _)| prev >= label) {
                    return Err(DictError::Corrupt(format!("node {id}: edges not sorted")));
                }
                // Children precede parents, which also rules out cycles.
                let target = targets[e];
                if target as usize >= id {
                    return Err(DictError::Corrupt(format!(
                        "node {id}: child {target} does not precede its parent"
                    )));
                }
                keys = keys
                    .checked_add(key_counts[target as usize])
                    .ok_or_else(|| DictError::Corrupt(format!("node {id}: key count overflow")))?;
                edges.push((label, target as NodeId));
            }
            key_counts.push(keys);
            nodes.push(Node { edges, value });
        }

        let len = key_counts[root as usize];
        debug!(node_count, edge_count, value_count, keys = len, "trie decoded");
        Ok(Trie::from_parts(nodes, root, values, len))
    }

    /// Write to `path` via a sibling temp file, so a failed write leaves no
    /// file at `path`.
    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        let bytes = self.to_bytes()?;
        let mut tmp_name = path.file_name().map(OsString::from).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(DictError::Serialization)?;
        }
        let written = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(DictError::Serialization(e));
        }
        info!(path = %path.display(), bytes = bytes.len(), "trie written");
        Ok(())
    }

    /// Open a TBTR file through a read-only memory map.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path).map_err(|source| DictError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        // SAFETY: The file is opened read-only and the mapping is dropped
        // before this function returns; decoding copies everything it keeps.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }
}

fn decode_values(starts: &[u32], pool: &[u8]) -> Result<Vec<String>, DictError> {
    if starts.first().copied() != Some(0) || starts.last().map(|&s| s as usize) != Some(pool.len()) {
        return Err(DictError::Corrupt("value offsets do not cover string pool".into()));
    }
    starts
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let (lo, hi) = (w[0] as usize, w[1] as usize);
            let bytes = pool
                .get(lo..hi)
                .ok_or_else(|| DictError::Corrupt(format!("value {i}: offsets decrease")))?;
            std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|_| DictError::Corrupt(format!("value {i}: invalid UTF-8")))
        })
        .collect()
}

/// Little-endian u32 reader over a byte slice.
struct Words<'a> {
    data: &'a [u8],
}

impl<'a> Words<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn next_u32(&mut self) -> Result<u32, DictError> {
        let (head, rest) = self.data.split_first_chunk::<4>().ok_or(DictError::InvalidHeader)?;
        self.data = rest;
        Ok(u32::from_le_bytes(*head))
    }

    fn next_usize(&mut self) -> Result<usize, DictError> {
        self.next_u32().map(|n| n as usize)
    }

    fn take(&mut self, n: usize) -> Result<Vec<u32>, DictError> {
        (0..n).map(|_| self.next_u32()).collect()
    }
}
