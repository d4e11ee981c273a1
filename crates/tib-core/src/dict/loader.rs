use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug_span, info};

use super::{reduce, DictError, RawTrie, Trie};

/// Insert every `<key> <value>` line of `reader` into `trie`.
///
/// The key ends at the first space; the rest of the line, further spaces
/// included, is the value. Later lines overwrite earlier ones. Returns the
/// number of lines read.
pub fn parse_source<R: BufRead>(
    reader: R,
    source_name: &str,
    trie: &mut RawTrie,
) -> Result<usize, DictError> {
    let mut count = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let malformed = |reason| DictError::MalformedLine {
            source_name: source_name.to_string(),
            line_no: i + 1,
            line: line.clone(),
            reason,
        };
        let (key, value) = line.split_once(' ').ok_or_else(|| malformed("no space"))?;
        if key.is_empty() {
            return Err(malformed("empty key"));
        }
        if value.is_empty() {
            return Err(malformed("empty value"));
        }
        trie.insert(key, value);
        count += 1;
    }
    Ok(count)
}

/// Load every source into one [`RawTrie`], in order.
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> Result<RawTrie, DictError> {
    let mut trie = RawTrie::new();
    for path in paths {
        let path = path.as_ref();
        let unreadable = |source| DictError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let lines = parse_source(BufReader::new(file), &path.display().to_string(), &mut trie)
            .map_err(|e| match e {
                DictError::Io(source) => unreadable(source),
                other => other,
            })?;
        info!(path = %path.display(), lines, keys = trie.len(), "loaded dictionary source");
    }
    Ok(trie)
}

/// Load `paths` and freeze the result, merging shared subtrees when
/// `optimize` is set.
pub fn build_trie<P: AsRef<Path>>(paths: &[P], optimize: bool) -> Result<Trie, DictError> {
    let _span = debug_span!("build_trie", sources = paths.len(), optimize).entered();
    let raw = load_sources(paths)?;
    let raw_nodes = raw.node_count();
    let trie = if optimize { reduce(raw)? } else { raw.freeze()? };
    info!(
        keys = trie.len(),
        raw_nodes,
        nodes = trie.node_count(),
        "trie built"
    );
    Ok(trie)
}
