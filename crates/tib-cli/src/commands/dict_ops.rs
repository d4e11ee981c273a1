use std::fs;
use std::path::Path;

use tib_core::dict::Trie;

fn open(file: &str) -> Trie {
    die!(Trie::open(Path::new(file)), "Error opening {file}: {}")
}

pub fn info(file: &str) {
    let trie = open(file);
    let stats = trie.stats();
    let file_size = fs::metadata(file).map(|m| m.len()).unwrap_or(0);
    println!("File:   {file} ({file_size} bytes)");
    println!("Keys:   {}", stats.keys);
    println!("Nodes:  {}", stats.nodes);
    println!("Edges:  {}", stats.edges);
    println!(
        "Values: {} distinct ({} bytes)",
        stats.values, stats.value_bytes
    );
}

pub fn lookup(file: &str, key: &str) {
    let trie = open(file);
    match trie.get(key) {
        Some(value) => println!("{key}\t{value}"),
        None => {
            eprintln!("{key}: not found");
            std::process::exit(1);
        }
    }
}

pub fn prefix(file: &str, query: &str) {
    let trie = open(file);
    let mut found = false;
    for (len, value) in trie.common_prefix_search(query) {
        let key: String = query.chars().take(len).collect();
        println!("{key}\t{value}");
        found = true;
    }
    if !found {
        eprintln!("no key is a prefix of {query}");
    }
}

pub fn predict(file: &str, prefix: &str, max_results: usize) {
    let trie = open(file);
    for (key, value) in trie.predictive_search(prefix).take(max_results) {
        println!("{key}\t{value}");
    }
}
