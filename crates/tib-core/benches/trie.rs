use criterion::{criterion_group, criterion_main, Criterion};
use tib_core::dict::{reduce, RawTrie, Trie};

const SYLLABLES: &[&str] = &[
    "ཀ", "ཁ", "ག", "ང", "ཅ", "ཆ", "ཇ", "ཉ", "ཏ", "ཐ", "ད", "ན", "པ", "ཕ", "བ", "མ",
];
const TAGS: &[&str] = &["NOUN", "VERB", "ADJ", "PART"];

fn bench_raw() -> RawTrie {
    let mut raw = RawTrie::new();
    for (i, a) in SYLLABLES.iter().enumerate() {
        for (j, b) in SYLLABLES.iter().enumerate() {
            for c in SYLLABLES {
                raw.insert(&format!("{a}{b}་{c}"), TAGS[(i + j) % TAGS.len()]);
            }
        }
    }
    raw
}

fn bench_reduce(c: &mut Criterion) {
    let raw = bench_raw();
    c.bench_function("trie/reduce", |b| b.iter(|| reduce(raw.clone()).unwrap()));
}

fn bench_lookup(c: &mut Criterion) {
    let trie = reduce(bench_raw()).unwrap();
    let bytes = trie.to_bytes().unwrap();
    c.bench_function("trie/common_prefix_search", |b| {
        b.iter(|| trie.common_prefix_search("ཀཁ་གངཅ").count())
    });
    c.bench_function("trie/from_bytes", |b| b.iter(|| Trie::from_bytes(&bytes).unwrap()));
}

criterion_group!(benches, bench_reduce, bench_lookup);
criterion_main!(benches);
