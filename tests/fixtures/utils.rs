//! Shared corpus and index builders for integration tests and benches

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use versefind::corpus::{BookText, MemoryCorpus, VerseTable};
use versefind::index::{IndexCache, IndexSource, IndexWriter};

/// Three short books with enough overlap to exercise whole-word, substring and
/// phrase matching
pub fn sample_books() -> Vec<BookText> {
    vec![
        BookText::new(
            0,
            "Genesis",
            vec![
                vec![
                    "In the beginning God created the heaven and the earth.",
                    "And the earth was without form, and void.",
                    "And God said, Let there be light: and there was light.",
                ],
                vec![
                    "Thus the heavens and the earth were finished.",
                    "And on the seventh day God ended his work which he had made.",
                ],
            ],
        ),
        BookText::new(
            1,
            "Exodus",
            vec![vec![
                "Now these are the names of the children of Israel.",
                "And the king spake to the Hebrew midwives.",
            ]],
        ),
        BookText::new(
            2,
            "Psalms",
            vec![
                vec![
                    "Blessed is the man that walketh not in the counsel of the ungodly.",
                    "But his delight is in the law of the LORD.",
                ],
                vec![
                    "For the godly man shall love the LORD his God.",
                    "Love and faith abide; faith worketh by love.",
                ],
            ],
        ),
    ]
}

pub fn sample_corpus() -> MemoryCorpus {
    MemoryCorpus::new(sample_books()).expect("sample corpus is valid")
}

const VOCABULARY: &[&str] = &[
    "and", "the", "lord", "god", "said", "unto", "him", "them", "light", "darkness", "love",
    "faith", "hope", "king", "people", "land", "water", "heaven", "earth", "spirit", "word",
    "blessed", "righteous", "wicked", "shepherd", "sheep", "bread", "wine", "temple", "city",
    "mountain", "river", "go", "come", "good", "evil", "truth", "grace", "peace", "glory",
];

/// Deterministic corpus of `books` x `chapters` x `verses` random verses
pub fn synthetic_corpus(books: u8, chapters: u8, verses: u8, seed: u64) -> MemoryCorpus {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let texts = (0..books)
        .map(|id| {
            let chapters: Vec<Vec<String>> = (0..chapters)
                .map(|_| {
                    (0..verses)
                        .map(|_| {
                            let len = 6 + (next() % 14) as usize;
                            let words: Vec<&str> = (0..len)
                                .map(|_| VOCABULARY[(next() % VOCABULARY.len() as u64) as usize])
                                .collect();
                            let mut verse = words.join(" ");
                            verse.push('.');
                            verse
                        })
                        .collect()
                })
                .collect();
            BookText::new(id, &format!("Book{id}"), chapters)
        })
        .collect();

    MemoryCorpus::new(texts).expect("synthetic corpus is valid")
}

pub fn vocabulary() -> &'static [&'static str] {
    VOCABULARY
}

pub fn verse_table(corpus: &MemoryCorpus) -> VerseTable {
    VerseTable::from_corpus(corpus).expect("corpus fits the lid space")
}

/// Encoded index for `corpus`
pub fn index_bytes(corpus: &MemoryCorpus) -> Vec<u8> {
    IndexWriter::from_corpus(corpus, &verse_table(corpus)).to_bytes()
}

/// Cache over an in-memory index of `corpus`
pub fn memory_cache(corpus: &MemoryCorpus) -> IndexCache {
    IndexCache::new(IndexSource::Memory(Arc::from(index_bytes(corpus))))
}

/// Write the index for `corpus` as the `edition` resource in `dir`
pub fn write_index(dir: &Path, edition: &str, corpus: &MemoryCorpus) -> PathBuf {
    let IndexSource::File(path) = IndexSource::for_edition(dir, edition) else {
        unreachable!("edition sources are files");
    };
    IndexWriter::from_corpus(corpus, &verse_table(corpus))
        .write_to_file(&path)
        .expect("index written");
    path
}
