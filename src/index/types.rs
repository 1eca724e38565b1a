use crate::query::token::{MatchMode, Token};
use rayon::prelude::*;
use roaring::RoaringBitmap;

/// One dictionary word and the lids of the verses containing it
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    pub word: String,
    pub postings: RoaringBitmap,
}

/// Immutable word -> posting list dictionary, sorted by word
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    entries: Vec<WordEntry>,
}

impl InvertedIndex {
    /// Sort by word. When a word occurs more than once the last entry wins.
    pub fn from_entries(mut entries: Vec<WordEntry>) -> Self {
        // Stable, so duplicates keep their input order
        entries.sort_by(|a, b| a.word.cmp(&b.word));

        let mut unique: Vec<WordEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match unique.last_mut() {
                Some(last) if last.word == entry.word => *last = entry,
                _ => unique.push(entry),
            }
        }

        Self { entries: unique }
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    /// Posting list of an exact word
    pub fn get(&self, word: &str) -> Option<&RoaringBitmap> {
        self.entries
            .binary_search_by(|e| e.word.as_str().cmp(word))
            .ok()
            .map(|i| &self.entries[i].postings)
    }

    /// Total number of postings across all words
    pub fn posting_total(&self) -> u64 {
        self.entries.iter().map(|e| e.postings.len()).sum()
    }

    /// Union of the posting lists of every word `token` matches.
    ///
    /// A whole-word token matches only the identical dictionary word; a
    /// substring token matches every word containing it.
    pub fn matching(&self, token: &Token) -> RoaringBitmap {
        match token.mode {
            MatchMode::WholeWord => self.get(&token.text).cloned().unwrap_or_default(),
            MatchMode::Substring => {
                let finder = token.finder();
                self.entries
                    .par_iter()
                    .filter(|e| finder.is_match(&e.word))
                    .fold(RoaringBitmap::new, |mut acc, e| {
                        acc |= &e.postings;
                        acc
                    })
                    .reduce(RoaringBitmap::new, |a, b| a | b)
            }
        }
    }
}
