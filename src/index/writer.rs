use crate::corpus::{Corpus, LidMapping};
use crate::types::{Ari, Lid};
use crate::utils::{MAX_ABSOLUTE_LID, encode_postings, write_i32_be, write_u16_be};
use ahash::AHashMap;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Counts reported after writing an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub words_written: usize,
    pub words_skipped: usize,
    pub postings_written: u64,
}

/// Accumulates word -> lid postings and serializes them in the index format
#[derive(Debug, Default)]
pub struct IndexWriter {
    postings: AHashMap<String, Vec<Lid>>,
}

impl IndexWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build postings for every word of every verse in `corpus`.
    ///
    /// Words are maximal runs of alphabetic chars of the lowercased text.
    pub fn from_corpus<C, M>(corpus: &C, mapping: &M) -> Self
    where
        C: Corpus + ?Sized,
        M: LidMapping + ?Sized,
    {
        let mut writer = Self::new();

        for book in corpus.books() {
            for chapter in 1..=book.chapter_count {
                let Some(verses) = corpus.chapter_verses_lowercased(book, chapter) else {
                    tracing::warn!(book = book.id, chapter, "chapter unavailable while indexing");
                    continue;
                };

                for (verse_0, text) in verses.iter().enumerate() {
                    let ari = Ari::encode(book.id, chapter, (verse_0 + 1) as u8);
                    let Some(lid) = mapping.ari_to_lid(ari) else {
                        continue;
                    };
                    for word in text.split(|c: char| !c.is_alphabetic()) {
                        if !word.is_empty() {
                            writer.add(word, lid);
                        }
                    }
                }
            }
        }

        writer
    }

    /// Record that `word` occurs in verse `lid`
    pub fn add(&mut self, word: &str, lid: Lid) {
        if let Some(lids) = self.postings.get_mut(word) {
            if lids.last() != Some(&lid) {
                lids.push(lid);
            }
            return;
        }
        self.postings.insert(word.to_string(), vec![lid]);
    }

    /// Number of distinct words collected
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Serialize to `out`.
    ///
    /// Words are grouped by byte length, shortest first. Words that cannot be
    /// represented (non Latin-1 chars, longer than 255 bytes, more than 65535
    /// postings, lids past the 15-bit range) are left out.
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<WriteSummary> {
        let mut summary = WriteSummary::default();
        let mut groups: BTreeMap<u8, Vec<(Vec<u8>, Vec<Lid>)>> = BTreeMap::new();

        for (word, lids) in &self.postings {
            let mut lids = lids.clone();
            lids.sort_unstable();
            lids.dedup();

            match encode_word(word) {
                Some(bytes)
                    if lids.len() <= u16::MAX as usize
                        && lids.last().is_none_or(|&l| l <= MAX_ABSOLUTE_LID) =>
                {
                    groups
                        .entry(bytes.len() as u8)
                        .or_default()
                        .push((bytes, lids));
                }
                _ => summary.words_skipped += 1,
            }
        }

        let total: usize = groups.values().map(Vec::len).sum();
        write_i32_be(out, total as i32)?;

        let mut buf = Vec::new();
        for (len, mut words) in groups {
            words.sort_unstable_by(|a, b| a.0.cmp(&b.0));

            out.write_all(&[len])?;
            write_i32_be(out, words.len() as i32)?;

            for (bytes, lids) in words {
                out.write_all(&bytes)?;
                write_u16_be(out, lids.len() as u16)?;
                buf.clear();
                encode_postings(&lids, &mut buf);
                out.write_all(&buf)?;

                summary.words_written += 1;
                summary.postings_written += lids.len() as u64;
            }
        }

        Ok(summary)
    }

    /// Serialize into a byte vector
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write(&mut bytes);
        bytes
    }

    /// Serialize to a file, replacing it if present
    pub fn write_to_file(&self, path: &Path) -> Result<WriteSummary> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        let summary = self.write(&mut out)?;
        out.flush()?;
        Ok(summary)
    }
}

/// One byte per char, only if every char is Latin-1 and the word fits a u8 length
fn encode_word(word: &str) -> Option<Vec<u8>> {
    let bytes: Option<Vec<u8>> = word.chars().map(|c| u8::try_from(c).ok()).collect();
    bytes.filter(|b| b.len() <= u8::MAX as usize)
}
