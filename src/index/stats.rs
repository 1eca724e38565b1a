use crate::index::cache::{IndexCache, IndexSource};
use crate::index::types::InvertedIndex;
use anyhow::Result;
use std::time::Instant;

/// Summary numbers for a decoded index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub word_count: usize,
    pub posting_count: u64,
    /// Word with the longest posting list and its length
    pub most_common: Option<(String, u64)>,
    /// Words grouped by length, as stored on disk: (length, count)
    pub words_by_length: Vec<(usize, usize)>,
}

impl IndexStats {
    pub fn collect(index: &InvertedIndex) -> Self {
        let mut by_length = std::collections::BTreeMap::new();
        let mut most_common: Option<(&str, u64)> = None;

        for entry in index.entries() {
            *by_length.entry(entry.word.chars().count()).or_insert(0usize) += 1;
            let n = entry.postings.len();
            if most_common.is_none_or(|(_, best)| n > best) {
                most_common = Some((&entry.word, n));
            }
        }

        Self {
            word_count: index.len(),
            posting_count: index.posting_total(),
            most_common: most_common.map(|(w, n)| (w.to_string(), n)),
            words_by_length: by_length.into_iter().collect(),
        }
    }
}

/// Display index statistics
pub fn show_stats(cache: &IndexCache) -> Result<()> {
    let start = Instant::now();
    let index = cache.acquire()?;
    let load_time = start.elapsed();
    let stats = IndexStats::collect(&index);

    println!("Index Statistics");
    println!("================");
    println!();
    if let IndexSource::File(path) = cache.source() {
        println!("Index location:   {}", path.display());
        if let Ok(meta) = std::fs::metadata(path) {
            println!("Index size:       {}", format_size(meta.len()));
        }
    }
    println!("Load time:        {:.1} ms", load_time.as_secs_f64() * 1000.0);
    println!("Word count:       {}", stats.word_count);
    println!("Posting count:    {}", stats.posting_count);
    if let Some((word, n)) = &stats.most_common {
        println!("Most common word: {} ({} verses)", word, n);
    }

    println!();
    println!("Words by length:");
    for (len, count) in &stats.words_by_length {
        println!("  {:3} {}", len, count);
    }

    Ok(())
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
