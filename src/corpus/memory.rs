use crate::corpus::{Book, Corpus};
use crate::types::{Ari, BookId};
use anyhow::{Context, Result, ensure};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// [`crate::corpus::VERSE_SEPARATOR`] as a str for joining
const SEPARATOR_STR: &str = "\n";

/// Default number of lowercased chapters kept by the cache
pub const DEFAULT_CHAPTER_CACHE: usize = 64;

/// Book text as stored in a corpus file: chapters of verses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookText {
    pub id: BookId,
    pub name: String,
    pub chapters: Vec<Vec<String>>,
}

impl BookText {
    pub fn new<S: Into<String>>(id: BookId, name: &str, chapters: Vec<Vec<S>>) -> Self {
        Self {
            id,
            name: name.to_string(),
            chapters: chapters
                .into_iter()
                .map(|verses| verses.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct CorpusFile {
    books: Vec<BookText>,
}

/// A lowercased chapter, in both shapes the engines ask for
struct LoweredChapter {
    joined: Arc<str>,
    verses: Arc<[String]>,
}

/// Corpus held entirely in memory.
///
/// Lowercased chapters are derived on demand and kept in an LRU cache, since
/// grep passes over a narrowed result revisit the same chapters.
pub struct MemoryCorpus {
    books: Vec<Book>,
    texts: Vec<BookText>,
    /// book id -> position in `books`
    positions: Vec<Option<usize>>,
    lowered: Mutex<LruCache<Ari, Arc<LoweredChapter>>>,
}

impl MemoryCorpus {
    pub fn new(texts: Vec<BookText>) -> Result<Self> {
        Self::with_cache_size(texts, DEFAULT_CHAPTER_CACHE)
    }

    pub fn with_cache_size(mut texts: Vec<BookText>, cache_size: usize) -> Result<Self> {
        texts.sort_by_key(|b| b.id);

        let mut positions = vec![None; 256];
        let mut books = Vec::with_capacity(texts.len());

        for (pos, text) in texts.iter().enumerate() {
            ensure!(
                positions[text.id as usize].is_none(),
                "duplicate book id {}",
                text.id
            );
            ensure!(
                text.chapters.len() <= u8::MAX as usize,
                "book {} has {} chapters (max 255)",
                text.name,
                text.chapters.len()
            );
            for (i, verses) in text.chapters.iter().enumerate() {
                ensure!(
                    verses.len() <= u8::MAX as usize,
                    "{} {} has {} verses (max 255)",
                    text.name,
                    i + 1,
                    verses.len()
                );
                ensure!(
                    !verses.iter().any(|v| v.contains(SEPARATOR_STR)),
                    "{} {} has a line break inside a verse",
                    text.name,
                    i + 1
                );
            }

            positions[text.id as usize] = Some(pos);
            books.push(Book {
                id: text.id,
                name: text.name.clone(),
                chapter_count: text.chapters.len() as u8,
            });
        }

        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            books,
            texts,
            positions,
            lowered: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Load a corpus from a JSON file of the form
    /// `{"books": [{"id": 0, "name": "Genesis", "chapters": [["verse", ...], ...]}]}`
    pub fn open(path: &Path, cache_size: usize) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open corpus {}", path.display()))?;
        let parsed: CorpusFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse corpus {}", path.display()))?;
        Self::with_cache_size(parsed.books, cache_size)
    }

    /// Total number of verses
    pub fn verse_total(&self) -> usize {
        self.texts
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(|c| c.len())
            .sum()
    }

    fn chapter(&self, book: BookId, chapter: u8) -> Option<&[String]> {
        let pos = self.positions[book as usize]?;
        let index = (chapter as usize).checked_sub(1)?;
        self.texts[pos].chapters.get(index).map(Vec::as_slice)
    }

    fn lowered(&self, book: &Book, chapter: u8) -> Option<Arc<LoweredChapter>> {
        let key = Ari::encode(book.id, chapter, 0);

        {
            let mut cache = self.lowered.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = cache.get(&key) {
                return Some(Arc::clone(hit));
            }
        }

        let verses: Vec<String> = self
            .chapter(book.id, chapter)?
            .iter()
            .map(|v| v.to_lowercase())
            .collect();
        let joined = verses.join(SEPARATOR_STR);

        let entry = Arc::new(LoweredChapter {
            joined: Arc::from(joined),
            verses: Arc::from(verses),
        });

        let mut cache = self.lowered.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(key, Arc::clone(&entry));
        Some(entry)
    }
}

impl Corpus for MemoryCorpus {
    fn books(&self) -> &[Book] {
        &self.books
    }

    fn book(&self, id: BookId) -> Option<&Book> {
        self.positions[id as usize].map(|pos| &self.books[pos])
    }

    fn verse_count(&self, book: &Book, chapter: u8) -> Option<u8> {
        self.chapter(book.id, chapter).map(|verses| verses.len() as u8)
    }

    fn chapter_text_lowercased(&self, book: &Book, chapter: u8) -> Option<Arc<str>> {
        self.lowered(book, chapter).map(|c| Arc::clone(&c.joined))
    }

    fn chapter_verses_lowercased(&self, book: &Book, chapter: u8) -> Option<Arc<[String]>> {
        self.lowered(book, chapter).map(|c| Arc::clone(&c.verses))
    }

    fn verse_text(&self, ari: Ari) -> Option<&str> {
        let index = (ari.verse() as usize).checked_sub(1)?;
        self.chapter(ari.book(), ari.chapter())?
            .get(index)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::VERSE_SEPARATOR;

    fn corpus() -> MemoryCorpus {
        MemoryCorpus::new(vec![
            BookText::new(1, "Exodus", vec![vec!["Now These are the names"]]),
            BookText::new(
                0,
                "Genesis",
                vec![
                    vec!["In the Beginning", "And the earth"],
                    vec!["Thus the heavens"],
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_separator_str_matches_byte() {
        assert_eq!(SEPARATOR_STR.as_bytes(), &[VERSE_SEPARATOR]);
    }

    #[test]
    fn test_books_are_consecutive() {
        let c = corpus();
        let ids: Vec<BookId> = c.books().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(c.book(0).unwrap().chapter_count, 2);
        assert!(c.book(5).is_none());
    }

    #[test]
    fn test_chapter_text_joined_lowercase() {
        let c = corpus();
        let genesis = c.book(0).unwrap().clone();
        let text = c.chapter_text_lowercased(&genesis, 1).unwrap();
        assert_eq!(&*text, "in the beginning\nand the earth");

        let verses = c.chapter_verses_lowercased(&genesis, 1).unwrap();
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[1], "and the earth");

        assert!(c.chapter_text_lowercased(&genesis, 3).is_none());
        assert!(c.chapter_text_lowercased(&genesis, 0).is_none());
    }

    #[test]
    fn test_cache_returns_same_chapter() {
        let c = MemoryCorpus::with_cache_size(
            vec![BookText::new(0, "Genesis", vec![vec!["A"], vec!["B"]])],
            1,
        )
        .unwrap();
        let genesis = c.book(0).unwrap().clone();

        let first = c.chapter_text_lowercased(&genesis, 1).unwrap();
        let again = c.chapter_text_lowercased(&genesis, 1).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        // Evicted by chapter 2, then rebuilt with the same content
        c.chapter_text_lowercased(&genesis, 2).unwrap();
        let rebuilt = c.chapter_text_lowercased(&genesis, 1).unwrap();
        assert_eq!(first, rebuilt);
    }

    #[test]
    fn test_verse_text() {
        let c = corpus();
        assert_eq!(c.verse_text(Ari::encode(0, 1, 2)), Some("And the earth"));
        assert_eq!(c.verse_text(Ari::encode(0, 1, 3)), None);
        assert_eq!(c.verse_text(Ari::encode(0, 1, 0)), None);
    }

    #[test]
    fn test_duplicate_book_rejected() {
        let result = MemoryCorpus::new(vec![
            BookText::new(0, "Genesis", vec![vec!["a"]]),
            BookText::new(0, "Genesis", vec![vec!["b"]]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_line_break_in_verse_rejected() {
        let result = MemoryCorpus::new(vec![BookText::new(
            0,
            "Genesis",
            vec![vec!["first line\ncontinued", "light here"]],
        )]);
        let err = result.err().unwrap();
        assert!(err.to_string().contains("line break"), "{err}");
    }

    #[test]
    fn test_open_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(
            &path,
            r#"{"books": [{"id": 0, "name": "Genesis", "chapters": [["In the beginning"]]}]}"#,
        )
        .unwrap();

        let c = MemoryCorpus::open(&path, 4).unwrap();
        assert_eq!(c.verse_total(), 1);
        assert_eq!(c.verse_text(Ari::encode(0, 1, 1)), Some("In the beginning"));
    }
}
