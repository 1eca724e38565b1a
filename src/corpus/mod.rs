//! Read-only access to the scripture text.
//!
//! - [`Corpus`] - the accessor both search engines scan
//! - [`MemoryCorpus`] - in-memory corpus loadable from JSON, with a chapter cache
//! - [`VerseTable`] - lid <-> address enumeration ([`LidMapping`])

pub mod memory;
pub mod verse_table;

pub use memory::{BookText, MemoryCorpus};
pub use verse_table::{LidMapping, VerseTable};

use crate::types::{Ari, BookId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Verse separator inside a joined chapter text
pub const VERSE_SEPARATOR: u8 = b'\n';

/// A book of the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub chapter_count: u8,
}

/// Read-only corpus accessor
pub trait Corpus {
    /// All books in consecutive (ascending id) order
    fn books(&self) -> &[Book];

    fn book(&self, id: BookId) -> Option<&Book>;

    /// Number of verses in a chapter, None if the chapter does not exist
    fn verse_count(&self, book: &Book, chapter: u8) -> Option<u8>;

    /// Lowercased chapter text with verses joined by [`VERSE_SEPARATOR`]
    fn chapter_text_lowercased(&self, book: &Book, chapter: u8) -> Option<Arc<str>>;

    /// Lowercased chapter text, one entry per verse
    fn chapter_verses_lowercased(&self, book: &Book, chapter: u8) -> Option<Arc<[String]>>;

    /// Original text of a single verse
    fn verse_text(&self, ari: Ari) -> Option<&str>;
}
