use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Book identifier, 0-based
pub type BookId = u8;

/// Linear verse id: dense 1-based enumeration of every verse in address order.
/// 0 is never a valid verse.
pub type Lid = u32;

/// Size of the lid working set (next power of two above the largest lid).
pub const LID_SPACE: u32 = 32768;

/// A verse address packed into 32 bits as `book << 16 | chapter << 8 | verse`.
///
/// Chapters and verses are 1-based. An address with verse 0 is a book-chapter
/// grouping key, and the all-zero address means "no value". Ordering follows
/// `(book, chapter, verse)` because of the packing, which the merge-join in
/// [`crate::utils::intersect_sorted`] depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ari(pub u32);

impl Ari {
    pub const NONE: Ari = Ari(0);

    #[inline]
    pub const fn encode(book: BookId, chapter: u8, verse: u8) -> Self {
        Ari(((book as u32) << 16) | ((chapter as u32) << 8) | verse as u32)
    }

    #[inline]
    pub const fn book(self) -> BookId {
        ((self.0 >> 16) & 0xff) as BookId
    }

    #[inline]
    pub const fn chapter(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    #[inline]
    pub const fn verse(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Strip the verse, leaving the book-chapter key
    #[inline]
    pub const fn book_chapter(self) -> Ari {
        Ari(self.0 & 0x00ff_ff00)
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Ari {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.book(), self.chapter(), self.verse())
    }
}

/// An ascending, duplicate-free list of verse addresses.
pub type ResultSet = Vec<Ari>;

/// Set of books a search is restricted to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookScope {
    books: BTreeSet<BookId>,
}

impl BookScope {
    pub fn new(books: impl IntoIterator<Item = BookId>) -> Self {
        Self {
            books: books.into_iter().collect(),
        }
    }

    #[inline]
    pub fn contains(&self, book: BookId) -> bool {
        self.books.contains(&book)
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = BookId> + '_ {
        self.books.iter().copied()
    }
}

impl FromStr for BookScope {
    type Err = String;

    /// Parse a comma list of book ids and inclusive ranges: `0,1,39..65`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_id = |t: &str| {
            t.trim()
                .parse::<BookId>()
                .map_err(|_| format!("invalid book id: {:?}", t.trim()))
        };

        let mut books = BTreeSet::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            match part.split_once("..") {
                Some((lo, hi)) => {
                    let (lo, hi) = (parse_id(lo)?, parse_id(hi)?);
                    if lo > hi {
                        return Err(format!("empty book range: {}", part.trim()));
                    }
                    books.extend(lo..=hi);
                }
                None => {
                    books.insert(parse_id(part)?);
                }
            }
        }
        Ok(Self { books })
    }
}

/// A search request: raw query string plus an optional book restriction.
/// `scope: None` searches the whole corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    pub query_string: String,
    pub scope: Option<BookScope>,
}

impl Query {
    pub fn new(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: BookScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Whether `book` is searched by this query
    #[inline]
    pub fn includes_book(&self, book: BookId) -> bool {
        self.scope.as_ref().is_none_or(|s| s.contains(book))
    }
}
