use crate::corpus::Corpus;
use crate::types::{Ari, BookId, LID_SPACE, Lid};
use anyhow::{Result, ensure};

/// Mapping between verse addresses and linear verse ids
pub trait LidMapping {
    /// Address of `lid`, None for 0 or ids past the last verse
    fn lid_to_ari(&self, lid: Lid) -> Option<Ari>;

    /// Book owning `lid`
    fn book_for_lid(&self, lid: Lid) -> Option<BookId> {
        self.lid_to_ari(lid).map(Ari::book)
    }

    fn ari_to_lid(&self, ari: Ari) -> Option<Lid>;

    /// Largest valid lid
    fn max_lid(&self) -> Lid;
}

/// Enumeration of every verse of a corpus in address order, lid 1 first.
#[derive(Debug, Clone)]
pub struct VerseTable {
    /// Indexed by lid; slot 0 holds [`Ari::NONE`]
    aris: Vec<Ari>,
}

impl VerseTable {
    /// Build from `(book, verse counts per chapter)` in book order
    pub fn from_verse_counts<I, C>(books: I) -> Result<Self>
    where
        I: IntoIterator<Item = (BookId, C)>,
        C: IntoIterator<Item = u8>,
    {
        let mut aris = vec![Ari::NONE];
        for (book, chapters) in books {
            for (chapter_0, verse_count) in chapters.into_iter().enumerate() {
                let chapter = u8::try_from(chapter_0 + 1)?;
                aris.extend((1..=verse_count).map(|v| Ari::encode(book, chapter, v)));
            }
        }

        ensure!(
            (aris.len() as u64) <= LID_SPACE as u64,
            "corpus has {} verses, more than the {} addressable lids",
            aris.len() - 1,
            LID_SPACE - 1
        );
        ensure!(
            aris.windows(2).all(|w| w[0] < w[1]),
            "verses must be enumerated in ascending address order"
        );

        Ok(Self { aris })
    }

    /// Enumerate the verses of `corpus`
    pub fn from_corpus<C: Corpus + ?Sized>(corpus: &C) -> Result<Self> {
        let books = corpus.books().iter().map(|book| {
            let counts: Vec<u8> = (1..=book.chapter_count)
                .map(|chapter| corpus.verse_count(book, chapter).unwrap_or(0))
                .collect();
            (book.id, counts)
        });
        Self::from_verse_counts(books.collect::<Vec<_>>())
    }

    /// Number of verses
    pub fn len(&self) -> usize {
        self.aris.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LidMapping for VerseTable {
    fn lid_to_ari(&self, lid: Lid) -> Option<Ari> {
        if lid == 0 {
            return None;
        }
        self.aris.get(lid as usize).copied()
    }

    fn ari_to_lid(&self, ari: Ari) -> Option<Lid> {
        self.aris[1..]
            .binary_search(&ari)
            .ok()
            .map(|i| i as Lid + 1)
    }

    fn max_lid(&self) -> Lid {
        self.len() as Lid
    }
}
