use crate::corpus::{Book, Corpus, VERSE_SEPARATOR};
use crate::query::SearchEngine;
use crate::query::token::Token;
use crate::query::tokenizer::{QueryTokenizer, Tokenizer};
use crate::types::{Ari, Query, ResultSet};
use crate::utils::{WordFinder, intersect_sorted};
use std::time::Instant;

/// Sequential scan search.
///
/// Tokens are evaluated longest first. The first token scans every chapter in
/// scope; each later token only rescans the chapters that still have hits,
/// and its hits are intersected with the running result.
pub struct GrepSearch<'c, C: ?Sized, T = QueryTokenizer> {
    corpus: &'c C,
    tokenizer: T,
}

impl<'c, C: Corpus + ?Sized> GrepSearch<'c, C> {
    pub fn new(corpus: &'c C) -> Self {
        Self::with_tokenizer(corpus, QueryTokenizer::new())
    }
}

impl<'c, C: Corpus + ?Sized, T: Tokenizer> GrepSearch<'c, C, T> {
    pub fn with_tokenizer(corpus: &'c C, tokenizer: T) -> Self {
        Self { corpus, tokenizer }
    }

    /// Hits of `token` in every chapter of the books the query covers
    fn scan_scope(&self, token: &Token, query: &Query) -> ResultSet {
        let finder = token.finder();
        let mut hits = ResultSet::new();

        for book in self.corpus.books() {
            if !query.includes_book(book.id) {
                continue;
            }
            for chapter in 1..=book.chapter_count {
                self.scan_chapter(book, chapter, &finder, &mut hits);
            }
        }

        hits
    }

    /// Hits of `token` in the chapters that appear in `prev`, each read once
    fn scan_within(&self, token: &Token, prev: &[Ari]) -> ResultSet {
        let finder = token.finder();
        let mut hits = ResultSet::new();
        let mut chapters_read = 0usize;

        for run in prev.chunk_by(|a, b| a.book_chapter() == b.book_chapter()) {
            let key = run[0];
            let Some(book) = self.corpus.book(key.book()) else {
                continue;
            };
            self.scan_chapter(book, key.chapter(), &finder, &mut hits);
            chapters_read += 1;
        }

        tracing::trace!(candidates = prev.len(), chapters_read, "narrowed scan");
        hits
    }

    /// Append the verses of one chapter that contain `finder`'s needle
    fn scan_chapter(
        &self,
        book: &Book,
        chapter: u8,
        finder: &WordFinder<'_>,
        hits: &mut ResultSet,
    ) {
        let Some(text) = self.corpus.chapter_text_lowercased(book, chapter) else {
            tracing::warn!(book = book.id, chapter, "chapter text unavailable, skipping");
            return;
        };
        let bytes = text.as_bytes();

        let mut pos = 0;
        let mut counted_to = 0;
        let mut verse_0 = 0usize;
        let mut last_verse = None;

        while let Some(found) = finder.find_from(&text, pos) {
            verse_0 += memchr::memchr_iter(VERSE_SEPARATOR, &bytes[counted_to..found]).count();
            counted_to = found;

            if last_verse != Some(verse_0) {
                hits.push(Ari::encode(book.id, chapter, (verse_0 + 1) as u8));
                last_verse = Some(verse_0);
            }
            pos = found + finder.len();
        }
    }
}

impl<C: Corpus + ?Sized, T: Tokenizer> SearchEngine for GrepSearch<'_, C, T> {
    fn search(&self, query: &Query) -> ResultSet {
        let tokens = order_for_scan(self.tokenizer.tokenize(&query.query_string));
        let names: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        tracing::debug!(tokens = ?names, "grep search");

        let mut result: Option<ResultSet> = None;

        for token in &tokens {
            let start = Instant::now();
            let hits = match &result {
                None => self.scan_scope(token, query),
                Some(prev) => self.scan_within(token, prev),
            };
            tracing::debug!(
                token = %token,
                hits = hits.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "scanned token"
            );

            result = Some(match result {
                Some(prev) => intersect_sorted(&prev, &hits),
                None => hits,
            });
        }

        result.unwrap_or_default()
    }
}

/// Longest token first, ties alphabetical, duplicates removed.
///
/// Equal tokens end up adjacent under this order, so `dedup` removes all of them.
pub fn order_for_scan(mut tokens: Vec<Token>) -> Vec<Token> {
    tokens.sort_by(|a, b| {
        b.char_len()
            .cmp(&a.char_len())
            .then_with(|| a.text.cmp(&b.text))
            .then_with(|| a.mode.cmp(&b.mode))
    });
    tokens.dedup();
    tokens
}
