use crate::corpus::{Corpus, LidMapping};
use crate::index::{IndexCache, InvertedIndex};
use crate::query::SearchEngine;
use crate::query::grep::GrepSearch;
use crate::query::token::Token;
use crate::query::tokenizer::{QueryTokenizer, Tokenizer};
use crate::types::{Ari, LID_SPACE, Query, ResultSet};
use crate::utils::WordFinder;
use roaring::RoaringBitmap;
use rustc_hash::FxHashSet;
use std::time::Instant;

/// Query tokens split into what the index can answer and what it cannot
#[derive(Debug, Default, PartialEq)]
pub struct TokenPlan {
    /// Single words, first-seen order, no duplicates
    pub words: Vec<Token>,
    /// Phrases, re-checked against verse text after the index lookup
    pub phrases: Vec<Token>,
}

impl TokenPlan {
    /// Each phrase contributes its words (with the phrase's match mode) and is
    /// also kept whole for verification.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let mut plan = TokenPlan::default();
        let mut seen_tokens = FxHashSet::default();
        let mut seen_words = FxHashSet::default();

        for token in tokens {
            if !seen_tokens.insert(token.clone()) {
                continue;
            }
            if token.is_multiword() {
                for word in token.split_phrase() {
                    if seen_words.insert(word.clone()) {
                        plan.words.push(word);
                    }
                }
                plan.phrases.push(token);
            } else if seen_words.insert(token.clone()) {
                plan.words.push(token);
            }
        }

        plan
    }
}

/// Inverted-index search.
///
/// Each word token selects the union of the posting lists of the dictionary
/// words it matches; the per-token sets are intersected. Phrases are then
/// verified against chapter text. Without a usable index the query is handed
/// to [`GrepSearch`].
pub struct IndexedSearch<'c, C: ?Sized, M: ?Sized, T = QueryTokenizer> {
    corpus: &'c C,
    mapping: &'c M,
    cache: &'c IndexCache,
    tokenizer: T,
}

impl<'c, C: Corpus + ?Sized, M: LidMapping + ?Sized> IndexedSearch<'c, C, M> {
    pub fn new(corpus: &'c C, mapping: &'c M, cache: &'c IndexCache) -> Self {
        Self::with_tokenizer(corpus, mapping, cache, QueryTokenizer::new())
    }
}

impl<'c, C, M, T> IndexedSearch<'c, C, M, T>
where
    C: Corpus + ?Sized,
    M: LidMapping + ?Sized,
    T: Tokenizer,
{
    pub fn with_tokenizer(
        corpus: &'c C,
        mapping: &'c M,
        cache: &'c IndexCache,
        tokenizer: T,
    ) -> Self {
        Self {
            corpus,
            mapping,
            cache,
            tokenizer,
        }
    }

    /// AND of the per-token posting unions, over the full lid space
    fn candidate_lids(&self, index: &InvertedIndex, words: &[Token]) -> RoaringBitmap {
        let mut passing = RoaringBitmap::new();
        passing.insert_range(0..LID_SPACE);

        for token in words {
            let start = Instant::now();
            let matched = index.matching(token);
            passing &= &matched;
            tracing::debug!(
                token = %token,
                matched = matched.len(),
                remaining = passing.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "gathered lids"
            );
        }

        passing
    }

    /// Map lids to addresses, dropping invalid ids and books outside the scope
    fn lids_to_aris(&self, lids: &RoaringBitmap, query: &Query) -> ResultSet {
        let scope = query
            .scope
            .as_ref()
            .filter(|scope| !self.corpus.books().iter().all(|b| scope.contains(b.id)));

        let mut result = ResultSet::with_capacity(lids.len() as usize);
        for lid in lids {
            if let Some(scope) = scope {
                match self.mapping.book_for_lid(lid) {
                    Some(book) if scope.contains(book) => {}
                    _ => continue,
                }
            }
            match self.mapping.lid_to_ari(lid) {
                Some(ari) if !ari.is_none() => result.push(ari),
                _ => {}
            }
        }
        result
    }

    /// Keep the candidates whose verse text contains every phrase
    fn verify_phrases(&self, candidates: ResultSet, phrases: &[Token]) -> ResultSet {
        let finders: Vec<WordFinder<'_>> = phrases.iter().map(Token::finder).collect();
        let mut verified = ResultSet::with_capacity(candidates.len());

        for run in candidates.chunk_by(|a, b| a.book_chapter() == b.book_chapter()) {
            let key = run[0];
            let verses = self
                .corpus
                .book(key.book())
                .and_then(|book| self.corpus.chapter_verses_lowercased(book, key.chapter()));
            let Some(verses) = verses else {
                tracing::warn!(
                    book = key.book(),
                    chapter = key.chapter(),
                    "chapter unavailable for phrase check"
                );
                continue;
            };

            for &ari in run {
                let Some(text) = (ari.verse() as usize)
                    .checked_sub(1)
                    .and_then(|i| verses.get(i))
                else {
                    continue;
                };
                if finders.iter().all(|f| f.is_match(text)) {
                    verified.push(ari);
                }
            }
        }

        verified
    }
}

impl<C, M, T> SearchEngine for IndexedSearch<'_, C, M, T>
where
    C: Corpus + ?Sized,
    M: LidMapping + ?Sized,
    T: Tokenizer,
{
    fn search(&self, query: &Query) -> ResultSet {
        let index = match self.cache.acquire() {
            Ok(index) => index,
            Err(e) => {
                tracing::debug!(reason = %e, "index unavailable, using grep search");
                return GrepSearch::with_tokenizer(self.corpus, &self.tokenizer).search(query);
            }
        };

        let start = Instant::now();
        let plan = TokenPlan::from_tokens(self.tokenizer.tokenize(&query.query_string));
        if plan.words.is_empty() {
            return ResultSet::new();
        }

        let lids = self.candidate_lids(&index, &plan.words);
        let candidates = self.lids_to_aris(&lids, query);
        tracing::debug!(
            candidates = candidates.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "converted lids"
        );

        if plan.phrases.is_empty() {
            return candidates;
        }

        let verified = self.verify_phrases(candidates, &plan.phrases);
        tracing::debug!(
            verified = verified.len(),
            phrases = plan.phrases.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "filtered phrases"
        );
        verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{BookText, MemoryCorpus, VerseTable};
    use crate::index::{IndexSource, IndexWriter};
    use crate::types::BookScope;
    use std::sync::Arc;

    struct Fixture {
        corpus: MemoryCorpus,
        table: VerseTable,
        cache: IndexCache,
    }

    impl Fixture {
        fn new() -> Self {
            let corpus = MemoryCorpus::new(vec![
                BookText::new(
                    0,
                    "Genesis",
                    vec![
                        vec![
                            "In the beginning God created the heaven and the earth.",
                            "And God said, Let there be light: and there was light.",
                            "And God saw the light, that it was good.",
                        ],
                        vec!["The godly shall see light in the beginning."],
                    ],
                ),
                BookText::new(1, "Exodus", vec![vec!["God spake all these words."]]),
            ])
            .unwrap();
            let table = VerseTable::from_corpus(&corpus).unwrap();
            let bytes = IndexWriter::from_corpus(&corpus, &table).to_bytes();
            let cache = IndexCache::new(IndexSource::Memory(Arc::from(bytes)));
            Self { corpus, table, cache }
        }

        fn search(&self, q: &str) -> ResultSet {
            self.search_query(&Query::new(q))
        }

        fn search_query(&self, q: &Query) -> ResultSet {
            IndexedSearch::new(&self.corpus, &self.table, &self.cache).search(q)
        }
    }

    #[test]
    fn test_token_plan() {
        let plan = TokenPlan::from_tokens(vec![
            Token::substring("a b"),
            Token::substring("c"),
            Token::whole_word("d e"),
            Token::whole_word("f"),
            Token::substring("c"),
            Token::substring("b"),
        ]);
        assert_eq!(
            plan.words,
            vec![
                Token::substring("a"),
                Token::substring("b"),
                Token::substring("c"),
                Token::whole_word("d"),
                Token::whole_word("e"),
                Token::whole_word("f"),
            ]
        );
        assert_eq!(plan.phrases, vec![Token::substring("a b"), Token::whole_word("d e")]);
    }

    #[test]
    fn test_and_of_words() {
        let f = Fixture::new();
        assert_eq!(
            f.search("light god"),
            vec![Ari::encode(0, 1, 2), Ari::encode(0, 1, 3), Ari::encode(0, 2, 1)]
        );
        assert_eq!(f.search("+god light"), vec![Ari::encode(0, 1, 2), Ari::encode(0, 1, 3)]);
    }

    #[test]
    fn test_substring_matches_dictionary_words() {
        let f = Fixture::new();
        // "begin" is inside "beginning"
        assert_eq!(f.search("begin"), vec![Ari::encode(0, 1, 1), Ari::encode(0, 2, 1)]);
        assert!(f.search("+begin").is_empty());
    }

    #[test]
    fn test_phrase_verification() {
        let f = Fixture::new();
        assert_eq!(f.search("\"the beginning\""), vec![Ari::encode(0, 1, 1), Ari::encode(0, 2, 1)]);
        // Both words occur in 1:3 but not as a phrase
        assert_eq!(f.search("\"light that\""), Vec::<Ari>::new());
        assert_eq!(f.search("\"the light\""), vec![Ari::encode(0, 1, 3)]);
    }

    #[test]
    fn test_scope_filter() {
        let f = Fixture::new();
        let q = Query::new("+god").with_scope(BookScope::new([1]));
        assert_eq!(f.search_query(&q), vec![Ari::encode(1, 1, 1)]);

        // Scope naming every corpus book behaves like no scope
        let q = Query::new("+god").with_scope(BookScope::new([0, 1]));
        assert_eq!(f.search_query(&q), f.search("+god"));
    }

    #[test]
    fn test_empty_query() {
        let f = Fixture::new();
        assert!(f.search("").is_empty());
    }

    #[test]
    fn test_fallback_without_index() {
        let f = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let missing = IndexCache::new(IndexSource::for_edition(dir.path(), "none"));

        let indexed = IndexedSearch::new(&f.corpus, &f.table, &missing);
        let grep = GrepSearch::new(&f.corpus);
        for q in ["god", "+god light", "\"the beginning\"", "nothing"] {
            let q = Query::new(q);
            assert_eq!(indexed.search(&q), grep.search(&q));
        }
    }
}
