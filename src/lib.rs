//! # versefind - verse search over a scripture corpus
//!
//! Two engines answer the same queries:
//!
//! - [`query::GrepSearch`] scans lowercased chapter text directly and needs no
//!   external resources.
//! - [`query::IndexedSearch`] intersects posting lists from a prebuilt inverted
//!   index, then re-checks phrases against the text. If the index cannot be
//!   loaded it falls back to the grep engine.
//!
//! ## Modules
//!
//! - [`types`] - verse addresses, book scopes and queries
//! - [`query`] - tokenizer and both search engines
//! - [`index`] - index codec, lazy cache and statistics
//! - [`corpus`] - verse text access and the linear verse id mapping
//! - [`highlight`] - match spans for display
//! - [`output`] - terminal and JSON rendering
//! - [`utils`] - sorted intersection, text matching, config
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use versefind::corpus::{MemoryCorpus, VerseTable};
//! use versefind::index::{IndexCache, IndexSource};
//! use versefind::query::{IndexedSearch, SearchEngine};
//! use versefind::types::Query;
//!
//! let corpus = MemoryCorpus::open("kjv.json".as_ref(), 64)?;
//! let table = VerseTable::from_corpus(&corpus)?;
//! let cache = Arc::new(IndexCache::new(IndexSource::for_edition("indexes".as_ref(), "kjv")));
//!
//! let engine = IndexedSearch::new(&corpus, &table, &cache);
//! for ari in engine.search(&Query::new("+god love")) {
//!     println!("{ari}");
//! }
//! ```

pub mod corpus;
pub mod highlight;
pub mod index;
pub mod output;
pub mod query;
pub mod types;
pub mod utils;
