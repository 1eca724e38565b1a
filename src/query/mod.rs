//! Query tokens and the two search strategies.
//!
//! - [`GrepSearch`] scans chapter text token by token, narrowing as it goes
//! - [`IndexedSearch`] combines posting lists from the inverted index and
//!   falls back to [`GrepSearch`] when no index can be loaded
//!
//! Both return addresses in ascending order without duplicates.

pub mod grep;
pub mod indexed;
pub mod token;
pub mod tokenizer;

pub use grep::GrepSearch;
pub use indexed::{IndexedSearch, TokenPlan};
pub use token::{MatchMode, Token};
pub use tokenizer::{QueryTokenizer, Tokenizer};

use crate::types::{Query, ResultSet};

/// A search strategy
pub trait SearchEngine {
    fn search(&self, query: &Query) -> ResultSet;
}

/// Whether `text` contains every token (whole word or substring per token).
///
/// Matching is case sensitive; lowercase both sides first.
pub fn satisfies_query(text: &str, tokens: &[Token]) -> bool {
    tokens.iter().all(|t| t.finder().is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfies_query() {
        let text = "and god said, let there be light";
        assert!(satisfies_query(text, &[Token::whole_word("god"), Token::substring("ligh")]));
        assert!(!satisfies_query(text, &[Token::whole_word("go")]));
        assert!(satisfies_query(text, &[Token::substring("go")]));
        assert!(satisfies_query(text, &[]));
    }
}
