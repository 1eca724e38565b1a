use crate::utils::WordFinder;
use std::fmt;

/// Marker prefix that requests whole-word matching in query syntax
pub const REQUIRED_MARKER: char = '+';

/// How a token is matched against verse text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchMode {
    /// Anywhere, including inside longer words
    Substring,
    /// Only where not adjacent to another letter (`+word` in queries)
    WholeWord,
}

/// A lowercased query word or phrase with its match mode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub text: String,
    pub mode: MatchMode,
}

impl Token {
    pub fn new(text: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    pub fn substring(text: impl Into<String>) -> Self {
        Self::new(text, MatchMode::Substring)
    }

    pub fn whole_word(text: impl Into<String>) -> Self {
        Self::new(text, MatchMode::WholeWord)
    }

    /// Parse marker syntax: `+god` is a whole-word token, `god` a substring one
    pub fn parse_marked(raw: &str) -> Self {
        match raw.strip_prefix(REQUIRED_MARKER) {
            Some(rest) => Self::whole_word(rest.trim_start_matches(REQUIRED_MARKER)),
            None => Self::substring(raw),
        }
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.mode == MatchMode::WholeWord
    }

    /// A phrase of two or more space-separated words
    pub fn is_multiword(&self) -> bool {
        self.text.trim().contains(' ')
    }

    /// Split a phrase into its words, each carrying this token's mode
    pub fn split_phrase(&self) -> Vec<Token> {
        self.text
            .split_whitespace()
            .map(|w| Token::new(w, self.mode))
            .collect()
    }

    /// Matcher for this token's text and mode
    pub fn finder(&self) -> WordFinder<'_> {
        WordFinder::new(&self.text, self.is_required())
    }

    /// Char length, the selectivity heuristic used to order grep passes
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_required() {
            write!(f, "{}", REQUIRED_MARKER)?;
        }
        if self.is_multiword() {
            write!(f, "\"{}\"", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marked() {
        assert_eq!(Token::parse_marked("+god"), Token::whole_word("god"));
        assert_eq!(Token::parse_marked("god"), Token::substring("god"));
        assert_eq!(Token::parse_marked("++god"), Token::whole_word("god"));
    }

    #[test]
    fn test_split_phrase_keeps_mode() {
        let t = Token::whole_word("in the beginning");
        assert!(t.is_multiword());
        assert_eq!(
            t.split_phrase(),
            vec![
                Token::whole_word("in"),
                Token::whole_word("the"),
                Token::whole_word("beginning"),
            ]
        );
        assert!(!Token::substring("light").is_multiword());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::whole_word("d e").to_string(), "+\"d e\"");
        assert_eq!(Token::substring("f").to_string(), "f");
    }
}
