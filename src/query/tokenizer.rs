use crate::query::token::Token;
use regex::Regex;

/// Turns a raw query string into tokens
pub trait Tokenizer {
    fn tokenize(&self, raw: &str) -> Vec<Token>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, raw: &str) -> Vec<Token> {
        (**self).tokenize(raw)
    }
}

/// Default query syntax.
///
/// Whitespace separates words, a double-quoted span is one phrase token, and
/// a leading `+` on a word or quoted phrase asks for whole-word matching.
/// Everything is lowercased. Example: `"a b" c +"d e" +f` yields `a b`, `c`,
/// `+d e`, `+f`.
pub struct QueryTokenizer {
    pattern: Regex,
}

impl QueryTokenizer {
    pub fn new() -> Self {
        Self {
            // quoted phrase (closing quote optional) or a run of non-space
            pattern: Regex::new(r#"\+*"[^"]*"?|\S+"#).expect("static pattern"),
        }
    }
}

impl Default for QueryTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for QueryTokenizer {
    fn tokenize(&self, raw: &str) -> Vec<Token> {
        let lower = raw.to_lowercase();
        let mut tokens = Vec::new();

        for m in self.pattern.find_iter(&lower) {
            let mut token = Token::parse_marked(m.as_str());

            if let Some(quoted) = token.text.strip_prefix('"') {
                let quoted = quoted.strip_suffix('"').unwrap_or(quoted);
                token.text = quoted.split_whitespace().collect::<Vec<_>>().join(" ");
            }

            if !token.text.is_empty() {
                tokens.push(token);
            }
        }

        tokens
    }
}
