//! Marking query words inside verse text.

use crate::query::Token;
use crate::utils::{LoweredText, WordFinder};
use std::io;
use std::ops::Range;
use termcolor::{Color, ColorSpec, WriteColor};

/// A highlighted byte range of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub range: Range<usize>,
    pub bold: bool,
    pub color: Color,
}

/// Text plus the spans to emphasize, in ascending non-overlapping order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    pub text: &'a str,
    pub spans: Vec<HighlightSpan>,
}

impl<'a> Highlighted<'a> {
    /// Split the text into consecutive pieces, each with its span if highlighted
    pub fn segments(&self) -> Vec<(&'a str, Option<&HighlightSpan>)> {
        let mut out = Vec::with_capacity(self.spans.len() * 2 + 1);
        let mut pos = 0;
        for span in &self.spans {
            if span.range.start > pos {
                out.push((&self.text[pos..span.range.start], None));
            }
            out.push((&self.text[span.range.clone()], Some(span)));
            pos = span.range.end;
        }
        if pos < self.text.len() {
            out.push((&self.text[pos..], None));
        }
        out
    }

    /// Render with terminal colors
    pub fn write_to<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        for (piece, span) in self.segments() {
            match span {
                Some(span) => {
                    out.set_color(ColorSpec::new().set_fg(Some(span.color)).set_bold(span.bold))?;
                    out.write_all(piece.as_bytes())?;
                    out.reset()?;
                }
                None => out.write_all(piece.as_bytes())?,
            }
        }
        Ok(())
    }
}

/// Find the spans of `text` to highlight for `words`.
///
/// Scans left to right: at each step the earliest occurrence of any word at or
/// after the cursor wins (the earlier word on ties), is marked, and the cursor
/// jumps past it. Occurrences that begin inside an already marked span are
/// never reported. Text and words are lowercased with the same mapping; spans
/// index the original `text` and always cover whole chars.
pub fn highlight<'a>(text: &'a str, words: &[Token], color: Color) -> Highlighted<'a> {
    let lowered_words: Vec<(String, bool)> = words
        .iter()
        .filter(|w| !w.text.is_empty())
        .map(|w| (w.text.to_lowercase(), w.is_required()))
        .collect();
    let finders: Vec<WordFinder<'_>> = lowered_words
        .iter()
        .map(|(word, whole)| WordFinder::new(word, *whole))
        .collect();

    let lowered = LoweredText::new(text);
    let plain = lowered.as_str();
    let mut spans = Vec::new();
    let mut pos = 0;

    loop {
        let earliest = finders
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.find_from(plain, pos).map(|at| (at, i)))
            .min_by_key(|&(at, _)| at);

        let Some((start, i)) = earliest else {
            break;
        };
        let range = lowered.original_range(start, start + finders[i].len());
        pos = lowered.lowered_offset(range.end);
        spans.push(HighlightSpan {
            range,
            bold: true,
            color,
        });
    }

    Highlighted { text, spans }
}

/// Parse a color name (`yellow`, `red`, `214`, `255,128,0`)
pub fn parse_color(name: &str) -> Option<Color> {
    name.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(h: &Highlighted<'_>) -> Vec<Range<usize>> {
        h.spans.iter().map(|s| s.range.clone()).collect()
    }

    #[test]
    fn test_leftmost_greedy_no_overlap() {
        let words = [Token::substring("abc"), Token::substring("bc")];
        let h = highlight("abcabc", &words, Color::Yellow);
        assert_eq!(ranges(&h), vec![0..3, 3..6]);
    }

    #[test]
    fn test_tie_goes_to_first_word() {
        let words = [Token::substring("ab"), Token::substring("abc")];
        let h = highlight("abc", &words, Color::Red);
        assert_eq!(ranges(&h), vec![0..2]);
    }

    #[test]
    fn test_required_words_and_case() {
        let words = [Token::whole_word("god")];
        let h = highlight("Godly men praise GOD, and God.", &words, Color::Yellow);
        assert_eq!(ranges(&h), vec![17..20, 26..29]);
        assert_eq!(&h.text[17..20], "GOD");
    }

    #[test]
    fn test_case_mapping_that_changes_width() {
        // Query words come from the tokenizer, which lowercases 'İ' to "i\u{307}"
        let words = [Token::whole_word("i\u{307}srael"), Token::substring("king")];
        let text = "O İsrael, the \u{212A}ING";
        let h = highlight(text, &words, Color::Yellow);
        assert_eq!(ranges(&h), vec![2..9, 15..21]);
        assert_eq!(&text[2..9], "İsrael");
        assert_eq!(&text[15..21], "\u{212A}ING");
    }

    #[test]
    fn test_spans_never_split_a_char() {
        // "i" ends inside the expansion of 'İ'; the span takes the whole char
        let words = [Token::substring("i"), Token::substring("\u{307}s")];
        let h = highlight("İs", &words, Color::Yellow);
        assert_eq!(ranges(&h), vec![0..2]);
        let joined: String = h.segments().into_iter().map(|(s, _)| s).collect();
        assert_eq!(joined, "İs");
    }

    #[test]
    fn test_no_words() {
        let h = highlight("In the beginning", &[], Color::Yellow);
        assert!(h.spans.is_empty());
        assert_eq!(h.segments(), vec![("In the beginning", None)]);
    }

    #[test]
    fn test_segments() {
        let words = [Token::substring("light")];
        let h = highlight("Let there be light: and there was light.", &words, Color::Green);
        let pieces: Vec<(&str, bool)> = h
            .segments()
            .into_iter()
            .map(|(s, span)| (s, span.is_some()))
            .collect();
        assert_eq!(
            pieces,
            vec![
                ("Let there be ", false),
                ("light", true),
                (": and there was ", false),
                ("light", true),
                (".", false),
            ]
        );
    }

    #[test]
    fn test_write_to_plain_buffer() {
        let words = [Token::substring("was")];
        let h = highlight("It was good", &words, Color::Yellow);
        let mut buf = termcolor::NoColor::new(Vec::new());
        h.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf.into_inner()).unwrap(), "It was good");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("yellow"), Some(Color::Yellow));
        assert_eq!(parse_color("not-a-color"), None);
    }
}
