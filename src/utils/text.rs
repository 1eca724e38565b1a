//! Literal text matching shared by the grep engine, phrase verification and
//! the highlighter.
//!
//! All offsets are byte offsets. Needles and haystacks are valid UTF-8, so
//! every match starts and ends on a char boundary.

use memchr::memmem;
use std::ops::Range;

/// Reusable matcher for one needle, either plain substring or whole word.
pub struct WordFinder<'n> {
    finder: memmem::Finder<'n>,
    whole_word: bool,
}

impl<'n> WordFinder<'n> {
    pub fn new(needle: &'n str, whole_word: bool) -> Self {
        Self {
            finder: memmem::Finder::new(needle.as_bytes()),
            whole_word,
        }
    }

    /// Length of the needle in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.finder.needle().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.finder.needle().is_empty()
    }

    /// Next accepted occurrence at or after `start`
    pub fn find_from(&self, text: &str, mut start: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        loop {
            if start > text.len() {
                return None;
            }
            let pos = self.finder.find(&text.as_bytes()[start..])? + start;

            if !self.whole_word || is_word_bounded(text, pos, pos + self.len()) {
                return Some(pos);
            }
            start = pos + 1;
        }
    }

    /// Whether `text` contains an accepted occurrence anywhere
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.find_from(text, 0).is_some()
    }
}

/// Neither the char before `start` nor the char at `end` is a letter
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let left_ok = text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphabetic());
    let right_ok = text[end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphabetic());
    left_ok && right_ok
}

/// Lowercased copy of a text that remembers where each byte came from.
///
/// Each char is lowercased on its own with the same mapping the corpus and the
/// tokenizer use (ASCII fast path, full Unicode otherwise), so a lowercase char may
/// take a different number of bytes than the original. Ranges found in the
/// lowered text are mapped back to whole chars of the original.
pub struct LoweredText {
    lowered: String,
    /// Original char range behind each byte of `lowered`
    origins: Vec<(usize, usize)>,
}

impl LoweredText {
    pub fn new(text: &str) -> Self {
        let mut lowered = String::with_capacity(text.len());
        let mut origins = Vec::with_capacity(text.len());

        for (start, c) in text.char_indices() {
            if c.is_ascii() {
                lowered.push(c.to_ascii_lowercase());
            } else {
                lowered.extend(c.to_lowercase());
            }
            origins.resize(lowered.len(), (start, start + c.len_utf8()));
        }

        Self { lowered, origins }
    }

    pub fn as_str(&self) -> &str {
        &self.lowered
    }

    /// Original byte range covering the lowered range `start..end`, widened
    /// to whole original chars. `end` must be greater than `start`.
    pub fn original_range(&self, start: usize, end: usize) -> Range<usize> {
        self.origins[start].0..self.origins[end - 1].1
    }

    /// First lowered offset produced at or after original offset `original`
    pub fn lowered_offset(&self, original: usize) -> usize {
        self.origins.partition_point(|&(start, _)| start < original)
    }
}
