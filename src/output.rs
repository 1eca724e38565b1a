//! Output formatting for verse search results

use crate::corpus::Corpus;
use crate::highlight::highlight;
use crate::query::Token;
use crate::types::Ari;
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// One result verse in machine-readable output
#[derive(Debug, Clone, Serialize)]
pub struct VerseHit<'a> {
    pub ari: Ari,
    pub book: &'a str,
    pub chapter: u8,
    pub verse: u8,
    pub text: &'a str,
}

/// Print verses with their matches highlighted.
///
/// With `heading`, the book name is printed once above its verses; otherwise
/// each line carries the full reference.
pub fn print_verses<W: WriteColor, C: Corpus + ?Sized>(
    out: &mut W,
    corpus: &C,
    results: &[Ari],
    words: &[Token],
    color: Color,
    heading: bool,
) -> io::Result<()> {
    let mut current_book = None;

    for &ari in results {
        let Some(book) = corpus.book(ari.book()) else {
            continue;
        };
        let text = corpus.verse_text(ari).unwrap_or_default();

        if heading && current_book != Some(book.id) {
            if current_book.is_some() {
                writeln!(out)?;
            }
            out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
            writeln!(out, "{}", book.name)?;
            out.reset()?;
            current_book = Some(book.id);
        }

        if !heading {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(out, "{} ", book.name)?;
            out.reset()?;
        }

        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}:{}", ari.chapter(), ari.verse())?;
        out.reset()?;
        write!(out, "  ")?;

        highlight(text, words, color).write_to(out)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Print results as a JSON array
pub fn print_json<W: Write, C: Corpus + ?Sized>(
    out: &mut W,
    corpus: &C,
    results: &[Ari],
) -> io::Result<()> {
    let hits: Vec<VerseHit<'_>> = results
        .iter()
        .filter_map(|&ari| {
            let book = corpus.book(ari.book())?;
            Some(VerseHit {
                ari,
                book: &book.name,
                chapter: ari.chapter(),
                verse: ari.verse(),
                text: corpus.verse_text(ari).unwrap_or_default(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &hits)?;
    writeln!(out)
}

/// Print the number of hits per book
pub fn print_counts<W: WriteColor, C: Corpus + ?Sized>(
    out: &mut W,
    corpus: &C,
    results: &[Ari],
) -> io::Result<()> {
    for run in results.chunk_by(|a, b| a.book() == b.book()) {
        let name = corpus
            .book(run[0].book())
            .map(|b| b.name.as_str())
            .unwrap_or("?");
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", name)?;
        out.reset()?;
        write!(out, ":")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "{}", run.len())?;
        out.reset()?;
    }
    Ok(())
}
