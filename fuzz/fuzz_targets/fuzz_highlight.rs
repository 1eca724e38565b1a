#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use versefind::highlight::highlight;
use versefind::query::{QueryTokenizer, Tokenizer};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a str,
    query: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    // Spans index the original text, so every segment must slice cleanly
    let words = QueryTokenizer::new().tokenize(input.query);
    let highlighted = highlight(input.text, &words, termcolor::Color::Yellow);
    let joined: String = highlighted.segments().into_iter().map(|(s, _)| s).collect();
    assert_eq!(joined, input.text);
});
