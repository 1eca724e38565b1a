#![no_main]

use libfuzzer_sys::fuzz_target;
use versefind::query::{QueryTokenizer, Tokenizer};

fuzz_target!(|data: &str| {
    let tokens = QueryTokenizer::new().tokenize(data);
    for token in &tokens {
        assert!(!token.text.is_empty());
        for word in token.split_phrase() {
            assert!(!word.is_multiword());
        }
    }
});
