#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly, never panic
    if let Ok(index) = versefind::index::decode_index_bytes(data) {
        for entry in index.entries() {
            assert!(entry.postings.max().is_none_or(|lid| lid < versefind::types::LID_SPACE));
        }
    }
});
