//! Decoder for the binary inverted index.
//!
//! ```text
//! i32 (BE)  total_word_count
//! repeat until the group counts sum to total_word_count {
//!     u8        word_len
//!     i32 (BE)  words_in_group
//!     repeat words_in_group {
//!         [u8; word_len]  word, one byte per char (Latin-1)
//!         u16 (BE)        posting_count
//!         postings        see `utils::encoding::encode_postings`
//!     }
//! }
//! ```

use crate::index::error::IndexError;
use crate::index::types::{InvertedIndex, WordEntry};
use crate::types::LID_SPACE;
use crate::utils::{decode_postings, read_i32_be, read_u8, read_u16_be};
use roaring::RoaringBitmap;
use std::io::Read;

/// Decode a complete index, failing on any short read or count mismatch
pub fn decode_index<R: Read>(mut reader: R) -> Result<InvertedIndex, IndexError> {
    let total = read_i32_be(&mut reader).map_err(IndexError::from_read)?;
    if total < 0 {
        return Err(IndexError::InvalidHeader(total));
    }
    let total = total as u64;

    let mut entries = Vec::with_capacity(total.min(1 << 20) as usize);
    let mut seen = 0u64;
    let mut word_buf = [0u8; u8::MAX as usize];

    while seen < total {
        let word_len = read_u8(&mut reader).map_err(IndexError::from_read)? as usize;
        let group_count = read_i32_be(&mut reader).map_err(IndexError::from_read)?;
        if group_count < 0 {
            return Err(IndexError::InvalidHeader(group_count));
        }

        seen += group_count as u64;
        if seen > total {
            return Err(IndexError::CountMismatch {
                expected: total,
                actual: seen,
            });
        }

        for _ in 0..group_count {
            let word_bytes = &mut word_buf[..word_len];
            reader
                .read_exact(word_bytes)
                .map_err(IndexError::from_read)?;
            let word: String = word_bytes.iter().map(|&b| char::from(b)).collect();

            let posting_count = read_u16_be(&mut reader).map_err(IndexError::from_read)?;
            let mut postings = RoaringBitmap::new();
            let mut out_of_range = None;
            decode_postings(&mut reader, posting_count as usize, |lid| {
                if lid >= LID_SPACE {
                    out_of_range.get_or_insert(lid);
                } else {
                    postings.insert(lid);
                }
            })
            .map_err(IndexError::from_read)?;

            if let Some(lid) = out_of_range {
                return Err(IndexError::LidOutOfRange(lid));
            }

            entries.push(WordEntry { word, postings });
        }
    }

    Ok(InvertedIndex::from_entries(entries))
}

/// Decode an index held in memory
pub fn decode_index_bytes(bytes: &[u8]) -> Result<InvertedIndex, IndexError> {
    decode_index(bytes)
}
