use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why an inverted index could not be produced
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index resource not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read index: {0}")]
    Io(#[from] io::Error),

    #[error("index stream ended early")]
    Truncated,

    #[error("invalid count {0} in index header")]
    InvalidHeader(i32),

    #[error("index declares {expected} words but groups sum to {actual}")]
    CountMismatch { expected: u64, actual: u64 },

    #[error("posting {0} is outside the lid space")]
    LidOutOfRange(u32),
}

impl IndexError {
    /// Classify an I/O error, separating a short stream from other failures
    pub fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            IndexError::Truncated
        } else {
            IndexError::Io(err)
        }
    }
}
