pub mod cache;
pub mod error;
pub mod reader;
pub mod stats;
pub mod types;
pub mod writer;

pub use cache::{IndexCache, IndexSource};
pub use error::IndexError;
pub use reader::{decode_index, decode_index_bytes};
pub use types::*;
pub use writer::IndexWriter;
