//! Utility functions and data structures.
//!
//! - [`app_data`] - Configuration and data directory resolution
//! - [`encoding`] - Big-endian primitives and posting list encoding for the index format
//! - [`intersect`] - Merge-join intersection of sorted sequences
//! - [`text`] - Substring and whole-word matching, offset-preserving lowercasing
//! - [`progress`] - Spinner shim for the CLI

pub mod app_data;
pub mod encoding;
pub mod intersect;
pub mod progress;
pub mod text;

pub use app_data::*;
pub use encoding::*;
pub use intersect::*;
pub use text::*;
