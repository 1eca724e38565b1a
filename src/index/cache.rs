use crate::index::error::IndexError;
use crate::index::reader::decode_index_bytes;
use crate::index::types::InvertedIndex;
use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Where the binary index comes from
#[derive(Debug, Clone)]
pub enum IndexSource {
    /// Index file on disk, memory-mapped while decoding
    File(PathBuf),
    /// Index bytes already in memory
    Memory(Arc<[u8]>),
}

impl IndexSource {
    /// The index resource for a corpus edition: `<dir>/<edition>_revindex.bt`
    pub fn for_edition(dir: &Path, edition: &str) -> Self {
        IndexSource::File(dir.join(format!("{edition}_revindex.bt")))
    }

    /// Open and decode the resource
    pub fn load(&self) -> Result<InvertedIndex, IndexError> {
        match self {
            IndexSource::File(path) => {
                let file = match File::open(path) {
                    Ok(file) => file,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        return Err(IndexError::NotFound(path.clone()));
                    }
                    Err(e) => return Err(IndexError::Io(e)),
                };

                if file.metadata()?.len() == 0 {
                    return Err(IndexError::Truncated);
                }

                // SAFETY: the mapping is read-only and dropped before returning;
                // index files are not rewritten in place while searching
                let map = unsafe { Mmap::map(&file)? };
                decode_index_bytes(&map)
            }
            IndexSource::Memory(bytes) => decode_index_bytes(bytes),
        }
    }
}

/// Lazily decoded, evictable inverted index.
///
/// At most one decoded index is held. The slot mutex doubles as the loading
/// gate: only one thread decodes at a time, and threads that queued behind it
/// find the slot filled and return the shared index. A failed load leaves the
/// slot empty, so the next call tries the resource again.
pub struct IndexCache {
    source: IndexSource,
    slot: Mutex<Option<Arc<InvertedIndex>>>,
    /// Completed decodes, one per cache generation
    generation: AtomicU64,
}

impl IndexCache {
    pub fn new(source: IndexSource) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &IndexSource {
        &self.source
    }

    /// Get the decoded index, decoding it first if nothing is held
    pub fn acquire(&self) -> Result<Arc<InvertedIndex>, IndexError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }

        let start = Instant::now();
        let index = match self.source.load() {
            Ok(index) => Arc::new(index),
            Err(IndexError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "no inverted index for this edition");
                return Err(IndexError::NotFound(path));
            }
            Err(e) => {
                tracing::warn!(error = %e, "inverted index could not be decoded");
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(
            words = index.len(),
            generation,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "inverted index loaded"
        );

        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Drop the held index. The next [`acquire`](Self::acquire) decodes it again.
    /// Returns whether an index was held.
    pub fn invalidate(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.take().is_some()
    }

    /// Whether a decoded index is currently held
    pub fn is_warm(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Number of successful decodes so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Warm the cache on a background thread
    pub fn preload(self: &Arc<Self>) -> io::Result<JoinHandle<()>> {
        let cache = Arc::clone(self);
        thread::Builder::new()
            .name("index-preload".to_string())
            .spawn(move || {
                let start = Instant::now();
                let outcome = cache.acquire();
                tracing::debug!(
                    ok = outcome.is_ok(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "index preload finished"
                );
            })
    }
}
