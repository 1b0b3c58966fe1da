//! Configuration knobs for loading and searching.

/// Settings for [`ChunkedLoader`](crate::loader::ChunkedLoader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Rows read, packed, and inserted per batch.
    pub chunk_size: usize,
    /// Only tables whose key contains this substring are loaded; empty loads all.
    pub key_filter: String,
}

impl LoaderConfig {
    /// Default rows per chunk.
    pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

    /// Return a config that loads only tables whose key contains `filter`.
    pub fn with_key_filter(mut self, filter: impl Into<String>) -> Self {
        self.key_filter = filter.into();
        self
    }

    /// Return a config with a different chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            key_filter: String::new(),
        }
    }
}

/// Settings for [`BinaryIndex`](crate::index::BinaryIndex) searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Worker threads for brute-force search. `0` or `1` scans on the caller's thread.
    pub threads: usize,
    /// Stored vectors per parallel work unit.
    pub shard_rows: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            shard_rows: 65_536,
        }
    }
}
