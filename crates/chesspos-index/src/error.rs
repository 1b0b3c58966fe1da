//! Errors raised by packing, loading, and searching.

use chesspos_core::CodecError;

/// Errors from the packer, the bulk loader, the storage readers, and the index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A length or width does not match what the operation requires.
    #[error("shape mismatch in {context}: expected {expected}, found {found}")]
    Shape {
        /// What was being checked (e.g. "query bytes").
        context: &'static str,
        /// Required value.
        expected: usize,
        /// Supplied value.
        found: usize,
    },

    /// A stored table is missing or its contents cannot be interpreted.
    #[error("cannot read table \"{key}\" from {source_name}: {reason}")]
    SourceUnreadable {
        /// Name of the source (directory path or in-memory label).
        source_name: String,
        /// Table key.
        key: String,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O error while reading a file-backed table.
    #[error("cannot read table \"{key}\" from {source_name}: {source}")]
    SourceIo {
        /// Name of the source.
        source_name: String,
        /// Table key.
        key: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A parameter is outside its allowed range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The search worker pool could not be created.
    #[error("failed to build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A stored vector could not be decoded into a position.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl IndexError {
    /// Return `true` for storage failures (missing, corrupt, or unreadable tables).
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            IndexError::SourceUnreadable { .. } | IndexError::SourceIo { .. }
        )
    }
}

/// Result alias for this crate.
pub type Result<T, E = IndexError> = std::result::Result<T, E>;
