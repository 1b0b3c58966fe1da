//! Packed binary storage and Hamming-distance nearest-neighbor search for
//! chess feature vectors.
//!
//! Vectors flow from a [`VectorSource`] through the [`ChunkedLoader`], which
//! pads and packs them into a [`BinaryIndex`]. Queries are encoded with
//! [`chesspos_core::encode_padded`] and searched with
//! [`BinaryIndex::search_bits`].

pub mod config;
pub mod error;
pub mod file_source;
pub mod index;
pub mod loader;
pub mod pack;
pub mod source;

pub use config::{IndexConfig, LoaderConfig};
pub use error::{IndexError, Result};
pub use file_source::{FileSource, write_table};
pub use index::{BinaryIndex, Neighbor};
pub use loader::{Chunk, ChunkedLoader, LoadStats};
pub use pack::{PackedVectors, hamming, pack, pack_one, unpack};
pub use source::{MemorySource, Table, VectorSource};
