//! Chunked bulk loading from sources into an index.
//!
//! A table of `L` rows is read in `floor(L / chunk_size)` full chunks followed
//! by one remainder chunk. Every chunk is truncated to the feature width,
//! zero-padded to the packed width, packed, and inserted with a single call, so
//! at most one chunk is resident at a time. There is no rollback: a failure
//! leaves every chunk inserted before it visible.

use std::ops::Range;

use chesspos_core::FeatureLayout;
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::error::{IndexError, Result};
use crate::index::BinaryIndex;
use crate::pack;
use crate::source::VectorSource;

/// One unit of work over a table's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Full(Range<usize>),
    Remainder(Range<usize>),
}

impl Chunk {
    /// The row range this chunk covers.
    pub fn rows(&self) -> Range<usize> {
        match self {
            Chunk::Full(rows) | Chunk::Remainder(rows) => rows.clone(),
        }
    }
}

/// Split `len` rows into full chunks of `chunk_size` plus a non-empty remainder.
pub fn plan_chunks(len: usize, chunk_size: usize) -> Vec<Chunk> {
    if chunk_size == 0 {
        return Vec::new();
    }
    let full = len / chunk_size;
    let mut chunks: Vec<Chunk> = (0..full)
        .map(|i| Chunk::Full(i * chunk_size..(i + 1) * chunk_size))
        .collect();
    if len % chunk_size != 0 {
        chunks.push(Chunk::Remainder(full * chunk_size..len));
    }
    chunks
}

/// Counters accumulated over a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub tables: usize,
    pub rows: usize,
    pub chunks: usize,
}

impl std::ops::AddAssign for LoadStats {
    fn add_assign(&mut self, other: LoadStats) {
        self.tables += other.tables;
        self.rows += other.rows;
        self.chunks += other.chunks;
    }
}

/// Streams source tables into a [`BinaryIndex`] chunk by chunk.
#[derive(Debug, Clone)]
pub struct ChunkedLoader {
    config: LoaderConfig,
    layout: FeatureLayout,
}

impl ChunkedLoader {
    pub fn new(config: LoaderConfig, layout: &FeatureLayout) -> Result<ChunkedLoader> {
        if config.chunk_size == 0 {
            return Err(IndexError::InvalidArgument(
                "chunk size must be positive".to_string(),
            ));
        }
        Ok(ChunkedLoader {
            config,
            layout: *layout,
        })
    }

    #[inline]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load one table.
    pub fn load_table(
        &self,
        source: &dyn VectorSource,
        key: &str,
        index: &BinaryIndex,
    ) -> Result<LoadStats> {
        let packed_bytes = self.layout.packed_bytes();
        if index.row_bytes() != packed_bytes {
            return Err(IndexError::Shape {
                context: "index vector bytes",
                expected: packed_bytes,
                found: index.row_bytes(),
            });
        }

        let len = source.row_count(key)?;
        let width = source.row_bits(key)?;
        if width < self.layout.feature_bits {
            return Err(IndexError::Shape {
                context: "table row width",
                expected: self.layout.feature_bits,
                found: width,
            });
        }

        let mut stats = LoadStats {
            tables: 1,
            ..LoadStats::default()
        };
        for chunk in plan_chunks(len, self.config.chunk_size) {
            let rows = chunk.rows();
            let bits = source.read_rows(key, rows.clone())?;
            if bits.len() != rows.len() * width {
                return Err(IndexError::Shape {
                    context: "chunk length",
                    expected: rows.len() * width,
                    found: bits.len(),
                });
            }

            let padded = self.normalize(&bits, width);
            let batch = pack::pack(&padded, self.layout.padded_bits)?;
            let ids = index.insert(&batch)?;
            debug!(?chunk, ?ids, "inserted chunk");

            stats.rows += rows.len();
            stats.chunks += 1;
            info!(
                source = source.name(),
                key,
                rows = stats.rows,
                of = len,
                total = index.count(),
                "loaded chunk"
            );
        }

        info!(
            source = source.name(),
            key,
            rows = stats.rows,
            chunks = stats.chunks,
            "loaded table"
        );
        Ok(stats)
    }

    /// Load every table of a source whose key matches the filter, in key order.
    pub fn load_source(&self, source: &dyn VectorSource, index: &BinaryIndex) -> Result<LoadStats> {
        let mut stats = LoadStats::default();
        for key in source.keys()? {
            if !key.contains(self.config.key_filter.as_str()) {
                debug!(source = source.name(), key, "skipping table");
                continue;
            }
            stats += self.load_table(source, &key, index)?;
        }
        Ok(stats)
    }

    /// Load several sources in order; identifiers keep counting across them.
    pub fn load_sources(
        &self,
        sources: &[&dyn VectorSource],
        index: &BinaryIndex,
    ) -> Result<LoadStats> {
        let mut stats = LoadStats::default();
        for source in sources {
            stats += self.load_source(*source, index)?;
        }
        info!(
            tables = stats.tables,
            rows = stats.rows,
            total = index.count(),
            "load complete"
        );
        Ok(stats)
    }

    /// Truncate each `width`-bit row to the feature bits and zero-pad it.
    fn normalize(&self, bits: &[bool], width: usize) -> Vec<bool> {
        let FeatureLayout {
            feature_bits,
            padded_bits,
            ..
        } = self.layout;
        let mut out = Vec::with_capacity(bits.len() / width * padded_bits);
        for row in bits.chunks_exact(width) {
            out.extend_from_slice(&row[..feature_bits]);
            out.resize(out.len() + padded_bits - feature_bits, false);
        }
        out
    }
}
