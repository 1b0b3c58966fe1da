//! Exact Hamming k-NN index over packed vectors.
//!
//! Vectors live in one contiguous byte table behind a read-write lock. An
//! insert appends a whole batch under the write lock, so searches (read lock)
//! see either all of a batch or none of it.
//!
//! Search is a brute-force scan. With more than one thread configured, the
//! table is split into read-only shards; each shard keeps a bounded max-heap of
//! its best `k`, and the shard results are merged by `(distance, id)`.

use std::collections::BinaryHeap;
use std::ops::Range;

use chesspos_core::{FeatureLayout, Position};
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::debug;

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::pack::{self, PackedVectors};

// `BinaryIndex` is shared by reference between loader and searchers.
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<BinaryIndex>();
    }
    let _ = check;
};

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Neighbor {
    /// Hamming distance to the query. Declared first so ordering is by distance, then id.
    pub distance: u32,
    /// Identifier assigned at insertion (0-based, insertion order).
    pub id: usize,
}

/// Brute-force binary index with dense, insertion-ordered identifiers.
pub struct BinaryIndex {
    row_bits: usize,
    row_bytes: usize,
    config: IndexConfig,
    pool: Option<rayon::ThreadPool>,
    vectors: RwLock<Vec<u8>>,
}

impl BinaryIndex {
    /// Create an index for `row_bits`-wide vectors with the default configuration.
    pub fn new(row_bits: usize) -> Result<BinaryIndex> {
        Self::with_config(row_bits, IndexConfig::default())
    }

    /// Create an index for `row_bits`-wide vectors.
    ///
    /// `row_bits` must be a positive multiple of 8. When `config.threads > 1`
    /// a dedicated worker pool of that size is created for searches.
    pub fn with_config(row_bits: usize, config: IndexConfig) -> Result<BinaryIndex> {
        if row_bits == 0 || row_bits % 8 != 0 {
            return Err(IndexError::Shape {
                context: "index vector width (multiple of 8)",
                expected: row_bits.next_multiple_of(8).max(8),
                found: row_bits,
            });
        }
        if config.shard_rows == 0 {
            return Err(IndexError::InvalidArgument(
                "shard_rows must be at least 1".to_string(),
            ));
        }

        let pool = if config.threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.threads)
                    .thread_name(|i| format!("chesspos-search-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        debug!(row_bits, threads = config.threads, "created binary index");
        Ok(BinaryIndex {
            row_bits,
            row_bytes: row_bits / 8,
            config,
            pool,
            vectors: RwLock::new(Vec::new()),
        })
    }

    /// Width of stored vectors in bits.
    #[inline]
    pub fn row_bits(&self) -> usize {
        self.row_bits
    }

    /// Width of stored vectors in bytes.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of stored vectors.
    pub fn count(&self) -> usize {
        self.vectors.read().len() / self.row_bytes
    }

    /// Return a copy of stored vector `id`.
    pub fn get(&self, id: usize) -> Option<Vec<u8>> {
        let start = id.checked_mul(self.row_bytes)?;
        self.vectors
            .read()
            .get(start..start + self.row_bytes)
            .map(<[u8]>::to_vec)
    }

    /// Decode stored vector `id` back into a position.
    pub fn position(&self, id: usize, layout: &FeatureLayout) -> Result<Option<Position>> {
        let Some(packed) = self.get(id) else {
            return Ok(None);
        };
        let bits = pack::unpack(&packed, layout.feature_bits)?;
        Ok(Some(chesspos_core::decode(&bits)?))
    }

    /// Append a batch, returning the identifiers assigned to it.
    ///
    /// The whole batch becomes visible to searches at once. Duplicates are
    /// stored like any other vector.
    pub fn insert(&self, batch: &PackedVectors) -> Result<Range<usize>> {
        if !batch.is_empty() && batch.row_bytes() != self.row_bytes {
            return Err(IndexError::Shape {
                context: "inserted vector bytes",
                expected: self.row_bytes,
                found: batch.row_bytes(),
            });
        }

        let mut vectors = self.vectors.write();
        let first = vectors.len() / self.row_bytes;
        vectors.extend_from_slice(batch.as_bytes());
        Ok(first..first + batch.rows())
    }

    /// Return the `k` stored vectors nearest to `query`, nearest first.
    ///
    /// Ties are broken by ascending id. `k` larger than the stored count is
    /// clamped; `k == 0` is rejected.
    pub fn search(&self, query: &[u8], k: usize) -> Result<Vec<Neighbor>> {
        self.check_query(query, k)?;
        let vectors = self.vectors.read();
        Ok(self.scan(&vectors, query, k))
    }

    /// Search with a raw boolean vector, zero-extended to the index width.
    pub fn search_bits(&self, bits: &[bool], k: usize) -> Result<Vec<Neighbor>> {
        if bits.len() > self.row_bits {
            return Err(IndexError::Shape {
                context: "query bits",
                expected: self.row_bits,
                found: bits.len(),
            });
        }
        let mut padded = bits.to_vec();
        padded.resize(self.row_bits, false);
        let query = pack::pack_one(&padded)?;
        self.search(&query, k)
    }

    /// Run one search per query against the same snapshot.
    pub fn search_batch(&self, queries: &PackedVectors, k: usize) -> Result<Vec<Vec<Neighbor>>> {
        let vectors = self.vectors.read();
        queries
            .iter()
            .map(|query| {
                self.check_query(query, k)?;
                Ok(self.scan(&vectors, query, k))
            })
            .collect()
    }

    fn check_query(&self, query: &[u8], k: usize) -> Result<()> {
        if query.len() != self.row_bytes {
            return Err(IndexError::Shape {
                context: "query bytes",
                expected: self.row_bytes,
                found: query.len(),
            });
        }
        if k == 0 {
            return Err(IndexError::InvalidArgument(
                "k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn scan(&self, vectors: &[u8], query: &[u8], k: usize) -> Vec<Neighbor> {
        let count = vectors.len() / self.row_bytes;
        let k = k.min(count);
        if k == 0 {
            return Vec::new();
        }

        let shard_bytes = self.config.shard_rows * self.row_bytes;
        match &self.pool {
            Some(pool) if count > self.config.shard_rows => {
                let shards: Vec<Vec<Neighbor>> = pool.install(|| {
                    vectors
                        .par_chunks(shard_bytes)
                        .enumerate()
                        .map(|(shard, bytes)| {
                            let first_id = shard * self.config.shard_rows;
                            scan_shard(bytes, first_id, self.row_bytes, query, k)
                        })
                        .collect()
                });
                merge(shards, k)
            }
            _ => scan_shard(vectors, 0, self.row_bytes, query, k),
        }
    }
}

impl std::fmt::Debug for BinaryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryIndex")
            .field("row_bits", &self.row_bits)
            .field("count", &self.count())
            .field("config", &self.config)
            .finish()
    }
}

/// Best `k` of one contiguous run of vectors whose first id is `first_id`.
fn scan_shard(bytes: &[u8], first_id: usize, row_bytes: usize, query: &[u8], k: usize) -> Vec<Neighbor> {
    // Max-heap: the root is the worst of the current best k.
    let mut best: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);

    for (offset, row) in bytes.chunks_exact(row_bytes).enumerate() {
        let candidate = Neighbor {
            distance: pack::hamming(row, query),
            id: first_id + offset,
        };
        if best.len() < k {
            best.push(candidate);
        } else if let Some(mut worst) = best.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    best.into_sorted_vec()
}

fn merge(shards: Vec<Vec<Neighbor>>, k: usize) -> Vec<Neighbor> {
    let mut all: Vec<Neighbor> = shards.into_iter().flatten().collect();
    all.sort_unstable();
    all.truncate(k);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::pack;

    fn vector_with_ones(width: usize, ones: &[usize]) -> Vec<bool> {
        let mut bits = vec![false; width];
        for &i in ones {
            bits[i] = true;
        }
        bits
    }

    fn index_of(rows: &[Vec<bool>], width: usize, config: IndexConfig) -> BinaryIndex {
        let index = BinaryIndex::with_config(width, config).unwrap();
        index.insert(&pack(&rows.concat(), width).unwrap()).unwrap();
        index
    }

    #[test]
    fn rejects_bad_width() {
        assert!(matches!(BinaryIndex::new(773), Err(IndexError::Shape { .. })));
        assert!(matches!(BinaryIndex::new(0), Err(IndexError::Shape { .. })));
        let config = IndexConfig {
            shard_rows: 0,
            ..IndexConfig::default()
        };
        assert!(matches!(
            BinaryIndex::with_config(776, config),
            Err(IndexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn insert_assigns_dense_ids() {
        let index = BinaryIndex::new(16).unwrap();
        let first = index.insert(&pack(&[false; 32], 16).unwrap()).unwrap();
        let second = index.insert(&pack(&[true; 48], 16).unwrap()).unwrap();
        let empty = index.insert(&PackedVectors::default()).unwrap();
        assert_eq!(first, 0..2);
        assert_eq!(second, 2..5);
        assert_eq!(empty, 5..5);
        assert_eq!(index.count(), 5);
        assert_eq!(index.get(4), Some(vec![0xFF, 0xFF]));
        assert_eq!(index.get(5), None);
    }

    #[test]
    fn insert_rejects_width_mismatch() {
        let index = BinaryIndex::new(16).unwrap();
        let err = index.insert(&pack(&[false; 24], 24).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::Shape {
                expected: 2,
                found: 3,
                ..
            }
        ));
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn nearest_by_distance_then_id() {
        let query = vector_with_ones(64, &[]);
        let rows = vec![
            vector_with_ones(64, &[0, 1, 2]),
            vector_with_ones(64, &[5]),
            vector_with_ones(64, &[9, 10, 11]),
            vector_with_ones(64, &[63]),
            vector_with_ones(64, &[]),
        ];
        let index = index_of(&rows, 64, IndexConfig::default());
        let hits = index.search(&pack::pack_one(&query).unwrap(), 4).unwrap();
        let pairs: Vec<(usize, u32)> = hits.iter().map(|n| (n.id, n.distance)).collect();
        assert_eq!(pairs, vec![(4, 0), (1, 1), (3, 1), (0, 3)]);
    }

    #[test]
    fn query_scenario_one_five_fifty() {
        let query = vector_with_ones(776, &[]);
        let rows = vec![
            vector_with_ones(776, &(0..50).collect::<Vec<_>>()),
            vector_with_ones(776, &[100]),
            vector_with_ones(776, &[200, 201, 202, 203, 204]),
        ];
        let index = index_of(&rows, 776, IndexConfig::default());
        let hits = index.search_bits(&query[..773], 2).unwrap();
        assert_eq!(
            hits,
            vec![
                Neighbor { id: 1, distance: 1 },
                Neighbor { id: 2, distance: 5 }
            ]
        );
    }

    #[test]
    fn k_is_clamped_and_validated() {
        let rows = vec![vector_with_ones(8, &[0]), vector_with_ones(8, &[1])];
        let index = index_of(&rows, 8, IndexConfig::default());
        let query = [0u8];
        assert_eq!(index.search(&query, 10).unwrap().len(), 2);
        assert!(matches!(
            index.search(&query, 0),
            Err(IndexError::InvalidArgument(_))
        ));

        let empty = BinaryIndex::new(8).unwrap();
        assert!(empty.search(&query, 3).unwrap().is_empty());
    }

    #[test]
    fn rejects_query_width_mismatch() {
        let index = BinaryIndex::new(16).unwrap();
        assert!(matches!(
            index.search(&[0u8; 3], 1),
            Err(IndexError::Shape {
                expected: 2,
                found: 3,
                ..
            })
        ));
        assert!(index.search_bits(&[false; 17], 1).is_err());
    }

    #[test]
    fn sharded_search_matches_single_thread() {
        let rows: Vec<Vec<bool>> = (0..300)
            .map(|i| (0..64).map(|b| (i * 31 + b * 17) % 11 < 4).collect())
            .collect();
        let single = index_of(&rows, 64, IndexConfig::default());
        let sharded = index_of(
            &rows,
            64,
            IndexConfig {
                threads: 4,
                shard_rows: 7,
            },
        );

        for probe in [0usize, 17, 150, 299] {
            let query = pack::pack_one(&rows[probe]).unwrap();
            let expected = single.search(&query, 25).unwrap();
            assert_eq!(sharded.search(&query, 25).unwrap(), expected);
            // only 11 distinct rows, so the earliest duplicate wins the tie
            assert_eq!(expected[0], Neighbor { id: probe % 11, distance: 0 });
        }
    }

    #[test]
    fn search_batch_answers_each_query() {
        let rows: Vec<Vec<bool>> = (0..4).map(|i| vector_with_ones(16, &[i])).collect();
        let index = index_of(&rows, 16, IndexConfig::default());
        let queries = pack(&rows.concat(), 16).unwrap();
        let results = index.search_batch(&queries, 1).unwrap();
        for (i, hits) in results.iter().enumerate() {
            assert_eq!(hits, &vec![Neighbor { id: i, distance: 0 }]);
        }
    }

    #[test]
    fn concurrent_readers_see_whole_batches() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        const BATCH: usize = 5;
        const BATCHES: usize = 60;

        let index = Arc::new(
            BinaryIndex::with_config(
                64,
                IndexConfig {
                    threads: 2,
                    shard_rows: 8,
                },
            )
            .unwrap(),
        );
        let done = AtomicBool::new(false);
        let query = [0u8; 8];

        std::thread::scope(|scope| {
            let writer = Arc::clone(&index);
            let done = &done;
            scope.spawn(move || {
                for b in 0..BATCHES {
                    let rows: Vec<bool> = (0..BATCH * 64).map(|i| (i + b) % 5 == 0).collect();
                    let ids = writer.insert(&pack(&rows, 64).unwrap()).unwrap();
                    assert_eq!(ids, b * BATCH..(b + 1) * BATCH);
                }
                done.store(true, Ordering::Release);
            });

            for _ in 0..3 {
                let reader = Arc::clone(&index);
                scope.spawn(move || {
                    loop {
                        let finished = done.load(Ordering::Acquire);
                        assert_eq!(reader.count() % BATCH, 0);

                        let hits = reader.search(&query, BATCH * BATCHES).unwrap();
                        assert_eq!(hits.len() % BATCH, 0);
                        let mut ids: Vec<usize> = hits.iter().map(|n| n.id).collect();
                        ids.sort_unstable();
                        assert_eq!(ids, (0..hits.len()).collect::<Vec<_>>());

                        if finished {
                            assert_eq!(hits.len(), BATCH * BATCHES);
                            break;
                        }
                    }
                });
            }
        });

        assert_eq!(index.count(), BATCH * BATCHES);
    }

    #[test]
    fn position_decodes_stored_vector() {
        let layout = FeatureLayout::V1;
        let start = Position::starting_position();
        let index = BinaryIndex::new(layout.padded_bits).unwrap();
        let padded = chesspos_core::encode_padded(&start, &layout);
        index.insert(&pack(&padded, layout.padded_bits).unwrap()).unwrap();

        assert_eq!(index.position(0, &layout).unwrap(), Some(start));
        assert_eq!(index.position(1, &layout).unwrap(), None);
    }

    #[test]
    fn position_rejects_layout_wider_than_index() {
        let index = BinaryIndex::new(8).unwrap();
        index.insert(&pack(&[true; 8], 8).unwrap()).unwrap();
        let err = index.position(0, &FeatureLayout::V1).unwrap_err();
        assert!(matches!(err, IndexError::Shape { .. }));
    }
}
