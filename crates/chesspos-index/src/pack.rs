//! Bit packer: boolean vectors to bytes and back.
//!
//! Bit order is MSB-first. Bit `8 * j + i` of a vector lands in bit `7 - i`
//! of byte `j`:
//!
//! ```text
//! bits   1 0 0 0 0 0 0 1 | 1 1 ...
//! bytes  0x81            | 0xC0 ...
//! ```
//!
//! Each vector of a batch packs into its own group of `width / 8` bytes, so no
//! bit ever crosses a vector boundary.

use crate::error::{IndexError, Result};

/// A batch of equal-width packed vectors stored contiguously.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedVectors {
    bytes: Vec<u8>,
    row_bytes: usize,
}

impl PackedVectors {
    /// Wrap already-packed bytes holding rows of `row_bytes` each.
    pub fn from_bytes(bytes: Vec<u8>, row_bytes: usize) -> Result<PackedVectors> {
        if row_bytes == 0 || bytes.len() % row_bytes != 0 {
            return Err(IndexError::Shape {
                context: "packed batch length",
                expected: row_bytes,
                found: bytes.len(),
            });
        }
        Ok(PackedVectors { bytes, row_bytes })
    }

    /// Number of vectors in the batch.
    #[inline]
    pub fn rows(&self) -> usize {
        if self.row_bytes == 0 {
            0
        } else {
            self.bytes.len() / self.row_bytes
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes per vector.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Return vector `i`, if present.
    pub fn row(&self, i: usize) -> Option<&[u8]> {
        let start = i.checked_mul(self.row_bytes)?;
        self.bytes.get(start..start + self.row_bytes)
    }

    /// Iterate over the packed vectors in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.bytes.chunks_exact(self.row_bytes.max(1))
    }

    /// The contiguous bytes of all vectors.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Unpack every vector to its first `bit_length` bits.
    pub fn unpack_rows(&self, bit_length: usize) -> Result<Vec<Vec<bool>>> {
        self.iter().map(|row| unpack(row, bit_length)).collect()
    }
}

/// Pack a flat, row-major batch of `width`-bit vectors.
///
/// `width` must be a positive multiple of 8; callers pad beforehand. A single
/// vector is a batch of one.
pub fn pack(bits: &[bool], width: usize) -> Result<PackedVectors> {
    if width == 0 || width % 8 != 0 {
        return Err(IndexError::Shape {
            context: "vector width (multiple of 8)",
            expected: width.next_multiple_of(8).max(8),
            found: width,
        });
    }
    if bits.len() % width != 0 {
        return Err(IndexError::Shape {
            context: "batch length (multiple of vector width)",
            expected: bits.len().next_multiple_of(width),
            found: bits.len(),
        });
    }

    let bytes = bits.chunks_exact(8).map(pack_byte).collect();
    Ok(PackedVectors {
        bytes,
        row_bytes: width / 8,
    })
}

/// Pack one vector whose length is a multiple of 8.
pub fn pack_one(bits: &[bool]) -> Result<Vec<u8>> {
    if bits.is_empty() {
        return Err(IndexError::Shape {
            context: "vector width (multiple of 8)",
            expected: 8,
            found: 0,
        });
    }
    pack(bits, bits.len()).map(PackedVectors::into_bytes)
}

/// Unpack the first `bit_length` bits of one packed vector.
pub fn unpack(packed: &[u8], bit_length: usize) -> Result<Vec<bool>> {
    if bit_length > packed.len() * 8 {
        return Err(IndexError::Shape {
            context: "unpacked bit length",
            expected: packed.len() * 8,
            found: bit_length,
        });
    }
    Ok((0..bit_length)
        .map(|i| packed[i / 8] & (0x80 >> (i % 8)) != 0)
        .collect())
}

/// Hamming distance between two equal-length packed vectors.
///
/// Compares eight bytes at a time; a shorter tail is compared byte by byte.
#[inline]
pub fn hamming(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    let mut a_words = a.chunks_exact(8);
    let mut b_words = b.chunks_exact(8);
    let mut distance: u32 = a_words
        .by_ref()
        .zip(b_words.by_ref())
        .map(|(x, y)| (load_u64(x) ^ load_u64(y)).count_ones())
        .sum();
    distance += a_words
        .remainder()
        .iter()
        .zip(b_words.remainder())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum::<u32>();
    distance
}

#[inline]
fn load_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    u64::from_le_bytes(word)
}

#[inline]
fn pack_byte(group: &[bool]) -> u8 {
    group
        .iter()
        .fold(0u8, |byte, &bit| (byte << 1) | u8::from(bit))
}
