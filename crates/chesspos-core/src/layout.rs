//! Feature vector layout constants.
//!
//! ```text
//! bits   0..768   12 piece blocks of 64 squares
//!                 block = color * 6 + kind (White first; P N B R Q K)
//! bit    768      side to move (1 = White)
//! bits 769..773   castling: White Q, White K, Black Q, Black K
//! bits 773..776   zero padding to a whole byte (packed form only)
//! ```
//!
//! Every producer and consumer of stored vectors shares one layout value.
//! Components that hold vectors of a fixed width check it against the
//! layout when they are constructed.

use crate::piece::Piece;
use crate::square::Square;

/// A versioned description of the feature vector widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureLayout {
    /// Layout revision; bumped whenever any offset or width changes.
    pub version: u16,
    /// Number of meaningful bits.
    pub feature_bits: usize,
    /// Width after zero-extension to a multiple of 8.
    pub padded_bits: usize,
}

impl FeatureLayout {
    /// The 773-bit layout padded to 776 bits (97 bytes).
    pub const V1: FeatureLayout = FeatureLayout {
        version: 1,
        feature_bits: FEATURE_BITS,
        padded_bits: FEATURE_BITS.next_multiple_of(8),
    };

    /// Number of bytes in the packed form.
    #[inline]
    pub const fn packed_bytes(&self) -> usize {
        self.padded_bits / 8
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        FeatureLayout::V1
    }
}

/// Bits of piece placement: one 64-square block per colored piece.
pub const PIECE_BITS: usize = Piece::COUNT * Square::COUNT;

/// Offset of the side-to-move bit.
pub const SIDE_TO_MOVE_BIT: usize = PIECE_BITS;

/// Offset of the first of four castling bits.
pub const CASTLING_OFFSET: usize = SIDE_TO_MOVE_BIT + 1;

/// Number of meaningful bits in a feature vector.
pub const FEATURE_BITS: usize = CASTLING_OFFSET + 4;

/// Offset of the first bit of a piece's block.
#[inline]
pub const fn block_offset(piece: Piece) -> usize {
    piece.index() * Square::COUNT
}
