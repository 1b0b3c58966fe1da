//! Square sets packed into a `u64`, one bit per square.
//!
//! A piece block of a feature vector is a bitboard spelled out entry by
//! entry: block entry `s` is set exactly when square `s` is in the set.

use std::fmt;
use std::ops::BitOr;

use crate::coords::Rank;
use crate::square::Square;

/// A set of squares; bit `s` of the mask is square `s` in LERF order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    pub const fn new(mask: u64) -> Bitboard {
        Bitboard(mask)
    }

    /// The eight squares of one rank.
    #[inline]
    pub const fn rank(rank: Rank) -> Bitboard {
        Bitboard(0xFF << (8 * rank.index()))
    }

    #[inline]
    pub const fn mask(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn has(self, sq: Square) -> bool {
        (self.0 >> sq.index()) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1 << sq.index();
    }

    /// Read a block of boolean entries, entry `s` being square `s`.
    ///
    /// Only the first 64 entries are read; a shorter block leaves the
    /// remaining squares out of the set.
    pub fn from_block(block: &[bool]) -> Bitboard {
        let mask = block
            .iter()
            .take(Square::COUNT)
            .rev()
            .fold(0u64, |mask, &set| (mask << 1) | u64::from(set));
        Bitboard(mask)
    }

    /// Spell the set out as a 64-entry block.
    pub fn to_block(self) -> [bool; Square::COUNT] {
        std::array::from_fn(|s| (self.0 >> s) & 1 == 1)
    }

    /// Squares in the set, lowest index first.
    #[inline]
    pub fn squares(self) -> Squares {
        Squares(self.0)
    }
}

/// Iterator over the squares of a [`Bitboard`].
#[derive(Debug, Clone)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros();
        self.0 ^= 1 << index;
        Some(Square::from_index_unchecked(index as u8))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.0.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Squares {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    #[inline]
    fn into_iter(self) -> Squares {
        self.squares()
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(squares: I) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for sq in squares {
            bb.set(sq);
        }
        bb
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018x})", self.0)
    }
}
