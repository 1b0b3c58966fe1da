//! Castling rights as a 4-bit set.
//!
//! The in-memory bits are stored in feature order, so bit `i` is feature bit
//! `769 + i`: White a1 rook, White h1 rook, Black a8 rook, Black h8 rook.

use std::fmt;
use std::ops::BitOr;

use crate::error::FenError;

/// Which castling moves are still available.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

/// FEN letters in canonical output order.
const FEN_LETTERS: [(CastleRights, char); 4] = [
    (CastleRights::WHITE_KING, 'K'),
    (CastleRights::WHITE_QUEEN, 'Q'),
    (CastleRights::BLACK_KING, 'k'),
    (CastleRights::BLACK_QUEEN, 'q'),
];

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0001);
    pub const WHITE_KING: CastleRights = CastleRights(0b0010);
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b0100);
    pub const BLACK_KING: CastleRights = CastleRights(0b1000);

    /// Build from raw bits in feature order; bits above the fourth are dropped.
    #[inline]
    pub const fn new(bits: u8) -> CastleRights {
        CastleRights(bits & 0b1111)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every right in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    /// The four castling feature bits.
    pub fn to_feature_bits(self) -> [bool; 4] {
        std::array::from_fn(|i| (self.0 >> i) & 1 == 1)
    }

    pub fn from_feature_bits(bits: [bool; 4]) -> CastleRights {
        let raw = bits
            .iter()
            .enumerate()
            .fold(0u8, |raw, (i, &set)| raw | (u8::from(set) << i));
        CastleRights(raw)
    }

    /// Parse the FEN castling field, e.g. `"KQkq"`, `"Kq"` or `"-"`.
    ///
    /// Letters may come in any order and repeat.
    pub fn from_fen(field: &str) -> Result<CastleRights, FenError> {
        if field == "-" {
            return Ok(CastleRights::NONE);
        }
        field.chars().try_fold(CastleRights::NONE, |rights, c| {
            FEN_LETTERS
                .iter()
                .find(|(_, letter)| *letter == c)
                .map(|(flag, _)| rights | *flag)
                .ok_or(FenError::CastlingChar(c))
        })
    }

    /// The FEN castling field, letters in `KQkq` order.
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        FEN_LETTERS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, letter)| *letter)
            .collect()
    }
}

impl BitOr for CastleRights {
    type Output = CastleRights;

    #[inline]
    fn bitor(self, rhs: CastleRights) -> CastleRights {
        CastleRights(self.0 | rhs.0)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::CastleRights;
    use crate::error::FenError;

    #[test]
    fn fen_field_roundtrip() {
        for field in ["KQkq", "Kq", "k", "-", "KQ", "Qk"] {
            assert_eq!(CastleRights::from_fen(field).unwrap().to_fen(), field);
        }
        assert_eq!(CastleRights::from_fen("qkQK").unwrap(), CastleRights::ALL);
        assert_eq!(CastleRights::from_fen("KK").unwrap(), CastleRights::WHITE_KING);
    }

    #[test]
    fn fen_field_rejects_unknown_letters() {
        assert_eq!(
            CastleRights::from_fen("KQxq"),
            Err(FenError::CastlingChar('x'))
        );
        assert!(CastleRights::from_fen("1").is_err());
    }

    #[test]
    fn feature_bits_follow_rook_corners() {
        assert_eq!(CastleRights::WHITE_QUEEN.to_feature_bits(), [true, false, false, false]);
        assert_eq!(CastleRights::WHITE_KING.to_feature_bits(), [false, true, false, false]);
        assert_eq!(CastleRights::BLACK_QUEEN.to_feature_bits(), [false, false, true, false]);
        assert_eq!(CastleRights::BLACK_KING.to_feature_bits(), [false, false, false, true]);
        assert_eq!(CastleRights::ALL.to_feature_bits(), [true; 4]);
    }

    #[test]
    fn feature_bits_roundtrip() {
        for raw in 0u8..16 {
            let rights = CastleRights::new(raw);
            assert_eq!(CastleRights::from_feature_bits(rights.to_feature_bits()), rights);
        }
        assert_eq!(CastleRights::new(0xF3).bits(), 0b0011);
    }

    #[test]
    fn debug_uses_fen() {
        let rights = CastleRights::WHITE_KING | CastleRights::BLACK_QUEEN;
        assert_eq!(format!("{rights:?}"), "CastleRights(Kq)");
        assert_eq!(format!("{:?}", CastleRights::NONE), "CastleRights(-)");
    }
}
