//! Error types for FEN parsing and feature vector decoding.

use std::fmt;

use crate::coords::Rank;

/// Why a FEN string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Neither 4 nor 6 whitespace-separated fields.
    FieldCount(usize),
    /// Piece placement does not split into 8 ranks.
    RankCount(usize),
    /// A rank covers more or fewer than 8 squares.
    RankLength { rank: Rank, squares: usize },
    /// Unknown letter or out-of-range digit in the piece placement.
    PieceChar(char),
    /// Active color other than `w` or `b`.
    SideToMove(String),
    /// Unknown letter in the castling field.
    CastlingChar(char),
    /// En passant field that is neither `-` nor a square.
    EnPassant(String),
    /// Halfmove clock or fullmove number that is not a number.
    Counter { field: &'static str, value: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::FieldCount(found) => {
                write!(f, "FEN has {found} fields, expected 4 or 6")
            }
            FenError::RankCount(found) => {
                write!(f, "piece placement has {found} ranks, expected 8")
            }
            FenError::RankLength { rank, squares } => {
                write!(f, "rank {} covers {squares} squares, expected 8", rank.to_char())
            }
            FenError::PieceChar(c) => write!(f, "unexpected {c:?} in piece placement"),
            FenError::SideToMove(field) => write!(f, "side to move {field:?} is not w or b"),
            FenError::CastlingChar(c) => write!(f, "unexpected {c:?} in castling field"),
            FenError::EnPassant(field) => write!(f, "en passant field {field:?} is not a square"),
            FenError::Counter { field, value } => write!(f, "{field} {value:?} is not a number"),
        }
    }
}

impl std::error::Error for FenError {}

/// Errors from decoding a feature vector back into a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The vector is too short to hold the feature layout.
    #[error("malformed feature vector: expected at least {expected} bits, found {found}")]
    MalformedInput {
        /// Minimum number of bits required.
        expected: usize,
        /// Number of bits supplied.
        found: usize,
    },
}
