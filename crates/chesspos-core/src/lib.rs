//! Core chess types and the bitboard feature codec.

mod bitboard;
mod castle_rights;
pub mod codec;
mod color;
mod coords;
mod error;
mod fen;
pub mod layout;
mod piece;
mod position;
mod square;

pub use bitboard::{Bitboard, Squares};
pub use castle_rights::CastleRights;
pub use codec::{FeatureVector, decode, encode, encode_padded};
pub use color::Color;
pub use coords::{File, Rank};
pub use error::{CodecError, FenError};
pub use fen::STARTING_FEN;
pub use layout::FeatureLayout;
pub use piece::{Piece, PieceKind};
pub use position::{Position, PrettyPosition};
pub use square::Square;
