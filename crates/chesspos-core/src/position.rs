//! The structured position: piece placement, side to move, and castling rights.
//!
//! This is exactly the information a feature vector carries. En passant state
//! and move counters are not modeled.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::coords::Rank;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// A chess position as encoded by a feature vector.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Piece on each square, indexed by [`Square::index()`].
    squares: [Option<Piece>; Square::COUNT],
    /// Which side moves next.
    side_to_move: Color,
    /// Current castling rights.
    castling: CastleRights,
}

impl Position {
    /// An empty board, White to move, no castling rights.
    pub const fn empty() -> Position {
        Position {
            squares: [None; Square::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
        }
    }

    /// Return the standard starting position.
    pub fn starting_position() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut position = Position::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            position.squares[file] = Some(Piece::new(kind, Color::White));
            position.squares[56 + file] = Some(Piece::new(kind, Color::Black));
        }
        for sq in Bitboard::rank(Rank::Rank2) {
            position.put(sq, Piece::WHITE_PAWN);
        }
        for sq in Bitboard::rank(Rank::Rank7) {
            position.put(sq, Piece::BLACK_PAWN);
        }
        position.castling = CastleRights::ALL;
        position
    }

    /// Return the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Place a piece, returning whatever previously occupied the square.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.squares[sq.index()].replace(piece)
    }

    /// Clear a square, returning the piece that stood there.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    /// Return the squares occupied by the given colored piece.
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.iter()
            .filter(|(_, p)| *p == piece)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Return all occupied squares.
    pub fn occupied(&self) -> Bitboard {
        self.iter().map(|(sq, _)| sq).collect()
    }

    /// Iterate over occupied squares in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    /// Return a pretty-printable wrapper for this position.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::empty()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

/// Wrapper for pretty-printing a position as an 8x8 grid.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0usize..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            let row: Vec<String> = (0..8)
                .map(|file| match self.0.squares[rank * 8 + file] {
                    Some(piece) => piece.fen_char().to_string(),
                    None => ".".to_string(),
                })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::castle_rights::CastleRights;
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::square::Square;

    #[test]
    fn starting_position_pieces() {
        let pos = Position::starting_position();
        assert_eq!(pos.piece_at(Square::E1), Some(Piece::WHITE_KING));
        assert_eq!(pos.piece_at(Square::D8), Some(Piece::BLACK_QUEEN));
        assert_eq!(pos.piece_at(Square::B1), Some(Piece::WHITE_KNIGHT));
        assert_eq!(pos.piece_at(Square::E2), Some(Piece::WHITE_PAWN));
        assert_eq!(pos.piece_at(Square::E4), None);
        assert_eq!(pos.occupied().popcount(), 32);
        assert_eq!(pos.pieces(Piece::BLACK_PAWN).popcount(), 8);
        assert_eq!(pos.castling(), CastleRights::ALL);
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn put_and_remove() {
        let mut pos = Position::empty();
        assert_eq!(pos.put(Square::E4, Piece::WHITE_PAWN), None);
        assert_eq!(pos.put(Square::E4, Piece::BLACK_QUEEN), Some(Piece::WHITE_PAWN));
        assert_eq!(pos.piece_at(Square::E4), Some(Piece::BLACK_QUEEN));
        assert_eq!(pos.remove(Square::E4), Some(Piece::BLACK_QUEEN));
        assert!(pos.occupied().is_empty());
    }

    #[test]
    fn iter_is_in_square_order() {
        let mut pos = Position::empty();
        pos.put(Square::H8, Piece::BLACK_KING);
        pos.put(Square::A1, Piece::WHITE_KING);
        let squares: Vec<_> = pos.iter().map(|(sq, _)| sq).collect();
        assert_eq!(squares, vec![Square::A1, Square::H8]);
    }

    #[test]
    fn pretty_print() {
        let output = format!("{}", Position::starting_position().pretty());
        assert!(output.contains("r n b q k b n r"));
        assert!(output.contains("R N B Q K B N R"));
        assert!(output.contains(". . . . . . . ."));
        assert!(output.ends_with("a b c d e f g h"));
    }
}
