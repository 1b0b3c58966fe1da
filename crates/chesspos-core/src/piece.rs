//! Piece kinds and colored pieces.
//!
//! The contiguous [`Piece::index`] doubles as the feature block number: White
//! pawn through White king occupy blocks 0-5, Black pawn through Black king
//! occupy blocks 6-11.

use std::fmt;

use crate::color::Color;

/// A piece without its color, in feature block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Lowercase FEN letters, indexed by kind.
const KIND_LETTERS: [char; PieceKind::COUNT] = ['p', 'n', 'b', 'r', 'q', 'k'];

impl PieceKind {
    pub const COUNT: usize = 6;

    pub const ALL: [PieceKind; PieceKind::COUNT] = {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    };

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase FEN letter.
    #[inline]
    pub const fn fen_char(self) -> char {
        KIND_LETTERS[self.index()]
    }

    /// Kind named by a FEN letter of either case.
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        let lower = c.to_ascii_lowercase();
        KIND_LETTERS
            .iter()
            .position(|&letter| letter == lower)
            .map(|i| PieceKind::ALL[i])
    }
}

/// A colored piece; one per feature block.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
}

macro_rules! named_pieces {
    ($($name:ident = ($kind:ident, $color:ident)),* $(,)?) => {
        impl Piece {
            $(pub const $name: Piece = Piece::new(PieceKind::$kind, Color::$color);)*

            /// Every piece in block order.
            pub const ALL: [Piece; Piece::COUNT] = [$(Piece::$name),*];
        }
    };
}

named_pieces! {
    WHITE_PAWN = (Pawn, White),
    WHITE_KNIGHT = (Knight, White),
    WHITE_BISHOP = (Bishop, White),
    WHITE_ROOK = (Rook, White),
    WHITE_QUEEN = (Queen, White),
    WHITE_KING = (King, White),
    BLACK_PAWN = (Pawn, Black),
    BLACK_KNIGHT = (Knight, Black),
    BLACK_BISHOP = (Bishop, Black),
    BLACK_ROOK = (Rook, Black),
    BLACK_QUEEN = (Queen, Black),
    BLACK_KING = (King, Black),
}

impl Piece {
    /// Number of colored pieces, and of piece blocks in a feature vector.
    pub const COUNT: usize = Color::COUNT * PieceKind::COUNT;

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    /// Piece owning feature block `index`.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Piece> {
        if index < Piece::COUNT {
            Some(Piece::ALL[index])
        } else {
            None
        }
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Feature block number, `color * 6 + kind`.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * PieceKind::COUNT + self.kind.index()
    }

    /// Uppercase letters are White, lowercase Black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::from_fen_char(c).map(|kind| Piece::new(kind, color))
    }

    pub fn fen_char(self) -> char {
        let letter = self.kind.fen_char();
        match self.color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self.fen_char())
    }
}
