//! Piece colors and the side to move.

use std::fmt;

/// Side of a piece, or the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;

    /// White blocks precede Black blocks in a feature vector.
    pub const ALL: [Color; Color::COUNT] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Read the side-to-move feature bit: set means White.
    #[inline]
    pub const fn from_turn_bit(bit: bool) -> Color {
        if bit { Color::White } else { Color::Black }
    }

    #[inline]
    pub const fn turn_bit(self) -> bool {
        matches!(self, Color::White)
    }

    /// Parse the FEN active-color field.
    pub fn from_fen(field: &str) -> Option<Color> {
        match field {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "w",
            Color::Black => "b",
        })
    }
}
