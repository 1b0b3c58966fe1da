//! FEN input and output for [`Position`].
//!
//! Four-field and six-field FEN are accepted. The en passant square and the
//! move counters are syntax-checked and then dropped, since a position does not
//! carry them; printing always writes `- 0 1` in their place.

use std::fmt;
use std::str::FromStr;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::coords::{File, Rank};
use crate::error::FenError;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let (placement, active, castling, en_passant, counters) = match fields.as_slice() {
            [p, a, c, e] => (*p, *a, *c, *e, None),
            [p, a, c, e, half, full] => (*p, *a, *c, *e, Some([*half, *full])),
            _ => return Err(FenError::FieldCount(fields.len())),
        };

        let mut position = parse_placement(placement)?;
        position.set_side_to_move(
            Color::from_fen(active).ok_or_else(|| FenError::SideToMove(active.to_string()))?,
        );
        position.set_castling(CastleRights::from_fen(castling)?);

        if en_passant != "-" && Square::parse(en_passant).is_none() {
            return Err(FenError::EnPassant(en_passant.to_string()));
        }
        for (field, value) in ["halfmove clock", "fullmove number"]
            .into_iter()
            .zip(counters.into_iter().flatten())
        {
            if value.parse::<u32>().is_err() {
                return Err(FenError::Counter {
                    field,
                    value: value.to_string(),
                });
            }
        }

        Ok(position)
    }
}

/// Parse the piece placement field, rank 8 first.
fn parse_placement(placement: &str) -> Result<Position, FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != Rank::ALL.len() {
        return Err(FenError::RankCount(rows.len()));
    }

    let mut position = Position::empty();
    for (row, rank) in rows.into_iter().zip(Rank::ALL.into_iter().rev()) {
        let mut file = 0usize;
        for c in row.chars() {
            match c {
                '1'..='8' => file += c as usize - '0' as usize,
                _ => {
                    let piece = Piece::from_fen_char(c).ok_or(FenError::PieceChar(c))?;
                    let sq = File::ALL
                        .get(file)
                        .map(|&f| Square::new(rank, f))
                        .ok_or(FenError::RankLength {
                            rank,
                            squares: file + 1,
                        })?;
                    position.put(sq, piece);
                    file += 1;
                }
            }
        }
        if file != File::ALL.len() {
            return Err(FenError::RankLength {
                rank,
                squares: file,
            });
        }
    }
    Ok(position)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rank) in Rank::ALL.into_iter().rev().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            let mut gap = 0;
            for file in File::ALL {
                let Some(piece) = self.piece_at(Square::new(rank, file)) else {
                    gap += 1;
                    continue;
                };
                if gap > 0 {
                    write!(f, "{gap}")?;
                    gap = 0;
                }
                write!(f, "{piece}")?;
            }
            if gap > 0 {
                write!(f, "{gap}")?;
            }
        }
        write!(f, " {} {} - 0 1", self.side_to_move(), self.castling())
    }
}
