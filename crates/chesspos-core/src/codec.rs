//! Bitboard codec: [`Position`] to and from 773-bit feature vectors.
//!
//! See [`crate::layout`] for the bit layout. Decoding is a structural inverse
//! only; it never checks chess legality.

use tracing::debug;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::CodecError;
use crate::layout::{self, CASTLING_OFFSET, FEATURE_BITS, FeatureLayout, SIDE_TO_MOVE_BIT};
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

/// An immutable 773-bit encoding of a position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FeatureVector {
    bits: Vec<bool>,
}

impl FeatureVector {
    /// Return the bits, exactly [`FEATURE_BITS`] long.
    #[inline]
    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    #[inline]
    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Return the bits zero-extended to the layout's padded width.
    pub fn padded(&self, layout: &FeatureLayout) -> Vec<bool> {
        let mut bits = self.bits.clone();
        bits.resize(layout.padded_bits.max(FEATURE_BITS), false);
        bits
    }

    /// Return the occupancy block of one colored piece.
    pub fn block(&self, piece: Piece) -> Bitboard {
        let offset = layout::block_offset(piece);
        Bitboard::from_block(&self.bits[offset..offset + Square::COUNT])
    }

    /// Return the side-to-move flag as a color.
    pub fn side_to_move(&self) -> Color {
        Color::from_turn_bit(self.bits[SIDE_TO_MOVE_BIT])
    }

    /// Return the castling flags.
    pub fn castling(&self) -> CastleRights {
        CastleRights::from_feature_bits(castling_bits(&self.bits))
    }

    /// Decode back into a position.
    pub fn decode(&self) -> Position {
        decode_unchecked(&self.bits)
    }
}

impl std::fmt::Debug for FeatureVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureVector")
            .field("ones", &self.count_ones())
            .field("position", &self.decode())
            .finish()
    }
}

impl From<&Position> for FeatureVector {
    fn from(position: &Position) -> Self {
        encode(position)
    }
}

/// Encode a position. Total: every position has an encoding.
pub fn encode(position: &Position) -> FeatureVector {
    let mut bits = vec![false; FEATURE_BITS];

    for (sq, piece) in position.iter() {
        bits[layout::block_offset(piece) + sq.index()] = true;
    }
    bits[SIDE_TO_MOVE_BIT] = position.side_to_move().turn_bit();
    bits[CASTLING_OFFSET..FEATURE_BITS].copy_from_slice(&position.castling().to_feature_bits());

    FeatureVector { bits }
}

/// Encode a position and zero-extend it to the layout's padded width.
pub fn encode_padded(position: &Position, layout: &FeatureLayout) -> Vec<bool> {
    encode(position).padded(layout)
}

/// Decode a feature vector of at least [`FEATURE_BITS`] bits.
///
/// Bits past the feature width (padding) are ignored. If two blocks set the
/// same square, the later block in block order wins.
pub fn decode(bits: &[bool]) -> Result<Position, CodecError> {
    if bits.len() < FEATURE_BITS {
        return Err(CodecError::MalformedInput {
            expected: FEATURE_BITS,
            found: bits.len(),
        });
    }
    Ok(decode_unchecked(bits))
}

fn decode_unchecked(bits: &[bool]) -> Position {
    let mut position = Position::empty();

    for piece in Piece::ALL {
        let offset = layout::block_offset(piece);
        for sq in Bitboard::from_block(&bits[offset..offset + Square::COUNT]) {
            if let Some(previous) = position.put(sq, piece) {
                debug!(square = %sq, ?previous, ?piece, "overlapping feature blocks");
            }
        }
    }

    position.set_side_to_move(Color::from_turn_bit(bits[SIDE_TO_MOVE_BIT]));
    position.set_castling(CastleRights::from_feature_bits(castling_bits(bits)));
    position
}

fn castling_bits(bits: &[bool]) -> [bool; 4] {
    [
        bits[CASTLING_OFFSET],
        bits[CASTLING_OFFSET + 1],
        bits[CASTLING_OFFSET + 2],
        bits[CASTLING_OFFSET + 3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rank;
    use crate::fen::STARTING_FEN;

    const SCANDINAVIAN_FEN: &str =
        "rnb1kb1r/pp2pppp/2p2n2/3qN3/2pP4/6P1/PP2PP1P/RNBQKB1R w KQkq - 2 6";

    #[test]
    fn starting_position_encoding() {
        let fv = encode(&Position::starting_position());
        let bits = fv.as_bits();
        assert_eq!(bits.len(), 773);
        assert_eq!(bits[..768].iter().filter(|b| **b).count(), 32);
        assert_eq!(bits[..384].iter().filter(|b| **b).count(), 16);
        assert_eq!(bits[384..768].iter().filter(|b| **b).count(), 16);
        assert!(bits[768]);
        assert!(bits[769..773].iter().all(|b| *b));
        assert_eq!(fv.count_ones(), 37);
        assert_eq!(fv.block(Piece::WHITE_PAWN), Bitboard::rank(Rank::Rank2));
        assert_eq!(fv.block(Piece::BLACK_KING), Square::E8.bitboard());
    }

    #[test]
    fn starting_position_decodes() {
        let fv = encode(&Position::starting_position());
        let decoded = decode(fv.as_bits()).unwrap();
        assert_eq!(format!("{decoded}"), STARTING_FEN);
    }

    #[test]
    fn exact_bit_positions() {
        let mut pos = Position::empty();
        pos.put(Square::A1, Piece::WHITE_PAWN);
        pos.put(Square::H8, Piece::BLACK_KING);
        pos.put(Square::D4, Piece::WHITE_QUEEN);
        pos.set_side_to_move(Color::Black);
        pos.set_castling(CastleRights::BLACK_QUEEN);

        let bits = encode(&pos).into_bits();
        let set: Vec<usize> = (0..bits.len()).filter(|&i| bits[i]).collect();
        // a1 pawn, d4 queen (block 4), h8 king (block 11), castling a8
        assert_eq!(set, vec![0, 4 * 64 + 27, 11 * 64 + 63, 771]);
    }

    #[test]
    fn castling_flag_positions() {
        let cases = [
            (CastleRights::WHITE_QUEEN, 769),
            (CastleRights::WHITE_KING, 770),
            (CastleRights::BLACK_QUEEN, 771),
            (CastleRights::BLACK_KING, 772),
        ];
        for (rights, bit) in cases {
            let mut pos = Position::empty();
            pos.set_castling(rights);
            let bits = encode(&pos).into_bits();
            assert!(bits[bit], "{rights:?} should set bit {bit}");
            assert_eq!(bits.iter().filter(|b| **b).count(), 2);
        }
    }

    #[test]
    fn roundtrip_scandinavian() {
        let pos: Position = SCANDINAVIAN_FEN.parse().unwrap();
        let decoded = decode(encode(&pos).as_bits()).unwrap();
        assert_eq!(decoded, pos);
        assert_eq!(
            format!("{decoded}"),
            "rnb1kb1r/pp2pppp/2p2n2/3qN3/2pP4/6P1/PP2PP1P/RNBQKB1R w KQkq - 0 1"
        );
    }

    #[test]
    fn roundtrip_all_castling_and_sides() {
        let base: Position = "r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1".parse().unwrap();
        for raw in 0u8..16 {
            for color in Color::ALL {
                let mut pos = base;
                pos.set_castling(CastleRights::new(raw));
                pos.set_side_to_move(color);
                let fv = encode(&pos);
                assert_eq!(fv.castling(), pos.castling());
                assert_eq!(fv.side_to_move(), color);
                assert_eq!(fv.decode(), pos);
            }
        }
    }

    #[test]
    fn decode_ignores_padding() {
        let pos = Position::starting_position();
        let mut padded = encode_padded(&pos, &FeatureLayout::V1);
        assert_eq!(padded.len(), 776);
        padded[773] = true;
        padded[775] = true;
        assert_eq!(decode(&padded).unwrap(), pos);
    }

    #[test]
    fn decode_rejects_short_vector() {
        let err = decode(&[false; 772]).unwrap_err();
        assert_eq!(
            err,
            CodecError::MalformedInput {
                expected: 773,
                found: 772
            }
        );
    }

    #[test]
    fn decode_accepts_illegal_positions() {
        let mut bits = vec![false; 773];
        // two white kings and a white pawn on rank 1
        bits[5 * 64 + Square::E1.index()] = true;
        bits[5 * 64 + Square::E4.index()] = true;
        bits[Square::A1.index()] = true;
        let pos = decode(&bits).unwrap();
        assert_eq!(pos.pieces(Piece::WHITE_KING).popcount(), 2);
        assert_eq!(pos.piece_at(Square::A1), Some(Piece::WHITE_PAWN));
        assert_eq!(pos.side_to_move(), Color::Black);
    }

    #[test]
    fn overlapping_blocks_later_wins() {
        let mut bits = vec![false; 773];
        bits[Square::E4.index()] = true;
        bits[10 * 64 + Square::E4.index()] = true;
        let pos = decode(&bits).unwrap();
        assert_eq!(pos.piece_at(Square::E4), Some(Piece::BLACK_QUEEN));
    }

    #[test]
    fn empty_position_sets_only_turn_bit() {
        let fv = FeatureVector::from(&Position::empty());
        assert_eq!(fv.count_ones(), 1);
    }
}
