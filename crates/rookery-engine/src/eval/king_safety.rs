//! King safety from pawn cover.

use rookery_core::{Bitboard, Color, PieceKind, Position, Square};

use crate::eval::score::{S, Score};

/// Bonus by the number of own pawns directly in front of the king (0 to 3).
/// Middlegame only: in the endgame the king should leave its shelter.
pub const KING_PAWN_COVER_SCORE: [Score; 4] = [S(-45, 0), S(-20, 0), S(0, 0), S(15, 0)];

/// The squares one rank ahead of the king on its own and the adjacent files.
pub fn shield_mask(king: Square, color: Color) -> Bitboard {
    let front = match color {
        Color::White => king.bitboard().north(),
        Color::Black => king.bitboard().south(),
    };
    front | front.east() | front.west()
}

fn cover(pos: &Position, color: Color) -> Score {
    let shield = shield_mask(pos.king_square(color), color);
    let pawns = (shield & pos.pieces_of(color, PieceKind::Pawn)).popcount() as usize;
    KING_PAWN_COVER_SCORE[pawns.min(3)]
}

/// Pawn cover of both kings, White minus Black.
pub fn evaluate_king_safety(pos: &Position) -> Score {
    cover(pos, Color::White) - cover(pos, Color::Black)
}
