//! Material balance.

use rookery_core::{Color, PieceKind, Position};

/// Piece values in centipawns, indexed by [`PieceKind::index`] (slot 0 unused).
pub const PIECE_VALUE: [i32; PieceKind::SLOTS] = [0, 100, 320, 330, 500, 900, 0];

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    PIECE_VALUE[kind.index()]
}

/// White's material minus Black's. The same in both game phases.
pub fn material(pos: &Position) -> i32 {
    PieceKind::ALL
        .iter()
        .map(|&kind| {
            let white = pos.pieces_of(Color::White, kind).popcount() as i32;
            let black = pos.pieces_of(Color::Black, kind).popcount() as i32;
            piece_value(kind) * (white - black)
        })
        .sum()
}
