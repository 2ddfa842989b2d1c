//! Piece-square tables.
//!
//! Tables are laid out as seen from White's side of the board: the first row
//! is the eighth rank, the last row the first rank. A white piece looks up its
//! rank-mirrored square, a black piece its own square, so one table serves both.

use rookery_core::{Color, PieceKind, Position, Square};

use crate::eval::score::Score;

#[rustfmt::skip]
const PAWN_MG: [i16; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i16; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     80,  80,  80,  80,  80,  80,  80,  80,
     40,  40,  40,  45,  45,  40,  40,  40,
     20,  20,  20,  25,  25,  20,  20,  20,
     10,  10,  10,  15,  15,  10,  10,  10,
      5,   5,   5,   5,   5,   5,   5,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [i16; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [i16; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_MG: [i16; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const ROOK_EG: [i16; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     10,  10,  10,  10,  10,  10,  10,  10,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_MG: [i16; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const QUEEN_EG: [i16; 64] = [
    -20,  -5, -10, -10, -10, -10,  -5, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   0,  10,  20,  20,  10,   0, -10,
    -10,   0,  10,  20,  20,  10,   0, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20,  -5, -10, -10, -10, -10,  -5, -20,
];

#[rustfmt::skip]
const KING_MG: [i16; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

// Endgame king: centralize, symmetric in both axes.
#[rustfmt::skip]
const KING_EG: [i16; 64] = [
    -50, -30, -20, -20, -20, -20, -30, -50,
    -30, -10,   0,   0,   0,   0, -10, -30,
    -30,   0,  20,  25,  25,  20,   0, -30,
    -30,   0,  25,  35,  35,  25,   0, -30,
    -30,   0,  25,  35,  35,  25,   0, -30,
    -30,   0,  20,  25,  25,  20,   0, -30,
    -30, -10,   0,   0,   0,   0, -10, -30,
    -50, -30, -20, -20, -20, -20, -30, -50,
];

const fn pack(mg: &[i16; 64], eg: &[i16; 64]) -> [Score; 64] {
    let mut table = [Score::ZERO; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = Score::new(mg[i], eg[i]);
        i += 1;
    }
    table
}

/// Packed tables indexed by [`PieceKind::index`]; slot 0 is unused.
static PST: [[Score; 64]; PieceKind::SLOTS] = [
    [Score::ZERO; 64],
    pack(&PAWN_MG, &PAWN_EG),
    pack(&KNIGHT, &KNIGHT),
    pack(&BISHOP, &BISHOP),
    pack(&ROOK_MG, &ROOK_EG),
    pack(&QUEEN_MG, &QUEEN_EG),
    pack(&KING_MG, &KING_EG),
];

/// Bonus for a piece of `kind` and `color` standing on `sq`, from that
/// piece's own point of view.
#[inline]
pub fn pst_value(kind: PieceKind, color: Color, sq: Square) -> Score {
    let index = match color {
        Color::White => sq.flip_rank().index(),
        Color::Black => sq.index(),
    };
    PST[kind.index()][index]
}

/// Sum of every piece's table bonus, White minus Black.
pub fn evaluate_pst(pos: &Position) -> Score {
    let mut score = Score::ZERO;
    for kind in PieceKind::ALL {
        for sq in pos.pieces_of(Color::White, kind) {
            score += pst_value(kind, Color::White, sq);
        }
        for sq in pos.pieces_of(Color::Black, kind) {
            score -= pst_value(kind, Color::Black, sq);
        }
    }
    score
}
