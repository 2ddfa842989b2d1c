//! Attack and push boards for the pieces that do not slide.

use crate::bitboard::Bitboard;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1),
    (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

/// Target set for a piece that jumps by each `(file, rank)` delta, dropping off-board targets.
const fn leaper_table<const N: usize>(deltas: [(i8, i8); N]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < N {
            let f = file + deltas[i].0;
            let r = rank + deltas[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << (r * 8 + f) as u32;
            }
            i += 1;
        }
        table[sq] = Bitboard::new(bits);
        sq += 1;
    }
    table
}

pub(super) const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(KNIGHT_DELTAS);
pub(super) const KING_ATTACKS: [Bitboard; 64] = leaper_table(KING_DELTAS);

/// Diagonal captures, index 0 = White (toward rank 8), 1 = Black.
pub(super) const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table([(-1, 1), (1, 1)]),
    leaper_table([(-1, -1), (1, -1)]),
];

/// Forward steps: one square, plus two from the home rank. Empty on the promotion rank.
pub(super) const PAWN_PUSHES: [[Bitboard; 64]; 2] = {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let rank = sq / 8;
        if rank < 7 {
            let mut bits = 1u64 << (sq + 8);
            if rank == 1 {
                bits |= 1u64 << (sq + 16);
            }
            table[0][sq] = Bitboard::new(bits);
        }
        if rank > 0 {
            let mut bits = 1u64 << (sq - 8);
            if rank == 6 {
                bits |= 1u64 << (sq - 16);
            }
            table[1][sq] = Bitboard::new(bits);
        }
        sq += 1;
    }
    table
};
