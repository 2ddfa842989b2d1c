//! Pawn structure, cached per pawn skeleton.
//!
//! Everything here depends only on where the pawns stand, so results are kept
//! in a [`PawnHashTable`] keyed by [`Position::pawn_hash`] and shared by every
//! position with the same pawns.

use rookery_core::{Bitboard, Color, PieceKind, Position, Square, Tables};

use crate::eval::score::{S, Score};

/// Adjacent files of each file.
static ADJACENT_FILES: [Bitboard; 8] = adjacent_files();

/// `[color][square]`: squares ahead of a pawn on its own and the adjacent
/// files. A pawn is passed when no enemy pawn stands in its mask.
static PASSED_MASK: [[Bitboard; 64]; 2] = passed_masks();

const fn adjacent_files() -> [Bitboard; 8] {
    let mut table = [Bitboard::EMPTY; 8];
    let mut f = 0;
    while f < 8 {
        let mut bits = 0u64;
        if f > 0 {
            bits |= Bitboard::file(f - 1).bits();
        }
        if f < 7 {
            bits |= Bitboard::file(f + 1).bits();
        }
        table[f as usize] = Bitboard::new(bits);
        f += 1;
    }
    table
}

const fn passed_masks() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let rank = (sq / 8) as u8;
        let file = (sq % 8) as u8;
        let span = Bitboard::file(file).bits() | adjacent_files()[file as usize].bits();

        let mut ahead_white = 0u64;
        let mut r = rank + 1;
        while r < 8 {
            ahead_white |= Bitboard::rank(r).bits();
            r += 1;
        }
        let mut ahead_black = 0u64;
        let mut r = 0;
        while r < rank {
            ahead_black |= Bitboard::rank(r).bits();
            r += 1;
        }
        table[0][sq] = Bitboard::new(span & ahead_white);
        table[1][sq] = Bitboard::new(span & ahead_black);
        sq += 1;
    }
    table
}

/// Passed pawn bonus by rank counted from the pawn's own side.
const PASSED_BONUS: [Score; 8] = [
    S(0, 0),
    S(0, 5),
    S(5, 10),
    S(15, 25),
    S(30, 50),
    S(55, 90),
    S(90, 140),
    S(0, 0),
];

const DOUBLED_PENALTY: Score = S(-10, -20);
const ISOLATED_PENALTY: Score = S(-10, -15);
const CONNECTED_BONUS: Score = S(8, 6);

/// Pawn structure of one skeleton: the classified pawns of each side, indexed
/// by [`Color::index`], and their combined White-relative score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PawnEntry {
    pub key: u64,
    /// Pawns with a friendly pawn behind them on the same file.
    pub doubled: [Bitboard; 2],
    /// Pawns with no friendly pawn on either adjacent file.
    pub isolated: [Bitboard; 2],
    pub passed: [Bitboard; 2],
    /// Pawns defended by a friendly pawn or standing beside one.
    pub connected: [Bitboard; 2],
    pub score: Score,
}

impl PawnEntry {
    /// Classify the pawns of `pos` and score them.
    pub fn compute(pos: &Position, tables: &Tables) -> PawnEntry {
        let mut entry = PawnEntry {
            key: pos.pawn_hash(),
            doubled: [Bitboard::EMPTY; 2],
            isolated: [Bitboard::EMPTY; 2],
            passed: [Bitboard::EMPTY; 2],
            connected: [Bitboard::EMPTY; 2],
            score: Score::ZERO,
        };
        for color in Color::ALL {
            let side = entry.classify(pos, tables, color);
            match color {
                Color::White => entry.score += side,
                Color::Black => entry.score -= side,
            }
        }
        entry
    }

    fn classify(&mut self, pos: &Position, tables: &Tables, color: Color) -> Score {
        let ours = pos.pieces_of(color, PieceKind::Pawn);
        let theirs = pos.pieces_of(!color, PieceKind::Pawn);
        let c = color.index();
        let mut score = Score::ZERO;

        for sq in ours {
            let file = sq.file();
            let same_file = ours & Bitboard::file(file);
            if (same_file & behind(sq, color)).is_nonempty() {
                self.doubled[c].set(sq);
                score += DOUBLED_PENALTY;
            }

            let neighbours = ours & ADJACENT_FILES[file as usize];
            if neighbours.is_empty() {
                self.isolated[c].set(sq);
                score += ISOLATED_PENALTY;
            }

            if (PASSED_MASK[c][sq.index()] & theirs).is_empty() {
                self.passed[c].set(sq);
                score += PASSED_BONUS[relative_rank(sq, color)];
            }

            // A pawn of the other color on `sq` would attack our defenders.
            let defenders = tables.pawn_attacks(!color, sq) & ours;
            let beside = neighbours & Bitboard::rank(sq.rank());
            if (defenders | beside).is_nonempty() {
                self.connected[c].set(sq);
                score += CONNECTED_BONUS;
            }
        }
        score
    }
}

fn relative_rank(sq: Square, color: Color) -> usize {
    match color {
        Color::White => sq.rank() as usize,
        Color::Black => 7 - sq.rank() as usize,
    }
}

/// Squares strictly behind `sq` from `color`'s point of view, on every file.
fn behind(sq: Square, color: Color) -> Bitboard {
    let below = Bitboard::new(sq.bit() - 1) & !Bitboard::rank(sq.rank());
    match color {
        Color::White => below,
        Color::Black => !(below | Bitboard::rank(sq.rank())),
    }
}

/// Fixed-size cache of [`PawnEntry`] values. The slot is chosen by the low
/// bits of the pawn key and the full key is compared on probe.
pub struct PawnHashTable {
    entries: Vec<Option<PawnEntry>>,
    mask: usize,
    hits: u64,
    misses: u64,
}

impl PawnHashTable {
    /// A table with `entries` slots, rounded down to a power of two.
    pub fn new(entries: usize) -> PawnHashTable {
        let size = floor_power_of_two(entries.max(1));
        PawnHashTable {
            entries: vec![None; size],
            mask: size - 1,
            hits: 0,
            misses: 0,
        }
    }

    /// The cached entry for the pawns of `pos`, computing and storing it on a miss.
    pub fn probe(&mut self, pos: &Position, tables: &Tables) -> PawnEntry {
        let key = pos.pawn_hash();
        let slot = (key as usize) & self.mask;
        if let Some(entry) = self.entries[slot].filter(|e| e.key == key) {
            self.hits += 1;
            return entry;
        }
        self.misses += 1;
        let entry = PawnEntry::compute(pos, tables);
        self.entries[slot] = Some(entry);
        entry
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.hits = 0;
        self.misses = 0;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// `(hits, misses)` since creation or the last clear.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

pub(crate) fn floor_power_of_two(n: usize) -> usize {
    if n == 0 { 0 } else { 1 << (usize::BITS - 1 - n.leading_zeros()) }
}

/// Pawn structure score without a cache, White-relative.
pub fn evaluate_pawns(pos: &Position, tables: &Tables) -> Score {
    PawnEntry::compute(pos, tables).score
}
