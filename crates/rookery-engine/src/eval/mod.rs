//! Handcrafted evaluation: material, piece-square tables, pawn structure and
//! king pawn cover, tapered between middlegame and endgame by material phase.

pub mod king_safety;
pub mod material;
pub mod pawns;
pub mod phase;
pub mod pst;
pub mod score;

use rookery_core::{Color, Position, Tables};

use self::pawns::{PawnEntry, PawnHashTable};
use self::score::Score;

/// Score of `pos` for the side to move, in centipawns. Pawn structure is
/// computed from scratch; use an [`Evaluator`] inside a search.
pub fn evaluate(pos: &Position, tables: &Tables) -> i32 {
    let pawns = PawnEntry::compute(pos, tables);
    white_relative(white_eval(pos, pawns.score), pos.side_to_move())
}

/// Convert between a White-relative score and one relative to `color`. The
/// conversion is its own inverse.
#[inline]
pub fn white_relative(score: i32, color: Color) -> i32 {
    score * color.sign()
}

fn white_eval(pos: &Position, pawns: Score) -> i32 {
    let tapered = pst::evaluate_pst(pos) + pawns + king_safety::evaluate_king_safety(pos);
    material::material(pos) + tapered.taper(phase::game_phase(pos))
}

/// Evaluation with a pawn hash table that survives between searches.
pub struct Evaluator {
    pawns: PawnHashTable,
}

impl Evaluator {
    pub fn new(pawn_entries: usize) -> Evaluator {
        Evaluator { pawns: PawnHashTable::new(pawn_entries) }
    }

    /// Same value as [`evaluate`], with the pawn structure looked up in the cache.
    pub fn evaluate(&mut self, pos: &Position, tables: &Tables) -> i32 {
        let pawns = self.pawns.probe(pos, tables);
        white_relative(white_eval(pos, pawns.score), pos.side_to_move())
    }

    pub fn pawn_table(&self) -> &PawnHashTable {
        &self.pawns
    }

    pub fn clear(&mut self) {
        self.pawns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookery_core::STARTING_FEN;

    fn eval(fen: &str) -> i32 {
        evaluate(&fen.parse().unwrap(), Tables::shared())
    }

    #[test]
    fn start_position_is_zero() {
        assert_eq!(eval(STARTING_FEN), 0);
    }

    #[test]
    fn score_follows_the_side_to_move() {
        let white = eval("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        let black = eval("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
        assert!(white > 800);
        assert_eq!(white, -black);
    }

    #[test]
    fn mirrored_positions_score_the_same() {
        let pairs = [
            (
                "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
                "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3",
            ),
            ("1k6/8/1p6/8/8/8/8/1K5R w - - 0 1", "1k5r/8/8/8/8/1P6/8/1K6 b - - 0 1"),
        ];
        for (a, b) in pairs {
            assert_eq!(eval(a), eval(b), "{a} vs {b}");
        }
    }

    #[test]
    fn cached_and_uncached_agree() {
        let t = Tables::shared();
        let mut evaluator = Evaluator::new(64);
        for fen in [
            STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            let pos: Position = fen.parse().unwrap();
            assert_eq!(evaluator.evaluate(&pos, t), evaluate(&pos, t));
            assert_eq!(evaluator.evaluate(&pos, t), evaluate(&pos, t));
        }
        assert_eq!(evaluator.pawn_table().stats(), (3, 3));
    }

    #[test]
    fn fresh_queen_against_bare_king_is_worth_more_than_a_queen() {
        // White has just promoted, Black's king is on the rim.
        assert!(eval("1Q6/2K5/k7/8/8/8/8/8 b - - 0 1") < -900);
    }

    #[test]
    fn white_relative_round_trips() {
        assert_eq!(white_relative(35, Color::White), 35);
        assert_eq!(white_relative(35, Color::Black), -35);
        assert_eq!(white_relative(white_relative(-7, Color::Black), Color::Black), -7);
    }
}
