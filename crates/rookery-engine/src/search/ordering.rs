//! Move ordering: scores for every generated move and a selection-sort picker.

use rookery_core::{Move, MoveList, PieceKind, Position, Tables, MAX_MOVES};

use crate::eval::material::piece_value;
use crate::search::see::see_move;

pub const TT_MOVE: i32 = 1_000_000;
pub const PROMOTIONS: i32 = 900_000;
pub const CAPTURES: i32 = 800_000;
pub const KILLER: i32 = 700_000;
pub const KILLER2: i32 = 690_000;
pub const CHECKS: i32 = 600_000;
pub const NORMAL: i32 = 0;
/// Rook, bishop and knight promotions: below every quiet move.
pub const UNDER_PROMOTION: i32 = -50_000;
/// Captures that lose material by exchange come last.
pub const LOSING_CAPTURES: i32 = -100_000;

const fn weight(kind: usize) -> i32 {
    match kind {
        1 => 1,
        2 | 3 => 3,
        4 => 5,
        5 => 9,
        _ => 0,
    }
}

const fn mvv_lva_table() -> [[i32; PieceKind::SLOTS]; PieceKind::SLOTS] {
    let mut table = [[0; PieceKind::SLOTS]; PieceKind::SLOTS];
    let mut victim = 1;
    while victim < PieceKind::SLOTS {
        let mut attacker = 1;
        while attacker < PieceKind::SLOTS {
            table[victim][attacker] = weight(victim) * 16 - weight(attacker);
            attacker += 1;
        }
        victim += 1;
    }
    table
}

/// `[victim][attacker]`: the most valuable victim first, then the cheapest attacker.
static MVV_LVA: [[i32; PieceKind::SLOTS]; PieceKind::SLOTS] = mvv_lva_table();

#[inline]
pub fn mvv_lva(attacker: PieceKind, victim: PieceKind) -> i32 {
    MVV_LVA[victim.index()][attacker.index()]
}

fn victim_of(pos: &Position, mv: Move) -> Option<PieceKind> {
    if mv.is_en_passant() {
        Some(PieceKind::Pawn)
    } else {
        pos.piece_at(mv.to()).kind()
    }
}

/// True if the moved piece attacks the enemy king from its new square.
/// Discovered checks and checks by a castling rook are not seen.
pub fn gives_direct_check(pos: &Position, tables: &Tables, mv: Move) -> bool {
    if mv.is_castle() {
        return false;
    }
    let us = pos.side_to_move();
    let Some(kind) = mv.promotion_kind().or(pos.piece_at(mv.from()).kind()) else {
        return false;
    };
    let mut occupied = pos.occupied();
    occupied.unset(mv.from());
    occupied.set(mv.to());
    tables
        .piece_attacks(kind, us, mv.to(), occupied)
        .is_set(pos.king_square(!us))
}

/// Ordering score of `mv` in the main search; higher is searched first.
pub fn score_move(pos: &Position, tables: &Tables, mv: Move, tt_move: Move, killers: (Move, Move)) -> i32 {
    if mv == tt_move {
        return TT_MOVE;
    }
    if let Some(kind) = mv.promotion_kind() {
        let victim = victim_of(pos, mv).map_or(0, piece_value);
        return match kind {
            PieceKind::Queen => PROMOTIONS + victim,
            _ => UNDER_PROMOTION + piece_value(kind) + victim,
        };
    }
    if mv.is_capture() {
        let attacker = pos.piece_at(mv.from()).kind().unwrap_or(PieceKind::Pawn);
        let victim = victim_of(pos, mv).unwrap_or(PieceKind::Pawn);
        let exchange = see_move(pos, tables, mv);
        return if exchange >= 0 {
            CAPTURES + mvv_lva(attacker, victim)
        } else {
            LOSING_CAPTURES + exchange
        };
    }
    if mv == killers.0 {
        KILLER
    } else if mv == killers.1 {
        KILLER2
    } else if gives_direct_check(pos, tables, mv) {
        CHECKS
    } else {
        NORMAL
    }
}

/// Ordering score in quiescence: promotions, then captures by MVV-LVA.
pub fn score_tactical(pos: &Position, mv: Move) -> i32 {
    let victim = victim_of(pos, mv);
    match mv.promotion_kind() {
        Some(PieceKind::Queen) => PROMOTIONS + victim.map_or(0, piece_value),
        Some(kind) => UNDER_PROMOTION + piece_value(kind),
        None => {
            let attacker = pos.piece_at(mv.from()).kind().unwrap_or(PieceKind::Pawn);
            CAPTURES + mvv_lva(attacker, victim.unwrap_or(PieceKind::Pawn))
        }
    }
}

/// Hands out moves best score first, sorting lazily one pick at a time.
pub struct MovePicker {
    moves: [Move; MAX_MOVES],
    scores: [i32; MAX_MOVES],
    len: usize,
    cursor: usize,
}

impl MovePicker {
    pub fn with_scores(moves: &MoveList, mut score: impl FnMut(Move) -> i32) -> Self {
        let mut picker = Self {
            moves: [Move::NULL; MAX_MOVES],
            scores: [0; MAX_MOVES],
            len: moves.len(),
            cursor: 0,
        };
        for (i, &mv) in moves.as_slice().iter().enumerate() {
            picker.moves[i] = mv;
            picker.scores[i] = score(mv);
        }
        picker
    }

    pub fn main(pos: &Position, tables: &Tables, moves: &MoveList, tt_move: Move, killers: (Move, Move)) -> Self {
        Self::with_scores(moves, |mv| score_move(pos, tables, mv, tt_move, killers))
    }

    pub fn quiescence(pos: &Position, moves: &MoveList) -> Self {
        Self::with_scores(moves, |mv| score_tactical(pos, mv))
    }

    /// Moves not yet handed out.
    pub fn remaining(&self) -> usize {
        self.len - self.cursor
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if self.cursor >= self.len {
            return None;
        }
        let mut best = self.cursor;
        for i in self.cursor + 1..self.len {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        self.moves.swap(self.cursor, best);
        self.scores.swap(self.cursor, best);
        let mv = self.moves[self.cursor];
        self.cursor += 1;
        Some(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookery_core::{STARTING_FEN, Square, generate_moves};

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn mvv_lva_prefers_big_victims_and_small_attackers() {
        assert!(mvv_lva(PieceKind::Pawn, PieceKind::Queen) > mvv_lva(PieceKind::Queen, PieceKind::Pawn));
        assert!(mvv_lva(PieceKind::Pawn, PieceKind::Rook) > mvv_lva(PieceKind::Knight, PieceKind::Rook));
        assert!(mvv_lva(PieceKind::Knight, PieceKind::Rook) > mvv_lva(PieceKind::Queen, PieceKind::Rook));
        assert!(mvv_lva(PieceKind::Queen, PieceKind::Rook) > mvv_lva(PieceKind::Pawn, PieceKind::Bishop));
    }

    #[test]
    fn bands_are_ordered() {
        let bands = [TT_MOVE, PROMOTIONS, CAPTURES, KILLER, KILLER2, CHECKS, NORMAL, UNDER_PROMOTION, LOSING_CAPTURES];
        assert!(bands.windows(2).all(|w| w[0] > w[1]));
        assert!(CAPTURES + mvv_lva(PieceKind::King, PieceKind::Queen) < PROMOTIONS);
    }

    #[test]
    fn picker_hands_out_every_move_once_in_score_order() {
        let t = Tables::shared();
        let p = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let moves = generate_moves(&p, t);
        let tt_move = Move::quiet(Square::A2, Square::A3);
        let picked: Vec<Move> = MovePicker::main(&p, t, &moves, tt_move, (Move::NULL, Move::NULL)).collect();
        assert_eq!(picked.len(), moves.len());
        assert_eq!(picked[0], tt_move);
        let scores: Vec<i32> = picked.iter().map(|&m| score_move(&p, t, m, tt_move, (Move::NULL, Move::NULL))).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn killers_outrank_quiet_moves_but_not_captures() {
        let t = Tables::shared();
        let p = pos("4k3/8/8/4p3/3Q4/8/8/4K3 w - - 0 1");
        let moves = generate_moves(&p, t);
        let killer = Move::quiet(Square::D4, Square::A4);
        let order: Vec<Move> = MovePicker::main(&p, t, &moves, Move::NULL, (killer, Move::NULL)).collect();
        assert_eq!(order[0], Move::capture(Square::D4, Square::E5));
        assert_eq!(order[1], killer);
    }

    #[test]
    fn losing_capture_goes_last() {
        let t = Tables::shared();
        let p = pos("7k/8/3p4/2p5/8/4Q3/8/4K3 w - - 0 1");
        let moves = generate_moves(&p, t);
        let order: Vec<Move> = MovePicker::main(&p, t, &moves, Move::NULL, (Move::NULL, Move::NULL)).collect();
        assert_eq!(*order.last().unwrap(), Move::capture(Square::E3, Square::C5));
    }

    #[test]
    fn checking_quiet_moves_come_before_other_quiets() {
        let t = Tables::shared();
        let p = pos("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let mv = Move::quiet(Square::A1, Square::A8);
        assert!(gives_direct_check(&p, t, mv));
        assert_eq!(score_move(&p, t, mv, Move::NULL, (Move::NULL, Move::NULL)), CHECKS);
        assert_eq!(score_move(&p, t, Move::quiet(Square::A1, Square::A2), Move::NULL, (Move::NULL, Move::NULL)), NORMAL);
    }

    #[test]
    fn under_promotions_trail_quiet_moves() {
        let t = Tables::shared();
        let p = pos("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let moves = generate_moves(&p, t);
        let order: Vec<Move> = MovePicker::main(&p, t, &moves, Move::NULL, (Move::NULL, Move::NULL)).collect();
        assert_eq!(order[0].promotion_kind(), Some(PieceKind::Queen));
        let first_under = order.iter().position(|m| m.promotion_kind() == Some(PieceKind::Rook)).unwrap();
        assert!(order[1..first_under].iter().all(|m| !m.is_promotion()));
    }

    #[test]
    fn quiet_start_position_has_nothing_tactical() {
        let t = Tables::shared();
        let p = pos(STARTING_FEN);
        let moves = generate_moves(&p, t);
        assert!(moves.as_slice().iter().all(|&m| score_move(&p, t, m, Move::NULL, (Move::NULL, Move::NULL)) == NORMAL));
    }
}
