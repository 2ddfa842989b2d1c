//! Negamax alpha-beta with quiescence, check extensions and draw detection.
//!
//! Every function returns `None` once the control asks to stop. The position
//! is restored before `None` propagates, so an aborted search leaves it as it
//! was on entry.

use rookery_core::{Move, MoveList, Position, Tables, generate_moves, generate_tactical};
use tracing::trace;

use crate::eval::Evaluator;
use crate::search::control::SearchControl;
use crate::search::heuristics::MoveInfo;
use crate::search::ordering::{MovePicker, TT_MOVE, score_move};
use crate::search::see::filter_see_captures;
use crate::search::tt::{Bound, SearchPhase, TranspositionTable};
use crate::search::{INF, MATE, MAX_PLY, SearchStats};

/// Triangular table of principal variations, one row per ply.
pub struct PvTable {
    moves: [[Move; MAX_PLY]; MAX_PLY],
    len: [usize; MAX_PLY],
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            moves: [[Move::NULL; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        }
    }

    pub fn clear_ply(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// Row `ply` becomes `mv` followed by row `ply + 1`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        self.moves[ply][0] = mv;
        let child = ply + 1;
        if child >= MAX_PLY {
            self.len[ply] = 1;
            return;
        }
        let copy = self.len[child].min(MAX_PLY - 1);
        let (top, bottom) = self.moves.split_at_mut(child);
        top[ply][1..1 + copy].copy_from_slice(&bottom[0][..copy]);
        self.len[ply] = 1 + copy;
    }

    pub fn root_line(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

/// State threaded through one root iteration.
pub(super) struct Search<'a> {
    pub tables: &'a Tables,
    pub tt: &'a mut TranspositionTable,
    pub evaluator: &'a mut Evaluator,
    pub control: &'a SearchControl,
    pub stats: &'a mut SearchStats,
    pub info: &'a mut MoveInfo,
    pub pv: Box<PvTable>,
    pub max_check_extensions: u8,
    pub see_pruning: bool,
}

impl Search<'_> {
    /// Search every legal root move with a full window. Returns the score and
    /// the best move; the root must have at least one legal move.
    pub fn root(&mut self, pos: &mut Position, depth: i32) -> Option<(i32, Move)> {
        let tables = self.tables;
        let us = pos.side_to_move();
        self.pv.clear_ply(0);
        self.stats.nodes += 1;

        let tt_move = self.tt.probe(pos.hash(), 0).map_or(Move::NULL, |e| e.best_move);
        let hint = self.info.best.unwrap_or(tt_move);
        let moves = self.order_root(pos, generate_moves(pos, tables), hint);

        let mut alpha = -INF;
        let beta = INF;
        let mut best_move = Move::NULL;
        let mut counts = Vec::with_capacity(moves.len());

        for &mv in &moves {
            if !pos.is_castle_legal(tables, mv) {
                continue;
            }
            pos.make_move(mv);
            if pos.is_in_check(tables, us) {
                pos.unmake_move(mv);
                continue;
            }
            let before = self.stats.nodes;
            let (child_depth, extensions) = self.child_depth(pos, depth, 0);
            let result = self.negamax(pos, child_depth, 1, -beta, -alpha, extensions);
            pos.unmake_move(mv);
            let score = -result?;
            counts.push((mv, self.stats.nodes - before));

            if score > alpha || best_move.is_null() {
                alpha = alpha.max(score);
                best_move = mv;
                self.pv.update(0, mv);
                trace!(depth, mv = %mv, score, "new best root move");
            }
        }

        self.info.set_root_nodes(counts);
        self.info.best = Some(best_move);
        self.tt.store(pos.hash(), best_move, tt_depth(depth), alpha, Bound::Exact, SearchPhase::Main, 0);
        Some((alpha, best_move))
    }

    /// Last iteration's best move first, then the moves that needed the most
    /// nodes, then the static ordering.
    fn order_root(&self, pos: &Position, moves: MoveList, hint: Move) -> MoveList {
        let killers = (Move::NULL, Move::NULL);
        let mut keyed: Vec<(Move, u64, i32)> = moves
            .as_slice()
            .iter()
            .map(|&mv| (mv, self.info.root_nodes(mv), score_move(pos, self.tables, mv, hint, killers)))
            .collect();
        keyed.sort_by(|a, b| {
            let a_hint = a.2 == TT_MOVE;
            let b_hint = b.2 == TT_MOVE;
            b_hint.cmp(&a_hint).then(b.1.cmp(&a.1)).then(b.2.cmp(&a.2))
        });
        let mut ordered = MoveList::new();
        for (mv, _, _) in keyed {
            ordered.push(mv);
        }
        ordered
    }

    /// Depth for the child of a move just made: one ply less, or the same
    /// depth when the move gave check and the line has extensions left.
    fn child_depth(&mut self, pos: &Position, depth: i32, extensions: u8) -> (i32, u8) {
        if extensions < self.max_check_extensions && pos.in_check(self.tables) {
            self.stats.check_extensions += 1;
            (depth, extensions + 1)
        } else {
            (depth - 1, extensions)
        }
    }

    fn negamax(
        &mut self,
        pos: &mut Position,
        depth: i32,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
        extensions: u8,
    ) -> Option<i32> {
        let tables = self.tables;
        self.pv.clear_ply(ply);
        self.stats.nodes += 1;
        self.stats.seldepth = self.stats.seldepth.max(ply);
        if self.control.should_stop(self.stats.nodes) {
            return None;
        }
        if pos.is_threefold() || pos.has_insufficient_material() {
            return Some(0);
        }
        // Mate on the hundredth half-move still counts as mate.
        if pos.is_fifty_move_draw() && !pos.is_checkmate(tables) {
            return Some(0);
        }
        if ply >= MAX_PLY - 1 {
            return Some(self.evaluator.evaluate(pos, tables));
        }
        if depth <= 0 {
            return self.quiescence(pos, ply, alpha, beta);
        }

        let key = pos.hash();
        let mut tt_move = Move::NULL;
        if let Some(entry) = self.tt.probe(key, ply) {
            self.stats.tt_hits += 1;
            tt_move = entry.best_move;
            if i32::from(entry.depth) >= depth {
                match entry.bound {
                    Bound::Exact => {
                        self.stats.tt_cutoffs += 1;
                        return Some(entry.score);
                    }
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    self.stats.tt_cutoffs += 1;
                    return Some(entry.score);
                }
            }
        }

        let us = pos.side_to_move();
        let in_check = pos.in_check(tables);
        let original_alpha = alpha;
        let mut best_move = Move::NULL;
        let mut legal = 0;
        let moves = generate_moves(pos, tables);
        let killers = self.info.killers.get(ply);
        let picker = MovePicker::main(pos, tables, &moves, tt_move, killers);

        for mv in picker {
            if !pos.is_castle_legal(tables, mv) {
                continue;
            }
            pos.make_move(mv);
            if pos.is_in_check(tables, us) {
                pos.unmake_move(mv);
                continue;
            }
            legal += 1;
            let (child_depth, child_extensions) = self.child_depth(pos, depth, extensions);
            let result = self.negamax(pos, child_depth, ply + 1, -beta, -alpha, child_extensions);
            pos.unmake_move(mv);
            let score = -result?;

            if score >= beta {
                self.tt.store(key, mv, tt_depth(depth), beta, Bound::Lower, SearchPhase::Main, ply);
                if !mv.is_tactical() {
                    self.info.killers.store(ply, mv);
                }
                self.stats.beta_cutoffs += 1;
                return Some(beta);
            }
            if score > alpha {
                alpha = score;
                best_move = mv;
                self.pv.update(ply, mv);
            }
        }

        if legal == 0 {
            return Some(if in_check { -MATE + ply as i32 } else { 0 });
        }

        let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
        let stored = if best_move.is_null() { tt_move } else { best_move };
        self.tt.store(key, stored, tt_depth(depth), alpha, bound, SearchPhase::Main, ply);
        Some(alpha)
    }

    fn quiescence(&mut self, pos: &mut Position, ply: usize, mut alpha: i32, beta: i32) -> Option<i32> {
        let tables = self.tables;
        self.pv.clear_ply(ply);
        self.stats.nodes += 1;
        self.stats.qnodes += 1;
        self.stats.seldepth = self.stats.seldepth.max(ply);
        if self.control.should_stop(self.stats.nodes) {
            return None;
        }
        if pos.has_insufficient_material() {
            return Some(0);
        }
        let stand_pat = self.evaluator.evaluate(pos, tables);
        if ply >= MAX_PLY - 1 {
            return Some(stand_pat);
        }

        let key = pos.hash();
        if stand_pat >= beta {
            self.tt.store(key, Move::NULL, 0, beta, Bound::Lower, SearchPhase::Quiescence, ply);
            return Some(beta);
        }
        let original_alpha = alpha;
        alpha = alpha.max(stand_pat);

        let us = pos.side_to_move();
        let mut moves = generate_tactical(pos, tables);
        if self.see_pruning {
            filter_see_captures(pos, tables, &mut moves);
        }
        let mut best_move = Move::NULL;

        for mv in MovePicker::quiescence(pos, &moves) {
            pos.make_move(mv);
            if pos.is_in_check(tables, us) {
                pos.unmake_move(mv);
                continue;
            }
            let result = self.quiescence(pos, ply + 1, -beta, -alpha);
            pos.unmake_move(mv);
            let score = -result?;

            if score >= beta {
                self.tt.store(key, mv, 0, beta, Bound::Lower, SearchPhase::Quiescence, ply);
                return Some(beta);
            }
            if score > alpha {
                alpha = score;
                best_move = mv;
                self.pv.update(ply, mv);
            }
        }

        let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
        self.tt.store(key, best_move, 0, alpha, bound, SearchPhase::Quiescence, ply);
        Some(alpha)
    }
}

fn tt_depth(depth: i32) -> u8 {
    depth.clamp(0, i32::from(u8::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use rookery_core::Square;

    /// Quiescence from the root of `fen`, returning the score and the
    /// quiescence node count.
    fn quiesce(fen: &str, see_pruning: bool) -> (i32, u64) {
        let mut pos: Position = fen.parse().unwrap();
        let mut tt = TranspositionTable::new(1);
        let mut evaluator = Evaluator::new(1024);
        let control = SearchControl::new(Arc::new(AtomicBool::new(false)));
        let mut stats = SearchStats::default();
        let mut info = MoveInfo::new();
        let score = {
            let mut search = Search {
                tables: Tables::shared(),
                tt: &mut tt,
                evaluator: &mut evaluator,
                control: &control,
                stats: &mut stats,
                info: &mut info,
                pv: Box::new(PvTable::new()),
                max_check_extensions: 16,
                see_pruning,
            };
            search.quiescence(&mut pos, 0, -INF, INF).unwrap()
        };
        (score, stats.qnodes)
    }

    #[test]
    fn see_pruning_skips_losing_captures_in_quiescence() {
        // Qxc5 is the only capture and loses the queen to dxc5.
        let fen = "7k/8/3p4/2p5/8/4Q3/8/4K3 w - - 0 1";
        let (pruned_score, pruned_nodes) = quiesce(fen, true);
        let (full_score, full_nodes) = quiesce(fen, false);
        assert_eq!(pruned_nodes, 1);
        assert!(full_nodes > pruned_nodes);
        assert_eq!(pruned_score, full_score);
    }

    #[test]
    fn pv_update_prepends_to_the_child_line() {
        let mut pv = PvTable::new();
        let a = Move::quiet(Square::E2, Square::E4);
        let b = Move::quiet(Square::E7, Square::E5);
        let c = Move::quiet(Square::G1, Square::F3);
        pv.update(2, c);
        pv.update(1, b);
        pv.update(0, a);
        assert_eq!(pv.root_line(), &[a, b, c]);
        pv.clear_ply(1);
        pv.update(0, a);
        assert_eq!(pv.root_line(), &[a]);
    }

    #[test]
    fn tt_depth_saturates() {
        assert_eq!(tt_depth(-3), 0);
        assert_eq!(tt_depth(7), 7);
        assert_eq!(tt_depth(1000), 255);
    }
}
