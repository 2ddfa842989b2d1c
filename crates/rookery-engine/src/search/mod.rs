//! Iterative-deepening alpha-beta search.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod see;
pub mod think;
pub mod tt;

use rookery_core::{Color, Move, Position, Tables};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::eval::{Evaluator, white_relative};
use control::{SearchControl, SearchLimits};
use heuristics::MoveInfo;
use negamax::{PvTable, Search};
use tt::TranspositionTable;

/// Deepest ply the search will visit; a node at the ceiling returns its
/// static evaluation.
pub const MAX_PLY: usize = 128;
/// Score of a mate at the root. A mate `n` plies away scores `MATE - n`.
pub const MATE: i32 = 29_000;
/// Bound wider than every reachable score.
pub const INF: i32 = 30_000;
/// Scores beyond this magnitude are mate scores.
pub const MATE_THRESHOLD: i32 = 28_000;

/// How the root position or the chosen move stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFlag {
    Normal,
    /// The side to move has no legal moves and is in check.
    Checkmate,
    /// The side to move has no legal moves and is not in check.
    Stalemate,
    /// The root is already drawn by repetition, the fifty-move rule, or
    /// insufficient material.
    DrawByRepetition,
    /// The chosen move gives check.
    Check,
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// [`Move::NULL`] when the root is terminal.
    pub best_move: Move,
    /// Centipawns from the side to move's point of view.
    pub score: i32,
    pub flags: SearchFlag,
    pub nodes: u64,
    /// Principal variation, starting with `best_move`.
    pub line: Vec<Move>,
    /// Deepest completed iteration.
    pub depth: u8,
    /// The search was cut short; the result is from the last full iteration.
    pub aborted: bool,
}

impl SearchResult {
    /// The score from White's point of view, given the side that searched.
    pub fn white_score(&self, side: Color) -> i32 {
        white_relative(self.score, side)
    }

    pub fn is_mate_score(&self) -> bool {
        self.score.abs() > MATE_THRESHOLD
    }

    fn terminal(flags: SearchFlag, score: i32) -> Self {
        Self {
            best_move: Move::NULL,
            score,
            flags,
            nodes: 0,
            line: Vec::new(),
            depth: 0,
            aborted: false,
        }
    }
}

/// Counters gathered over a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub check_extensions: u64,
    pub depth: u8,
    pub seldepth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search aborted before the first iteration completed")]
    Aborted,
}

/// Iterative-deepening searcher. The transposition and pawn hash tables live
/// here and are kept between searches.
pub struct Searcher {
    tt: TranspositionTable,
    evaluator: Evaluator,
    config: EngineConfig,
}

impl Searcher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tt: TranspositionTable::new(config.hash_mb),
            evaluator: Evaluator::new(config.pawn_hash_entries),
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Forget everything learned in earlier searches.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.evaluator.clear();
    }

    /// The result for a root with nothing to search: no legal moves, or a
    /// position that is already drawn.
    fn terminal(pos: &mut Position, tables: &Tables) -> Option<SearchResult> {
        if pos.legal_moves(tables).is_empty() {
            return Some(if pos.in_check(tables) {
                SearchResult::terminal(SearchFlag::Checkmate, -MATE)
            } else {
                SearchResult::terminal(SearchFlag::Stalemate, 0)
            });
        }
        if pos.is_draw() {
            return Some(SearchResult::terminal(SearchFlag::DrawByRepetition, 0));
        }
        None
    }

    /// Search the root to a fixed depth once. Returns `None` if the control
    /// stopped the search before the iteration finished.
    pub fn search_depth(
        &mut self,
        pos: &mut Position,
        tables: &Tables,
        depth: u8,
        stats: &mut SearchStats,
        move_info: &mut MoveInfo,
        control: &SearchControl,
    ) -> Option<SearchResult> {
        if let Some(result) = Self::terminal(pos, tables) {
            return Some(result);
        }
        let (score, best_move, mut line) = {
            let mut search = Search {
                tables,
                tt: &mut self.tt,
                evaluator: &mut self.evaluator,
                control,
                stats: &mut *stats,
                info: move_info,
                pv: Box::new(PvTable::new()),
                max_check_extensions: self.config.max_check_extensions,
                see_pruning: self.config.see_pruning,
            };
            let (score, best_move) = search.root(pos, i32::from(depth.max(1)))?;
            (score, best_move, search.pv.root_line().to_vec())
        };
        if line.first() != Some(&best_move) {
            line = vec![best_move];
        }
        stats.depth = depth;

        let flags = if pos.gives_check(tables, best_move) { SearchFlag::Check } else { SearchFlag::Normal };
        Some(SearchResult {
            best_move,
            score,
            flags,
            nodes: stats.nodes,
            line,
            depth,
            aborted: false,
        })
    }

    /// Deepen one ply at a time until the limits or the control say stop.
    ///
    /// `on_iteration` sees every completed iteration. An iteration cut short
    /// is discarded and the previous one is returned with `aborted` set.
    pub fn iterate<F>(
        &mut self,
        pos: &mut Position,
        tables: &Tables,
        limits: &SearchLimits,
        control: &SearchControl,
        mut on_iteration: F,
    ) -> Result<SearchResult, SearchError>
    where
        F: FnMut(&SearchResult, &SearchStats),
    {
        if let Some(result) = Self::terminal(pos, tables) {
            debug!(flags = ?result.flags, "root is terminal");
            return Ok(result);
        }

        let ceiling = (MAX_PLY - 1) as u8;
        let max_depth = limits.depth.unwrap_or(self.config.max_depth).clamp(1, ceiling);
        let mut stats = SearchStats::default();
        let mut move_info = MoveInfo::new();
        let mut completed: Option<SearchResult> = None;
        let mut aborted = false;

        for depth in 1..=max_depth {
            if completed.is_some() && control.should_stop_iterating() {
                aborted = control.is_stopped();
                break;
            }
            let Some(result) = self.search_depth(pos, tables, depth, &mut stats, &mut move_info, control) else {
                aborted = true;
                break;
            };
            debug!(
                depth,
                score = result.score,
                nodes = stats.nodes,
                seldepth = stats.seldepth,
                best = %result.best_move,
                "iteration complete"
            );
            on_iteration(&result, &stats);
            let mate_found = MATE - result.score.abs() <= i32::from(depth);
            completed = Some(result);
            if mate_found {
                break;
            }
        }

        match completed {
            Some(mut result) => {
                if aborted {
                    warn!(depth = result.depth, "search stopped mid-iteration");
                }
                result.aborted = aborted;
                result.nodes = stats.nodes;
                Ok(result)
            }
            None => {
                warn!(nodes = stats.nodes, "search stopped before depth 1 completed");
                Err(SearchError::Aborted)
            }
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use rookery_core::STARTING_FEN;

    fn position(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    fn control() -> SearchControl {
        SearchControl::new(Arc::new(AtomicBool::new(false)))
    }

    fn search(fen: &str, depth: u8) -> SearchResult {
        let mut pos = position(fen);
        let mut searcher = Searcher::default();
        searcher
            .iterate(&mut pos, Tables::shared(), &SearchLimits::depth(depth), &control(), |_, _| {})
            .unwrap()
    }

    #[test]
    fn depth_1_returns_legal_move() {
        let result = search(STARTING_FEN, 1);
        let mut pos = position(STARTING_FEN);
        assert!(pos.is_legal(Tables::shared(), result.best_move));
        assert_eq!(result.flags, SearchFlag::Normal);
    }

    #[test]
    fn finds_mate_in_one() {
        let result = search("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", 3);
        assert_eq!(result.best_move.to_uci(), "h5f7");
        assert_eq!(result.score, MATE - 1);
        assert_eq!(result.flags, SearchFlag::Check);
        assert!(result.is_mate_score());
    }

    #[test]
    fn stalemate_is_terminal() {
        let result = search("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(result.flags, SearchFlag::Stalemate);
        assert_eq!(result.score, 0);
        assert!(result.best_move.is_null());
    }

    #[test]
    fn checkmate_is_terminal() {
        let result = search("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(result.flags, SearchFlag::Checkmate);
        assert!(result.score < -MATE_THRESHOLD);
        assert!(result.best_move.is_null());
        assert!(result.line.is_empty());
    }

    #[test]
    fn dead_draw_is_terminal() {
        let result = search("8/8/4k3/8/8/3BK3/8/8 w - - 0 1", 4);
        assert_eq!(result.flags, SearchFlag::DrawByRepetition);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn repeated_root_is_a_draw() {
        let tables = Tables::shared();
        let mut pos = position(STARTING_FEN);
        for _ in 0..2 {
            for s in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                let mv = pos.parse_move(s).unwrap();
                pos.make_move(mv);
            }
        }
        let mut searcher = Searcher::default();
        let result = searcher.iterate(&mut pos, tables, &SearchLimits::depth(4), &control(), |_, _| {}).unwrap();
        assert_eq!(result.flags, SearchFlag::DrawByRepetition);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn iterate_reports_every_depth() {
        let mut pos = position(STARTING_FEN);
        let mut searcher = Searcher::default();
        let mut depths = Vec::new();
        let result = searcher
            .iterate(&mut pos, Tables::shared(), &SearchLimits::depth(4), &control(), |r, stats| {
                assert!(!r.best_move.is_null());
                assert_eq!(r.line.first(), Some(&r.best_move));
                assert_eq!(stats.depth, r.depth);
                depths.push(r.depth);
            })
            .unwrap();
        assert_eq!(depths, vec![1, 2, 3, 4]);
        assert_eq!(result.depth, 4);
        assert!(!result.aborted);
        assert!(result.line.len() >= 2);
    }

    #[test]
    fn search_leaves_the_position_untouched() {
        let mut pos = position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let before = pos.clone();
        let mut searcher = Searcher::default();
        searcher.iterate(&mut pos, Tables::shared(), &SearchLimits::depth(3), &control(), |_, _| {}).unwrap();
        assert_eq!(pos, before);
    }

    #[test]
    fn stop_after_first_iteration_keeps_its_result() {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new(Arc::clone(&stopped));
        let mut pos = position(STARTING_FEN);
        let before = pos.clone();
        let mut searcher = Searcher::default();
        let result = searcher
            .iterate(&mut pos, Tables::shared(), &SearchLimits::depth(64), &control, |_, _| {
                stopped.store(true, Ordering::Release);
            })
            .unwrap();
        assert_eq!(result.depth, 1);
        assert!(result.aborted);
        assert!(!result.best_move.is_null());
        assert_eq!(pos, before);
    }

    #[test]
    fn stop_before_start_is_an_error() {
        let control = SearchControl::new(Arc::new(AtomicBool::new(true)));
        let mut pos = position(STARTING_FEN);
        let mut searcher = Searcher::default();
        let result = searcher.iterate(&mut pos, Tables::shared(), &SearchLimits::depth(5), &control, |_, _| {});
        assert_eq!(result.unwrap_err(), SearchError::Aborted);
    }

    #[test]
    fn node_limit_aborts() {
        let control = control().with_node_limit(2_000);
        let mut pos = position(STARTING_FEN);
        let mut searcher = Searcher::default();
        let result = searcher.iterate(&mut pos, Tables::shared(), &SearchLimits::depth(30), &control, |_, _| {});
        let result = result.unwrap();
        assert!(result.aborted);
        assert!(result.depth < 30);
    }

    #[test]
    fn warm_tables_give_the_same_mate() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
        let mut pos = position(fen);
        let mut searcher = Searcher::default();
        let limits = SearchLimits::depth(3);
        let first = searcher.iterate(&mut pos, Tables::shared(), &limits, &control(), |_, _| {}).unwrap();
        let second = searcher.iterate(&mut pos, Tables::shared(), &limits, &control(), |_, _| {}).unwrap();
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(second.score, MATE - 1);
    }

    fn search_config(fen: &str, depth: u8, config: &EngineConfig) -> (SearchResult, SearchStats) {
        let mut pos = position(fen);
        let mut searcher = Searcher::new(config);
        let mut last = SearchStats::default();
        let result = searcher
            .iterate(&mut pos, Tables::shared(), &SearchLimits::depth(depth), &control(), |_, stats| {
                last = *stats;
            })
            .unwrap();
        (result, last)
    }

    #[test]
    fn check_extensions_respect_the_cap() {
        let fen = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1";
        let (_, extended) = search_config(fen, 2, &EngineConfig::default());
        assert!(extended.check_extensions > 0);

        let capped = EngineConfig { max_check_extensions: 0, ..EngineConfig::default() };
        let (result, stats) = search_config(fen, 2, &capped);
        assert_eq!(stats.check_extensions, 0);
        assert!(!result.best_move.is_null());
    }

    #[test]
    fn repetition_inside_the_tree_is_a_draw() {
        let mut pos = position("1n2k3/8/8/8/8/8/8/1N1QK3 w - - 0 1");
        for s in ["b1c3", "b8c6", "c3b1", "c6b8", "b1c3", "b8c6", "c3b1"] {
            let mv = pos.parse_move(s).unwrap();
            pos.make_move(mv);
        }
        assert!(!pos.is_draw());
        let mut searcher = Searcher::default();
        let result = searcher.iterate(&mut pos, Tables::shared(), &SearchLimits::depth(3), &control(), |_, _| {}).unwrap();
        assert_eq!(result.best_move.to_uci(), "c6b8");
        assert_eq!(result.score, 0);
        assert_eq!(result.flags, SearchFlag::Normal);
    }

    #[test]
    fn fifty_move_rule_inside_the_tree_is_a_draw() {
        let config = EngineConfig::default();
        let (fresh, _) = search_config("4k3/8/8/8/8/8/8/3QK3 w - - 0 80", 3, &config);
        assert!(fresh.score > 500, "score {}", fresh.score);

        let (expiring, _) = search_config("4k3/8/8/8/8/8/8/3QK3 w - - 98 80", 3, &config);
        assert_eq!(expiring.score, 0);
        assert!(!expiring.best_move.is_null());
    }

    #[test]
    fn mate_on_the_hundredth_half_move_is_still_mate() {
        let result = search("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80", 2);
        assert_eq!(result.best_move.to_uci(), "a1a8");
        assert_eq!(result.score, MATE - 1);
    }

    #[test]
    fn search_without_see_pruning_still_finds_mate() {
        let config = EngineConfig { see_pruning: false, ..EngineConfig::default() };
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
        let (result, stats) = search_config(fen, 3, &config);
        assert_eq!(result.best_move.to_uci(), "h5f7");
        assert_eq!(result.score, MATE - 1);
        assert!(stats.qnodes > 0);
    }

    #[test]
    fn white_score_flips_for_black() {
        let mut result = SearchResult::terminal(SearchFlag::Normal, 120);
        assert_eq!(result.white_score(Color::White), 120);
        assert_eq!(result.white_score(Color::Black), -120);
        result.score = -MATE + 3;
        assert!(result.is_mate_score());
    }
}
