//! Search scenarios: forced mates, promotion races, and tactical blunders the
//! search must avoid.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use rookery_core::{Color, PieceKind, Position, Square, Tables};
use rookery_engine::eval::material::piece_value;
use rookery_engine::{
    EngineConfig, MATE, MATE_THRESHOLD, SearchControl, SearchFlag, SearchLimits, SearchResult, Searcher,
};

fn search(fen: &str, depth: u8) -> SearchResult {
    search_with(fen, depth, |_| {})
}

fn search_with(fen: &str, depth: u8, mut on_iteration: impl FnMut(&SearchResult)) -> SearchResult {
    let mut pos: Position = fen.parse().unwrap();
    let before = pos.clone();
    let mut searcher = Searcher::new(&EngineConfig { hash_mb: 4, ..EngineConfig::default() });
    let control = SearchControl::new(Arc::new(AtomicBool::new(false)));
    let result = searcher
        .iterate(&mut pos, Tables::shared(), &SearchLimits::depth(depth), &control, |r, _| on_iteration(r))
        .unwrap();
    assert_eq!(pos, before, "search changed the position");
    result
}

// ── Forced mates ──────────────────────────────────────────────────────────────

#[test]
fn queen_and_knight_mate_in_one() {
    let result = search("7K/8/8/3Q4/1N6/8/8/k7 w - - 0 1", 2);
    assert_eq!(result.best_move.to_uci(), "d5a2");
    assert_eq!(result.score, MATE - 1);
    assert!(result.white_score(Color::White) > MATE_THRESHOLD);
    assert_eq!(result.flags, SearchFlag::Check);
}

#[test]
fn queen_and_knight_mate_in_one_for_black() {
    let result = search("7k/8/8/3q4/1n6/8/8/K7 b - - 0 1", 2);
    assert_eq!(result.best_move.to_uci(), "d5a2");
    assert_eq!(result.score, MATE - 1);
    assert!(result.white_score(Color::Black) < -MATE_THRESHOLD);
}

// ── Endgames ──────────────────────────────────────────────────────────────────

#[test]
fn king_escorts_the_pawn_to_promotion() {
    let result = search("1k6/1P6/8/1K6/8/8/8/8 w - - 0 1", 5);
    let uci = result.best_move.to_uci();
    assert!(uci == "b5c6" || uci == "b5a6", "played {uci}");
    assert!(result.score > piece_value(PieceKind::Queen), "score {}", result.score);
}

// ── Tactics ───────────────────────────────────────────────────────────────────

#[test]
fn attacked_knight_is_saved() {
    let result = search("rnbqkbnr/ppp1pppp/8/8/3p4/2N5/PPPPPPPP/1RBQKBNR w Kkq - 0 3", 3);
    assert_eq!(result.best_move.from(), Square::C3, "played {}", result.best_move);
}

#[test]
fn does_not_walk_into_mate() {
    let result = search("5rk1/B3bppp/8/6P1/b1p1pP2/2P5/Pr4P1/R3K1NR w KQ - 0 24", 2);
    assert!(result.score > -MATE + 100, "score {}", result.score);
    assert!(!result.best_move.is_null());
}

#[test]
fn does_not_hang_the_knight_on_c7() {
    let mut seen = Vec::new();
    let result = search_with("r2qkbnr/pp2pppp/8/1Np1P3/3p2b1/8/PPP1PPPP/R1BQKB1R w KQkq c6 0 7", 4, |r| {
        seen.push(r.depth);
    });
    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_ne!(result.best_move.to_uci(), "b5c7");
}
