//! Perft (performance test) for move generation correctness verification.
//!
//! Generation is pseudo-legal, so every move is made and dropped again when it
//! leaves the mover in check or castles across an attacked square.

use std::ops::AddAssign;

use crate::attacks::Tables;
use crate::movegen::generate_moves;
use crate::position::Position;

/// Leaf counters broken down by move kind, counted at the last ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl AddAssign for PerftStats {
    fn add_assign(&mut self, other: PerftStats) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.en_passants += other.en_passants;
        self.castles += other.castles;
        self.promotions += other.promotions;
        self.checks += other.checks;
    }
}

/// Count the leaf nodes at the given depth. Depth 0 returns 1.
pub fn perft(pos: &mut Position, tables: &Tables, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let us = pos.side_to_move();
    let moves = generate_moves(pos, tables);
    let mut nodes = 0;
    for &mv in &moves {
        if !pos.is_castle_legal(tables, mv) {
            continue;
        }
        pos.make_move(mv);
        if !pos.is_in_check(tables, us) {
            nodes += if depth == 1 { 1 } else { perft(pos, tables, depth - 1) };
        }
        pos.unmake_move(mv);
    }
    nodes
}

/// Like [`perft`], with the leaf moves classified.
pub fn perft_stats(pos: &mut Position, tables: &Tables, depth: usize) -> PerftStats {
    let mut stats = PerftStats::default();
    if depth == 0 {
        stats.nodes = 1;
        return stats;
    }
    let us = pos.side_to_move();
    let moves = generate_moves(pos, tables);
    for &mv in &moves {
        if !pos.is_castle_legal(tables, mv) {
            continue;
        }
        pos.make_move(mv);
        if !pos.is_in_check(tables, us) {
            if depth == 1 {
                stats.nodes += 1;
                stats.captures += u64::from(mv.is_capture());
                stats.en_passants += u64::from(mv.is_en_passant());
                stats.castles += u64::from(mv.is_castle());
                stats.promotions += u64::from(mv.is_promotion());
                stats.checks += u64::from(pos.in_check(tables));
            } else {
                stats += perft_stats(pos, tables, depth - 1);
            }
        }
        pos.unmake_move(mv);
    }
    stats
}

/// Per-root-move node counts as `(uci_move, nodes)`, sorted by move string.
pub fn divide(pos: &mut Position, tables: &Tables, depth: usize) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = pos
        .legal_moves(tables)
        .as_slice()
        .iter()
        .map(|&mv| {
            pos.make_move(mv);
            let count = if depth <= 1 { 1 } else { perft(pos, tables, depth - 1) };
            pos.unmake_move(mv);
            (mv.to_uci(), count)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
