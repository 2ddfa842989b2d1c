//! Transposition table.
//!
//! A fixed array of slots indexed by the low bits of the Zobrist key, with the
//! full key kept in the entry to reject collisions. The search is the only
//! writer, so the table is a plain `Vec` behind `&mut self`.

use rookery_core::Move;
use tracing::debug;

use super::MATE_THRESHOLD;
use crate::eval::pawns::floor_power_of_two;

/// What the stored score says about the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Failed high: the true score is at least this.
    Lower,
    /// Failed low: the true score is at most this.
    Upper,
}

/// Which part of the search wrote an entry. Ordered so that a main-search
/// entry is never replaced by a quiescence one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchPhase {
    Quiescence,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    /// Best or refuting move, [`Move::NULL`] when none was found.
    pub best_move: Move,
    pub depth: u8,
    /// Relative to the probing node once returned from [`TranspositionTable::probe`].
    pub score: i32,
    pub bound: Bound,
    pub phase: SearchPhase,
}

/// Mate scores are stored as distance from the storing node instead of from
/// the root, so they stay correct when the position recurs at another ply.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    mask: u64,
}

impl TranspositionTable {
    /// A table of `mb` megabytes, with the entry count rounded down to a
    /// power of two.
    pub fn new(mb: usize) -> TranspositionTable {
        let bytes = mb.max(1) * 1024 * 1024;
        let count = floor_power_of_two(bytes / std::mem::size_of::<Option<TtEntry>>()).max(1);
        debug!(mb, entries = count, "transposition table sized");
        TranspositionTable {
            entries: vec![None; count],
            mask: count as u64 - 1,
        }
    }

    #[inline]
    fn slot(&self, key: u64) -> usize {
        (key & self.mask) as usize
    }

    /// The entry for `key`, with a mate score adjusted to `ply`.
    pub fn probe(&self, key: u64, ply: usize) -> Option<TtEntry> {
        self.entries[self.slot(key)]
            .filter(|e| e.key == key)
            .map(|e| TtEntry { score: score_from_tt(e.score, ply), ..e })
    }

    /// Store unless the slot holds an entry that is deeper or from a later phase.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        key: u64,
        best_move: Move,
        depth: u8,
        score: i32,
        bound: Bound,
        phase: SearchPhase,
        ply: usize,
    ) {
        let slot = self.slot(key);
        if let Some(existing) = &self.entries[slot] {
            if depth < existing.depth || phase < existing.phase {
                return;
            }
        }
        self.entries[slot] = Some(TtEntry {
            key,
            best_move,
            depth,
            score: score_to_tt(score, ply),
            bound,
            phase,
        });
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Occupied slots per thousand, sampled from the first thousand.
    pub fn hashfull(&self) -> u32 {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample].iter().filter(|e| e.is_some()).count();
        (used * 1000 / sample) as u32
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.entries.len())
            .field("hashfull", &self.hashfull())
            .finish()
    }
}
