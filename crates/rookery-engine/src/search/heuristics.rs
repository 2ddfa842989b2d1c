//! Ordering state carried from one iteration to the next.

use rookery_core::Move;

use super::MAX_PLY;

/// Two killer moves per ply: quiet moves that caused a beta cutoff.
#[derive(Clone)]
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        Self { slots: [[Move::NULL; 2]; MAX_PLY] }
    }

    /// Make `mv` the primary killer at `ply`, demoting the old primary. A move
    /// that already is the primary killer leaves the table unchanged.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != mv {
            slot[1] = slot[0];
            slot[0] = mv;
        }
    }

    /// `(primary, secondary)` at `ply`; [`Move::NULL`] marks an empty slot.
    #[inline]
    pub fn get(&self, ply: usize) -> (Move, Move) {
        self.slots.get(ply).map_or((Move::NULL, Move::NULL), |s| (s[0], s[1]))
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Killers plus the node count spent below each root move in the last
/// completed iteration, used to order the root of the next one.
#[derive(Clone, Default)]
pub struct MoveInfo {
    pub killers: KillerTable,
    root_nodes: Vec<(Move, u64)>,
    /// Best root move of the last completed iteration.
    pub best: Option<Move>,
}

impl MoveInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes searched below `mv` at the root last iteration, 0 if unknown.
    pub fn root_nodes(&self, mv: Move) -> u64 {
        self.root_nodes.iter().find(|(m, _)| *m == mv).map_or(0, |&(_, n)| n)
    }

    pub fn set_root_nodes(&mut self, counts: Vec<(Move, u64)>) {
        self.root_nodes = counts;
    }

    pub fn clear(&mut self) {
        self.killers.clear();
        self.root_nodes.clear();
        self.best = None;
    }
}
