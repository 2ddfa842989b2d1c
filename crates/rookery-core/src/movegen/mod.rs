//! Pseudo-legal move generation.
//!
//! Moves are split into three buckets so a staged search can take promotions
//! first, captures next, and quiet moves last. A generated move may leave the
//! mover's king in check, and castles are emitted without looking at attacked
//! squares; the search filters both after making the move.

mod castling;
mod kind;
mod pawns;
mod pieces;

use crate::attacks::Tables;
use crate::chess_move::Move;
use crate::position::Position;

use self::kind::{AllMoves, GenKind, Tactical};

/// Capacity of a [`MoveList`]. No position has more than 218 moves.
pub const MAX_MOVES: usize = 256;

/// Stack-allocated buffer for generated moves.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// Append every move of `other`.
    pub fn extend_from(&mut self, other: &MoveList) {
        for &mv in other {
            self.push(mv);
        }
    }

    /// Keep only the moves for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut kept = 0;
        for i in 0..self.len {
            let mv = self.moves[i];
            if keep(mv) {
                self.moves[kept] = mv;
                kept += 1;
            }
        }
        self.len = kept;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice().iter().map(|m| m.to_string())).finish()
    }
}

/// Generated moves split by kind. Promotion captures live in `promotions`,
/// en passant in `captures`, castles in `moves`.
#[derive(Clone, Default, Debug)]
pub struct MoveListing {
    /// Quiet moves: pushes, piece moves to empty squares, castles.
    pub moves: MoveList,
    pub captures: MoveList,
    pub promotions: MoveList,
}

impl MoveListing {
    pub fn new() -> MoveListing {
        MoveListing::default()
    }

    pub fn len(&self) -> usize {
        self.moves.len() + self.captures.len() + self.promotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Promotions, then captures, then quiet moves, in one list.
    pub fn flatten(&self) -> MoveList {
        let mut list = MoveList::new();
        list.extend_from(&self.promotions);
        list.extend_from(&self.captures);
        list.extend_from(&self.moves);
        list
    }
}

fn generate<G: GenKind>(pos: &Position, tables: &Tables) -> MoveListing {
    let mut listing = MoveListing::new();
    pawns::generate::<G>(pos, tables, &mut listing);
    pieces::generate::<G>(pos, tables, &mut listing);
    if G::QUIETS {
        castling::generate(pos, &mut listing);
    }
    listing
}

/// Every pseudo-legal move for the side to move, bucketed.
pub fn generate_listing(pos: &Position, tables: &Tables) -> MoveListing {
    generate::<AllMoves>(pos, tables)
}

/// Every pseudo-legal move, promotions first and quiet moves last.
pub fn generate_moves(pos: &Position, tables: &Tables) -> MoveList {
    generate_listing(pos, tables).flatten()
}

/// Captures and promotions only (the quiescence move set), with the
/// `moves` bucket left empty.
pub fn generate_tactical_listing(pos: &Position, tables: &Tables) -> MoveListing {
    generate::<Tactical>(pos, tables)
}

/// Captures and promotions in one list, promotions first.
pub fn generate_tactical(pos: &Position, tables: &Tables) -> MoveList {
    generate_tactical_listing(pos, tables).flatten()
}
