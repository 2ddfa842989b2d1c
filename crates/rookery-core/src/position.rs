//! Position state: mailbox plus bitboards, clocks, hash keys, and undo stacks.

use std::fmt;

use crate::attacks::Tables;
use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// Upper bound on plies the undo stacks are sized for.
pub const MAX_PLIES: usize = 2048;

/// Castling, en passant, and castled flags: the state a move can change that the
/// move itself does not describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardInfo {
    pub castling: CastleRights,
    /// Square a pawn skipped on the previous ply's double push.
    pub en_passant: Option<Square>,
    pub has_castled: [bool; 2],
}

/// Per-ply snapshot restored by unmake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Undo {
    pub(crate) info: BoardInfo,
    pub(crate) halfmove_clock: u16,
    pub(crate) hash: u64,
    pub(crate) pawn_hash: u64,
}

/// One entry of the repetition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RepetitionEntry {
    pub(crate) key: u64,
    /// Set when the ply that produced this position moved a pawn, captured,
    /// or was a null move. No earlier position can recur after it.
    pub(crate) pawn_move_or_capture: bool,
}

/// A chess position that is mutated in place by make/unmake.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: [Piece; 64],
    pub(crate) pieces: [Bitboard; PieceKind::SLOTS],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) side_to_move: Color,
    pub(crate) info: BoardInfo,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) hash: u64,
    pub(crate) pawn_hash: u64,
    pub(crate) captured: Vec<Piece>,
    pub(crate) history: Vec<Undo>,
    pub(crate) capture_flags: Vec<bool>,
    pub(crate) repetition: Vec<RepetitionEntry>,
    pub(crate) move_index: usize,
}

impl Position {
    /// An empty board with White to move. Callers fill it through `put` and then
    /// call `reset_history`.
    pub(crate) fn empty() -> Position {
        Position {
            board: [Piece::EMPTY; 64],
            pieces: [Bitboard::EMPTY; PieceKind::SLOTS],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            info: BoardInfo::default(),
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            pawn_hash: 0,
            captured: Vec::with_capacity(64),
            history: Vec::with_capacity(MAX_PLIES),
            capture_flags: Vec::with_capacity(MAX_PLIES),
            repetition: Vec::with_capacity(MAX_PLIES),
            move_index: 0,
        }
    }

    /// Recompute keys and start a fresh history with this position as its only
    /// entry. Nothing before a loaded position counts toward repetition.
    pub(crate) fn reset_history(&mut self) {
        self.hash = self.recompute_hash();
        self.pawn_hash = self.recompute_pawn_hash();
        self.captured.clear();
        self.history.clear();
        self.capture_flags.clear();
        self.repetition.clear();
        self.repetition.push(RepetitionEntry { key: self.hash, pawn_move_or_capture: true });
        self.move_index = 0;
    }

    // --- mailbox/bitboard edits (no hashing) ---

    #[inline]
    pub(crate) fn put(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.board[sq.index()].is_empty(), "put on occupied {sq}");
        let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
            return;
        };
        self.board[sq.index()] = piece;
        self.pieces[kind.index()].set(sq);
        self.colors[color.index()].set(sq);
    }

    #[inline]
    pub(crate) fn take(&mut self, sq: Square) -> Piece {
        let piece = self.board[sq.index()];
        if let (Some(kind), Some(color)) = (piece.kind(), piece.color()) {
            self.board[sq.index()] = Piece::EMPTY;
            self.pieces[kind.index()].unset(sq);
            self.colors[color.index()].unset(sq);
        }
        piece
    }

    #[inline]
    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        let piece = self.board[from.index()];
        debug_assert!(self.board[to.index()].is_empty(), "relocate onto occupied {to}");
        let (Some(kind), Some(color)) = (piece.kind(), piece.color()) else {
            return;
        };
        self.board[from.index()] = Piece::EMPTY;
        self.board[to.index()] = piece;
        self.pieces[kind.index()].flip2(from, to);
        self.colors[color.index()].flip2(from, to);
    }

    // --- accessors ---

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    #[inline]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()] & self.colors[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        // FEN loading guarantees one king per side and make/unmake never removes it.
        self.pieces_of(color, PieceKind::King).lsb().unwrap_or(Square::A1)
    }

    #[inline]
    pub fn info(&self) -> BoardInfo {
        self.info
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.info.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.info.en_passant
    }

    #[inline]
    pub fn has_castled(&self, color: Color) -> bool {
        self.info.has_castled[color.index()]
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Zobrist key over pawns only; keys the pawn-structure cache.
    #[inline]
    pub fn pawn_hash(&self) -> u64 {
        self.pawn_hash
    }

    /// Plies applied since the position was loaded.
    #[inline]
    pub fn ply(&self) -> usize {
        self.move_index
    }

    /// True if the last applied move (or null move) was a capture.
    pub fn last_move_was_capture(&self) -> bool {
        self.capture_flags.last().copied().unwrap_or(false)
    }

    // --- hashing ---

    pub fn recompute_hash(&self) -> u64 {
        let mut hash = 0;
        for sq in self.occupied() {
            hash ^= zobrist::piece_square(self.board[sq.index()], sq);
        }
        if self.side_to_move == Color::Black {
            hash ^= zobrist::side_to_move();
        }
        hash ^= zobrist::castling(self.info.castling);
        if let Some(ep) = self.info.en_passant {
            hash ^= zobrist::en_passant(ep);
        }
        hash
    }

    pub fn recompute_pawn_hash(&self) -> u64 {
        self.pieces(PieceKind::Pawn)
            .fold(0, |h, sq| h ^ zobrist::piece_square(self.board[sq.index()], sq))
    }

    /// Mailbox and bitboards agree square by square, and the colors are disjoint.
    pub fn is_consistent(&self) -> bool {
        if (self.colors[0] & self.colors[1]).is_nonempty() {
            return false;
        }
        Square::all().all(|sq| {
            let piece = self.board[sq.index()];
            let kinds_set = PieceKind::ALL
                .iter()
                .filter(|k| self.pieces[k.index()].is_set(sq))
                .count();
            let colors_set = Color::ALL.iter().filter(|c| self.colors[c.index()].is_set(sq)).count();
            match (piece.kind(), piece.color()) {
                (Some(kind), Some(color)) => {
                    kinds_set == 1
                        && colors_set == 1
                        && self.pieces[kind.index()].is_set(sq)
                        && self.colors[color.index()].is_set(sq)
                }
                _ => kinds_set == 0 && colors_set == 0 && piece.is_empty(),
            }
        }) && self.pieces[0].is_empty()
    }

    // --- attacks ---

    /// True if any piece of `by` attacks `sq`, with sliders blocked by `occupied`.
    pub fn is_square_attacked_with(
        &self,
        tables: &Tables,
        sq: Square,
        by: Color,
        occupied: Bitboard,
    ) -> bool {
        let them = self.colors[by.index()];
        let queens = self.pieces(PieceKind::Queen);
        (tables.pawn_attacks(!by, sq) & self.pieces(PieceKind::Pawn) & them).is_nonempty()
            || (tables.knight(sq) & self.pieces(PieceKind::Knight) & them).is_nonempty()
            || (tables.king(sq) & self.pieces(PieceKind::King) & them).is_nonempty()
            || (tables.rook(sq, occupied) & (self.pieces(PieceKind::Rook) | queens) & them)
                .is_nonempty()
            || (tables.bishop(sq, occupied) & (self.pieces(PieceKind::Bishop) | queens) & them)
                .is_nonempty()
    }

    #[inline]
    pub fn is_square_attacked(&self, tables: &Tables, sq: Square, by: Color) -> bool {
        self.is_square_attacked_with(tables, sq, by, self.occupied())
    }

    /// Every piece of either color attacking `sq` given `occupied`.
    pub fn attackers_to(&self, tables: &Tables, sq: Square, occupied: Bitboard) -> Bitboard {
        let rooks = self.pieces(PieceKind::Rook) | self.pieces(PieceKind::Queen);
        let bishops = self.pieces(PieceKind::Bishop) | self.pieces(PieceKind::Queen);
        let pawns = self.pieces(PieceKind::Pawn);
        ((tables.pawn_attacks(Color::Black, sq) & pawns & self.colors[0])
            | (tables.pawn_attacks(Color::White, sq) & pawns & self.colors[1])
            | (tables.knight(sq) & self.pieces(PieceKind::Knight))
            | (tables.king(sq) & self.pieces(PieceKind::King))
            | (tables.rook(sq, occupied) & rooks)
            | (tables.bishop(sq, occupied) & bishops))
            & occupied
    }

    #[inline]
    pub fn is_in_check(&self, tables: &Tables, color: Color) -> bool {
        self.is_square_attacked(tables, self.king_square(color), !color)
    }

    /// True if the side to move is in check.
    #[inline]
    pub fn in_check(&self, tables: &Tables) -> bool {
        self.is_in_check(tables, self.side_to_move)
    }

    // --- draws ---

    /// Earlier occurrences of the current key with the same side to move, looking
    /// back no further than the last pawn move, capture, or null move.
    pub fn repetition_count(&self) -> usize {
        let Some(last) = self.repetition.len().checked_sub(1) else {
            return 0;
        };
        let key = self.repetition[last].key;
        let start = (0..=last)
            .rev()
            .find(|&i| self.repetition[i].pawn_move_or_capture)
            .unwrap_or(0);
        let mut count = 0;
        let mut i = last;
        while i >= start + 2 {
            i -= 2;
            if self.repetition[i].key == key {
                count += 1;
            }
        }
        count
    }

    /// Third occurrence of the same position.
    #[inline]
    pub fn is_threefold(&self) -> bool {
        self.repetition_count() >= 2
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can mate: bare kings, a single minor piece, or one bishop each
    /// on squares of the same color.
    pub fn has_insufficient_material(&self) -> bool {
        let heavy = self.pieces(PieceKind::Pawn)
            | self.pieces(PieceKind::Rook)
            | self.pieces(PieceKind::Queen);
        if heavy.is_nonempty() {
            return false;
        }
        let knights = self.pieces(PieceKind::Knight);
        let bishops = self.pieces(PieceKind::Bishop);
        let minors = (knights | bishops).popcount();
        if minors <= 1 {
            return true;
        }
        if knights.is_empty() && minors == 2 {
            let white = self.pieces_of(Color::White, PieceKind::Bishop);
            let black = self.pieces_of(Color::Black, PieceKind::Bishop);
            let light = Bitboard::LIGHT_SQUARES;
            return white.popcount() == 1
                && black.popcount() == 1
                && (white & light).is_empty() == (black & light).is_empty();
        }
        false
    }

    /// Any draw the rules declare without a claim from the position alone.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_threefold() || self.has_insufficient_material()
    }
}

/// Multi-line board diagram for logs and assertion messages.
pub struct PrettyBoard<'a>(pub &'a Position);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let sq = Square::from_index_unchecked(rank * 8 + file);
                write!(f, " {}", self.0.piece_at(sq))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::STARTING_FEN;

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn start_position_is_consistent() {
        let p = pos(STARTING_FEN);
        assert!(p.is_consistent());
        assert_eq!(p.occupied().popcount(), 32);
        assert_eq!(p.king_square(Color::White), Square::E1);
        assert_eq!(p.king_square(Color::Black), Square::E8);
        assert_eq!(p.hash(), p.recompute_hash());
        assert_ne!(p.pawn_hash(), 0);
    }

    #[test]
    fn attacked_squares_in_start_position() {
        let t = Tables::shared();
        let p = pos(STARTING_FEN);
        assert!(p.is_square_attacked(t, Square::F3, Color::White));
        assert!(p.is_square_attacked(t, Square::D6, Color::Black));
        assert!(!p.is_square_attacked(t, Square::E4, Color::White));
        assert!(!p.in_check(t));
    }

    #[test]
    fn slider_check_is_seen() {
        let t = Tables::shared();
        let p = pos("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1");
        assert!(p.in_check(t));
        let p = pos("4k3/4p3/8/8/8/8/8/4R1K1 b - - 0 1");
        assert!(!p.in_check(t));
    }

    #[test]
    fn attackers_include_both_colors() {
        let t = Tables::shared();
        let p = pos("4k3/8/3p4/4N3/8/5B2/8/4K3 w - - 0 1");
        let attackers = p.attackers_to(t, Square::D6, p.occupied());
        assert!(!attackers.is_set(Square::E5));
        let attackers = p.attackers_to(t, Square::E5, p.occupied());
        assert!(attackers.is_set(Square::D6));
        assert!(!attackers.is_set(Square::F3));
    }

    #[test]
    fn insufficient_material_cases() {
        assert!(pos("4k3/8/8/8/8/8/8/4K3 w - - 0 1").has_insufficient_material());
        assert!(pos("4k3/8/8/8/8/8/8/4KN2 w - - 0 1").has_insufficient_material());
        // bishops on c1 (dark) and f8 (dark)
        assert!(pos("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1").has_insufficient_material());
        // bishops on c1 (dark) and c8 (light)
        assert!(!pos("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1").has_insufficient_material());
        assert!(!pos("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1").has_insufficient_material());
        assert!(!pos("4k3/p7/8/8/8/8/8/4K3 w - - 0 1").has_insufficient_material());
    }

    #[test]
    fn fifty_move_rule_uses_halfmove_clock() {
        assert!(pos("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").is_fifty_move_draw());
        assert!(!pos("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").is_fifty_move_draw());
    }

    #[test]
    fn pretty_board_ends_with_fen() {
        let text = PrettyBoard(&pos(STARTING_FEN)).to_string();
        assert!(text.starts_with("8  r n b q k b n r"));
        assert!(text.ends_with(STARTING_FEN));
    }
}
