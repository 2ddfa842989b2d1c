//! In-place make/unmake with undo stacks and incremental Zobrist updates.

use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::position::{MAX_PLIES, Position, RepetitionEntry, Undo};
use crate::square::Square;
use crate::zobrist;

/// Square of the pawn removed by an en passant capture landing on `to`.
#[inline]
fn en_passant_victim(to: Square, mover: Color) -> Square {
    Square::from_index_unchecked((to.index() as i8 - mover.forward()) as u8)
}

impl Position {
    /// Apply a pseudo-legal move. The mover's king may be left in check; callers
    /// test that with [`Position::is_in_check`] and unmake if so.
    pub fn make_move(&mut self, mv: Move) {
        let from = mv.from();
        let to = mv.to();
        let piece = self.board[from.index()];
        let us = self.side_to_move;
        let them = !us;
        debug_assert!(piece.color() == Some(us), "make {mv:?} without a mover in {self}");
        debug_assert!(self.history.len() < MAX_PLIES, "undo stacks exceeded {MAX_PLIES} plies");

        self.history.push(Undo {
            info: self.info,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            pawn_hash: self.pawn_hash,
        });

        let mut hash = self.hash ^ zobrist::castling(self.info.castling) ^ zobrist::side_to_move();
        if let Some(ep) = self.info.en_passant {
            hash ^= zobrist::en_passant(ep);
        }
        let mut pawn_hash = self.pawn_hash;

        let is_pawn = piece.kind() == Some(PieceKind::Pawn);
        let mut was_capture = false;

        if mv.is_en_passant() {
            let victim_sq = en_passant_victim(to, us);
            let victim = self.take(victim_sq);
            let key = zobrist::piece_square(victim, victim_sq);
            hash ^= key;
            pawn_hash ^= key;
            was_capture = true;
        } else if !self.board[to.index()].is_empty() {
            let victim = self.take(to);
            let key = zobrist::piece_square(victim, to);
            hash ^= key;
            if victim.kind() == Some(PieceKind::Pawn) {
                pawn_hash ^= key;
            }
            self.captured.push(victim);
            was_capture = true;
        }
        self.capture_flags.push(was_capture);

        self.relocate(from, to);
        let slide = zobrist::piece_square(piece, from) ^ zobrist::piece_square(piece, to);
        hash ^= slide;
        if is_pawn {
            pawn_hash ^= slide;
        }

        let mut info = self.info;
        info.en_passant = None;

        if let Some(side) = mv.castle_side() {
            let path = side.path(us);
            let rook = self.board[path.rook_from.index()];
            self.relocate(path.rook_from, path.rook_to);
            hash ^= zobrist::piece_square(rook, path.rook_from) ^ zobrist::piece_square(rook, path.rook_to);
            info.has_castled[us.index()] = true;
        }

        // Covers king moves, rook moves off their origin, and rooks captured at home.
        info.castling = info.castling.after_move(from, to);

        if is_pawn {
            if from.index().abs_diff(to.index()) == 16 {
                info.en_passant = Some(Square::from_index_unchecked(((from.index() + to.index()) / 2) as u8));
            }
            if let Some(kind) = mv.promotion_kind() {
                let pawn = self.take(to);
                let promoted = Piece::new(kind, us);
                self.put(to, promoted);
                let pawn_key = zobrist::piece_square(pawn, to);
                hash ^= pawn_key ^ zobrist::piece_square(promoted, to);
                pawn_hash ^= pawn_key;
            }
        }

        hash ^= zobrist::castling(info.castling);
        if let Some(ep) = info.en_passant {
            hash ^= zobrist::en_passant(ep);
        }

        self.info = info;
        self.halfmove_clock = if is_pawn || was_capture { 0 } else { self.halfmove_clock + 1 };
        self.side_to_move = them;
        if them == Color::White {
            self.fullmove_number += 1;
        }
        self.hash = hash;
        self.pawn_hash = pawn_hash;
        self.move_index += 1;
        self.repetition.push(RepetitionEntry { key: hash, pawn_move_or_capture: is_pawn || was_capture });

        debug_assert_eq!(self.hash, self.recompute_hash(), "hash drift after {mv} in {self}");
    }

    /// Reverse the most recent [`Position::make_move`], which must have been given `mv`.
    pub fn unmake_move(&mut self, mv: Move) {
        let Some(undo) = self.history.pop() else {
            debug_assert!(false, "unmake {mv} with an empty history");
            return;
        };
        let was_capture = self.capture_flags.pop().unwrap_or(false);
        let from = mv.from();
        let to = mv.to();
        let us = !self.side_to_move;
        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        if mv.is_promotion() {
            self.take(to);
            self.put(to, Piece::new(PieceKind::Pawn, us));
        }
        self.relocate(to, from);

        if let Some(side) = mv.castle_side() {
            let path = side.path(us);
            self.relocate(path.rook_to, path.rook_from);
        }

        if was_capture {
            if mv.is_en_passant() {
                self.put(en_passant_victim(to, us), Piece::new(PieceKind::Pawn, !us));
            } else if let Some(victim) = self.captured.pop() {
                self.put(to, victim);
            }
        }

        self.info = undo.info;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
        self.pawn_hash = undo.pawn_hash;
        self.move_index -= 1;
        self.repetition.pop();

        debug_assert!(self.is_consistent(), "board inconsistent after unmaking {mv} in {self}");
    }

    /// Pass the move: flip the side, clear en passant.
    pub fn make_null_move(&mut self) {
        self.history.push(Undo {
            info: self.info,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            pawn_hash: self.pawn_hash,
        });
        self.capture_flags.push(false);
        if let Some(ep) = self.info.en_passant.take() {
            self.hash ^= zobrist::en_passant(ep);
        }
        self.hash ^= zobrist::side_to_move();
        self.side_to_move = !self.side_to_move;
        self.move_index += 1;
        self.repetition.push(RepetitionEntry { key: self.hash, pawn_move_or_capture: true });
    }

    pub fn unmake_null_move(&mut self) {
        let Some(undo) = self.history.pop() else {
            debug_assert!(false, "unmake null move with an empty history");
            return;
        };
        self.capture_flags.pop();
        self.side_to_move = !self.side_to_move;
        self.info = undo.info;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
        self.pawn_hash = undo.pawn_hash;
        self.move_index -= 1;
        self.repetition.pop();
    }
}
