//! Move validation on top of pseudo-legal generation.

use crate::attacks::Tables;
use crate::chess_move::Move;
use crate::error::IllegalMove;
use crate::movegen::{MoveList, generate_moves};
use crate::piece::PieceKind;
use crate::position::Position;

impl Position {
    /// Check that `mv` agrees with the pieces on its squares: a mover of the
    /// side to move, no friendly or king victim, and a promotion flag exactly
    /// when a pawn reaches the last rank. Whether the piece can actually reach
    /// the target is not examined.
    pub fn is_move_legal(&self, mv: Move) -> Result<(), IllegalMove> {
        let from = mv.from();
        let to = mv.to();
        let mover = self.piece_at(from);
        let (Some(kind), Some(color)) = (mover.kind(), mover.color()) else {
            return Err(IllegalMove::EmptyFrom(from));
        };
        if color != self.side_to_move {
            return Err(IllegalMove::WrongColor(from));
        }
        let victim = self.piece_at(to);
        if victim.color() == Some(color) {
            return Err(IllegalMove::CapturesOwnPiece(to));
        }
        if victim.kind() == Some(PieceKind::King) {
            return Err(IllegalMove::CapturesKing(to));
        }
        let reaches_last_rank = kind == PieceKind::Pawn && to.rank() == color.promotion_rank();
        match (reaches_last_rank, mv.is_promotion()) {
            (true, false) => Err(IllegalMove::MissingPromotion(to)),
            (false, true) => Err(IllegalMove::UnexpectedPromotion(to)),
            _ => Ok(()),
        }
    }

    /// A castle may not start from, pass through, or land on an attacked square.
    /// Non-castling moves pass trivially.
    pub fn is_castle_legal(&self, tables: &Tables, mv: Move) -> bool {
        let Some(side) = mv.castle_side() else {
            return true;
        };
        let path = side.path(self.side_to_move);
        let them = !self.side_to_move;
        [path.king_from, path.crossing, path.king_to]
            .into_iter()
            .all(|sq| !self.is_square_attacked(tables, sq, them))
    }

    /// Make `mv`, report whether the mover's own king is safe, and unmake it.
    /// `mv` must be pseudo-legal.
    pub fn leaves_king_safe(&mut self, tables: &Tables, mv: Move) -> bool {
        if !self.is_castle_legal(tables, mv) {
            return false;
        }
        let us = self.side_to_move;
        self.make_move(mv);
        let safe = !self.is_in_check(tables, us);
        self.unmake_move(mv);
        safe
    }

    /// True if playing `mv` puts the opponent in check.
    pub fn gives_check(&mut self, tables: &Tables, mv: Move) -> bool {
        self.make_move(mv);
        let check = self.in_check(tables);
        self.unmake_move(mv);
        check
    }

    /// Full legality: `mv` is generated here and does not leave the king in check.
    pub fn is_legal(&mut self, tables: &Tables, mv: Move) -> bool {
        generate_moves(self, tables).contains(mv) && self.leaves_king_safe(tables, mv)
    }

    /// Every legal move, promotions first and quiet moves last.
    pub fn legal_moves(&mut self, tables: &Tables) -> MoveList {
        let mut moves = generate_moves(self, tables);
        moves.retain(|mv| self.leaves_king_safe(tables, mv));
        moves
    }

    /// No legal moves and in check.
    pub fn is_checkmate(&mut self, tables: &Tables) -> bool {
        self.in_check(tables) && self.legal_moves(tables).is_empty()
    }

    /// No legal moves and not in check.
    pub fn is_stalemate(&mut self, tables: &Tables) -> bool {
        !self.in_check(tables) && self.legal_moves(tables).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::castle_rights::CastleSide;
    use crate::fen::STARTING_FEN;
    use crate::square::Square;

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn is_move_legal_reasons() {
        let p = pos("r3k3/1P6/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(
            p.is_move_legal(Move::quiet(Square::D4, Square::D5)),
            Err(IllegalMove::EmptyFrom(Square::D4))
        );
        assert_eq!(
            p.is_move_legal(Move::quiet(Square::A8, Square::A7)),
            Err(IllegalMove::WrongColor(Square::A8))
        );
        assert_eq!(
            p.is_move_legal(Move::capture(Square::A1, Square::E1)),
            Err(IllegalMove::CapturesOwnPiece(Square::E1))
        );
        assert_eq!(
            p.is_move_legal(Move::capture(Square::B7, Square::A8)),
            Err(IllegalMove::MissingPromotion(Square::A8))
        );
        assert_eq!(
            p.is_move_legal(Move::promotion(Square::A1, Square::A2, PieceKind::Queen, false)),
            Err(IllegalMove::UnexpectedPromotion(Square::A2))
        );
        assert_eq!(
            p.is_move_legal(Move::promotion(Square::B7, Square::A8, PieceKind::Queen, true)),
            Ok(())
        );
        let p = pos("4k3/8/8/8/8/8/8/4K2R w - - 0 1");
        assert_eq!(
            p.is_move_legal(Move::capture(Square::H1, Square::E1)),
            Err(IllegalMove::CapturesOwnPiece(Square::E1))
        );
        let p = pos("4k2R/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(
            p.is_move_legal(Move::capture(Square::H8, Square::E8)),
            Err(IllegalMove::CapturesKing(Square::E8))
        );
    }

    #[test]
    fn castling_through_an_attacked_square_is_illegal() {
        let t = Tables::shared();
        let mut p = pos("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let short = Move::castle(Square::E1, Square::G1, CastleSide::KingSide);
        let long = Move::castle(Square::E1, Square::C1, CastleSide::QueenSide);
        assert!(!p.is_castle_legal(t, short));
        assert!(p.is_castle_legal(t, long));
        let legal = p.legal_moves(t);
        assert!(!legal.contains(short));
        assert!(legal.contains(long));
    }

    #[test]
    fn castling_out_of_check_is_illegal() {
        let t = Tables::shared();
        let p = pos("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!p.is_castle_legal(t, Move::castle(Square::E1, Square::G1, CastleSide::KingSide)));
        assert!(!p.is_castle_legal(t, Move::castle(Square::E1, Square::C1, CastleSide::QueenSide)));
    }

    #[test]
    fn pinned_piece_moves_are_filtered() {
        let t = Tables::shared();
        let mut p = pos("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        let legal = p.legal_moves(t);
        assert!(legal.as_slice().iter().all(|m| m.from() != Square::E2));
        assert!(!p.is_legal(t, Move::quiet(Square::E2, Square::C3)));
    }

    #[test]
    fn gives_check_leaves_position_untouched() {
        let t = Tables::shared();
        let mut p = pos("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let before = p.clone();
        assert!(p.gives_check(t, Move::quiet(Square::A1, Square::A8)));
        assert!(!p.gives_check(t, Move::quiet(Square::A1, Square::A7)));
        assert_eq!(p, before);
    }

    #[test]
    fn mate_and_stalemate() {
        let t = Tables::shared();
        assert!(pos("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").is_checkmate(t));
        assert!(pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").is_stalemate(t));
        let mut start = pos(STARTING_FEN);
        assert_eq!(start.legal_moves(t).len(), 20);
        assert!(!start.is_checkmate(t));
    }
}
