//! Castle generation. Attacked squares are not looked at here; see
//! [`Position::is_castle_legal`].

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;

use super::MoveListing;

pub(super) fn generate(pos: &Position, listing: &mut MoveListing) {
    let us = pos.side_to_move();
    let occupied = pos.occupied();
    for side in [CastleSide::KingSide, CastleSide::QueenSide] {
        if !pos.castling().has(us, side) {
            continue;
        }
        let path = side.path(us);
        if pos.piece_at(path.king_from) != Piece::new(PieceKind::King, us)
            || pos.piece_at(path.rook_from) != Piece::new(PieceKind::Rook, us)
        {
            continue;
        }
        if (occupied & Bitboard::new(path.between)).is_nonempty() {
            continue;
        }
        listing.moves.push(Move::castle(path.king_from, path.king_to, side));
    }
}

#[cfg(test)]
mod tests {
    use crate::attacks::Tables;
    use crate::castle_rights::CastleSide;
    use crate::chess_move::Move;
    use crate::movegen::generate_listing;
    use crate::position::Position;
    use crate::square::Square;

    fn castles(fen: &str) -> Vec<Move> {
        let p: Position = fen.parse().unwrap();
        let l = generate_listing(&p, Tables::shared());
        l.moves.as_slice().iter().copied().filter(|m| m.is_castle()).collect()
    }

    #[test]
    fn both_sides_when_clear() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), [
            Move::castle(Square::E8, Square::G8, CastleSide::KingSide),
            Move::castle(Square::E8, Square::C8, CastleSide::QueenSide),
        ]);
    }

    #[test]
    fn blocked_b_file_stops_queen_side_only() {
        assert_eq!(castles("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1"), [Move::castle(
            Square::E1,
            Square::G1,
            CastleSide::KingSide
        )]);
    }

    #[test]
    fn attacked_crossing_square_is_still_generated() {
        // f1 is attacked by the rook on f8; generation leaves that to the search.
        assert_eq!(castles("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").len(), 1);
    }

    #[test]
    fn no_rights_no_castles() {
        assert!(castles("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").is_empty());
    }
}
