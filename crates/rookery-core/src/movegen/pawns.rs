//! Pawn pushes, captures, promotions, and en passant.

use crate::attacks::Tables;
use crate::chess_move::Move;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

use super::MoveListing;
use super::kind::GenKind;

fn push_promotions(listing: &mut MoveListing, from: Square, to: Square, capture: bool) {
    for kind in PieceKind::PROMOTIONS {
        listing.promotions.push(Move::promotion(from, to, kind, capture));
    }
}

pub(super) fn generate<G: GenKind>(pos: &Position, tables: &Tables, listing: &mut MoveListing) {
    let us = pos.side_to_move();
    let enemy = pos.color_bb(!us);
    let occupied = pos.occupied();
    let empty = !occupied;

    // The en passant target only counts when the pawn that skipped it is really there.
    let en_passant = pos.en_passant().filter(|&ep| {
        let victim = Square::from_index_unchecked((ep.index() as i8 - us.forward()) as u8);
        pos.piece_at(victim) == Piece::new(PieceKind::Pawn, !us) && pos.piece_at(ep).is_empty()
    });

    for from in pos.pieces_of(us, PieceKind::Pawn) {
        // Pawns never stand on the last rank, so one step forward stays on the board.
        let step = Square::from_index_unchecked((from.index() as i8 + us.forward()) as u8);
        let promotes = step.rank() == us.promotion_rank();

        if empty.is_set(step) {
            if promotes {
                push_promotions(listing, from, step, false);
            } else if G::QUIETS {
                listing.moves.push(Move::quiet(from, step));
                let double = tables.pawn_pushes(us, from) & empty & !step.bitboard();
                if let Some(to) = double.lsb() {
                    listing.moves.push(Move::quiet(from, to));
                }
            }
        }

        let attacks = tables.pawn_attacks(us, from);
        for to in attacks & enemy {
            if promotes {
                push_promotions(listing, from, to, true);
            } else {
                listing.captures.push(Move::capture(from, to));
            }
        }
        if let Some(ep) = en_passant {
            if attacks.is_set(ep) {
                listing.captures.push(Move::en_passant(from, ep));
            }
        }
    }
}
