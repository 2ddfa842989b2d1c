//! Knight, bishop, rook, queen, and king moves.

use crate::attacks::Tables;
use crate::chess_move::Move;
use crate::piece::PieceKind;
use crate::position::Position;

use super::MoveListing;
use super::kind::GenKind;

const KINDS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

pub(super) fn generate<G: GenKind>(pos: &Position, tables: &Tables, listing: &mut MoveListing) {
    let us = pos.side_to_move();
    let enemy = pos.color_bb(!us);
    let occupied = pos.occupied();

    for kind in KINDS {
        for from in pos.pieces_of(us, kind) {
            let attacks = tables.piece_attacks(kind, us, from, occupied);
            for to in attacks & enemy {
                listing.captures.push(Move::capture(from, to));
            }
            if G::QUIETS {
                for to in attacks & !occupied {
                    listing.moves.push(Move::quiet(from, to));
                }
            }
        }
    }
}
