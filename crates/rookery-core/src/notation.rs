//! UCI-style move strings: `e2e4`, `e7e8q`, `e1g1`.

use crate::attacks::Tables;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::error::{IllegalMove, MoveError, MoveParseError};
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

fn parse_square(s: &str) -> Result<Square, MoveParseError> {
    Square::from_algebraic(s).ok_or_else(|| MoveParseError::UnknownSquare { found: s.to_string() })
}

impl Position {
    /// Turn a move string into a fully flagged move for this position.
    ///
    /// Captures, en passant, castles, and promotions are read off the board, and
    /// the result is checked with [`Position::is_move_legal`]. Reachability and
    /// king safety are not checked; see [`Position::parse_legal_move`].
    pub fn parse_move(&self, s: &str) -> Result<Move, MoveError> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveParseError::BadLength { found: s.to_string() }.into());
        }
        let from = parse_square(&s[0..2])?;
        let to = parse_square(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(glyph) => match PieceKind::from_letter(glyph) {
                Some(kind) if PieceKind::PROMOTIONS.contains(&kind) && glyph.is_ascii_lowercase() => {
                    Some(kind)
                }
                _ => return Err(MoveParseError::BadPromotion { glyph }.into()),
            },
        };

        let mover = self.piece_at(from);
        let capture = !self.piece_at(to).is_empty();
        let mv = match (mover.kind(), promotion) {
            (_, Some(kind)) => Move::promotion(from, to, kind, capture),
            (Some(PieceKind::King), None) => castle_for(self, from, to)
                .map_or_else(|| plain(from, to, capture), |side| Move::castle(from, to, side)),
            (Some(PieceKind::Pawn), None)
                if !capture && from.file() != to.file() && self.en_passant() == Some(to) =>
            {
                Move::en_passant(from, to)
            }
            _ => plain(from, to, capture),
        };
        self.is_move_legal(mv)?;
        Ok(mv)
    }

    /// [`Position::parse_move`] followed by a full legality check.
    pub fn parse_legal_move(&mut self, tables: &Tables, s: &str) -> Result<Move, MoveError> {
        let mv = self.parse_move(s)?;
        if !self.is_legal(tables, mv) {
            return Err(IllegalMove::NotPlayable.into());
        }
        Ok(mv)
    }
}

fn plain(from: Square, to: Square, capture: bool) -> Move {
    if capture { Move::capture(from, to) } else { Move::quiet(from, to) }
}

/// The castle a king move from its home square two files over describes.
fn castle_for(pos: &Position, from: Square, to: Square) -> Option<CastleSide> {
    let us = pos.side_to_move();
    [CastleSide::KingSide, CastleSide::QueenSide].into_iter().find(|side| {
        let path = side.path(us);
        path.king_from == from && path.king_to == to
    })
}
