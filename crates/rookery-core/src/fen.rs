//! FEN parsing and emission for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::castle_rights::{CastleRights, CastleSide};
use crate::color::Color;
use crate::error::FenError;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

/// The standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a FEN string. The clock fields may be omitted, in which case they
    /// default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let mut pos = Position::empty();
        parse_placement(&mut pos, fields[0])?;

        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidColor { found: other.to_string() }),
        };

        pos.info.castling = CastleRights::from_fen(fields[2])?;
        pos.info.en_passant = parse_en_passant(fields[3], pos.side_to_move)?;

        if fields.len() == 6 {
            pos.halfmove_clock = parse_counter(fields[4], "halfmove clock")?;
            pos.fullmove_number = parse_counter(fields[5], "fullmove number")?.max(1);
        }

        validate(&pos)?;
        pos.reset_history();
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        self.to_string()
    }
}

fn parse_placement(pos: &mut Position, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as i8;
        let mut file: usize = 0;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as usize;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            let sq = Square::from_coords(file as i8, rank).ok_or(FenError::BadRankLength {
                rank: rank as usize + 1,
                length: file + 1,
            })?;
            pos.put(sq, piece);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::BadRankLength { rank: rank as usize + 1, length: file });
        }
    }
    Ok(())
}

fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    // A white double push leaves a rank-3 target with Black to move, and vice versa.
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    match Square::from_algebraic(field) {
        Some(sq) if sq.rank() == expected_rank => Ok(Some(sq)),
        _ => Err(FenError::InvalidEnPassant { found: field.to_string() }),
    }
}

fn parse_counter(field: &str, name: &'static str) -> Result<u16, FenError> {
    field
        .parse()
        .map_err(|_| FenError::InvalidMoveCounter { field: name, found: field.to_string() })
}

fn validate(pos: &Position) -> Result<(), FenError> {
    for color in Color::ALL {
        let count = pos.pieces_of(color, PieceKind::King).popcount();
        if count != 1 {
            let name = if color == Color::White { "white" } else { "black" };
            return Err(FenError::InvalidKingCount { color: name, count });
        }
    }
    let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
    if (pos.pieces(PieceKind::Pawn) & back_ranks).is_nonempty() {
        return Err(FenError::PawnsOnBackRank);
    }
    for (color, side, letter) in [
        (Color::White, CastleSide::KingSide, 'K'),
        (Color::White, CastleSide::QueenSide, 'Q'),
        (Color::Black, CastleSide::KingSide, 'k'),
        (Color::Black, CastleSide::QueenSide, 'q'),
    ] {
        if !pos.info.castling.has(color, side) {
            continue;
        }
        let path = side.path(color);
        let king_home = pos.piece_at(path.king_from) == Piece::new(PieceKind::King, color);
        let rook_home = pos.piece_at(path.rook_from) == Piece::new(PieceKind::Rook, color);
        if !(king_home && rook_home) {
            return Err(FenError::CastlingWithoutPieces { right: letter });
        }
    }
    Ok(())
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Position, FenError> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::from_index_unchecked(rank * 8 + file);
                match self.piece_at(sq).fen_char() {
                    Some(c) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{c}")?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }
        write!(f, " {} {} ", self.side_to_move, self.info.castling)?;
        match self.info.en_passant {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        for fen in [
            STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r2qkbnr/pp2pppp/8/1Np1P3/3p2b1/8/PPP1PPPP/R1BQKB1R w KQkq c6 0 7",
            "4k3/8/8/8/8/8/8/4K3 b - - 49 120",
        ] {
            assert_eq!(fen.parse::<Position>().unwrap().to_string(), fen);
        }
    }

    #[test]
    fn clocks_are_optional() {
        let p: Position = "4k3/8/8/8/8/8/8/4K3 w - -".parse().unwrap();
        assert_eq!(p.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn start_position_fields() {
        let p: Position = STARTING_FEN.parse().unwrap();
        assert_eq!(p.side_to_move(), Color::White);
        assert_eq!(p.castling(), CastleRights::ALL);
        assert_eq!(p.en_passant(), None);
        assert_eq!(p.piece_at(Square::D1), Piece::new(PieceKind::Queen, Color::White));
        assert_eq!(p.piece_at(Square::G8), Piece::new(PieceKind::Knight, Color::Black));
        assert_eq!(p.ply(), 0);
    }

    #[test]
    fn malformed_input_is_rejected() {
        let cases: [(&str, fn(&FenError) -> bool); 9] = [
            ("", |e| matches!(e, FenError::WrongFieldCount { found: 0 })),
            ("8/8/8/8/8/8/8 w - - 0 1", |e| matches!(e, FenError::WrongRankCount { found: 7 })),
            ("4k3/8/8/8/8/8/8/4K4 w - - 0 1", |e| matches!(e, FenError::BadRankLength { .. })),
            ("4k3/8/8/8/8/8/8/4X3 w - - 0 1", |e| matches!(e, FenError::InvalidPieceChar { character: 'X' })),
            ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", |e| matches!(e, FenError::InvalidColor { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - e4 0 1", |e| matches!(e, FenError::InvalidEnPassant { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - - x 1", |e| matches!(e, FenError::InvalidMoveCounter { .. })),
            ("8/8/8/8/8/8/8/4K3 w - - 0 1", |e| matches!(e, FenError::InvalidKingCount { count: 0, .. })),
            ("4k3/8/8/8/8/8/8/4K3 w K - 0 1", |e| matches!(e, FenError::CastlingWithoutPieces { right: 'K' })),
        ];
        for (fen, check) in cases {
            let err = fen.parse::<Position>().unwrap_err();
            assert!(check(&err), "{fen}: {err}");
        }
    }

    #[test]
    fn pawns_on_back_rank_rejected() {
        assert_eq!(
            "P3k3/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err(),
            FenError::PawnsOnBackRank
        );
    }
}
