//! Castling rights and the fixed geometry of the four castling moves.

use std::fmt;

use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

/// Which wing a castle goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// Squares touched by one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty between king and rook.
    pub between: u64,
    /// Square the king passes over; it must not be attacked.
    pub crossing: Square,
}

const WHITE_KING_SIDE: CastlePath = CastlePath {
    king_from: Square::E1,
    king_to: Square::G1,
    rook_from: Square::H1,
    rook_to: Square::F1,
    between: Square::F1.bit() | Square::G1.bit(),
    crossing: Square::F1,
};

const WHITE_QUEEN_SIDE: CastlePath = CastlePath {
    king_from: Square::E1,
    king_to: Square::C1,
    rook_from: Square::A1,
    rook_to: Square::D1,
    between: Square::B1.bit() | Square::C1.bit() | Square::D1.bit(),
    crossing: Square::D1,
};

const BLACK_KING_SIDE: CastlePath = CastlePath {
    king_from: Square::E8,
    king_to: Square::G8,
    rook_from: Square::H8,
    rook_to: Square::F8,
    between: Square::F8.bit() | Square::G8.bit(),
    crossing: Square::F8,
};

const BLACK_QUEEN_SIDE: CastlePath = CastlePath {
    king_from: Square::E8,
    king_to: Square::C8,
    rook_from: Square::A8,
    rook_to: Square::D8,
    between: Square::B8.bit() | Square::C8.bit() | Square::D8.bit(),
    crossing: Square::D8,
};

impl CastleSide {
    #[inline]
    pub const fn path(self, color: Color) -> &'static CastlePath {
        match (color, self) {
            (Color::White, CastleSide::KingSide) => &WHITE_KING_SIDE,
            (Color::White, CastleSide::QueenSide) => &WHITE_QUEEN_SIDE,
            (Color::Black, CastleSide::KingSide) => &BLACK_KING_SIDE,
            (Color::Black, CastleSide::QueenSide) => &BLACK_QUEEN_SIDE,
        }
    }
}

/// Four castling bits: 1 = white king side, 2 = white queen side, 4 = black king side,
/// 8 = black queen side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

/// Rights cleared when a piece leaves or lands on each square.
const REVOKE: [u8; 64] = {
    let mut table = [0u8; 64];
    table[Square::E1.index()] = 0b0011;
    table[Square::A1.index()] = 0b0010;
    table[Square::H1.index()] = 0b0001;
    table[Square::E8.index()] = 0b1100;
    table[Square::A8.index()] = 0b1000;
    table[Square::H8.index()] = 0b0100;
    table
};

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    #[inline]
    pub const fn new(bits: u8) -> CastleRights {
        CastleRights(bits & 0b1111)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => 0b0001,
            (Color::White, CastleSide::QueenSide) => 0b0010,
            (Color::Black, CastleSide::KingSide) => 0b0100,
            (Color::Black, CastleSide::QueenSide) => 0b1000,
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 | Self::flag(color, side))
    }

    #[inline]
    pub const fn without_color(self, color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(self.0 & 0b1100),
            Color::Black => CastleRights(self.0 & 0b0011),
        }
    }

    /// Rights remaining after a move touches `from` and `to`.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & !(REVOKE[from.index()] | REVOKE[to.index()]))
    }

    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::KingSide),
                'Q' => (Color::White, CastleSide::QueenSide),
                'k' => (Color::Black, CastleSide::KingSide),
                'q' => (Color::Black, CastleSide::QueenSide),
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            if rights.has(color, side) {
                return Err(FenError::InvalidCastlingChar { character: c });
            }
            rights = rights.with(color, side);
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (bit, c) in [(0b0001, 'K'), (0b0010, 'Q'), (0b0100, 'k'), (0b1000, 'q')] {
            if self.0 & bit != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_round_trip() {
        for s in ["KQkq", "Kq", "k", "-", "KQ"] {
            assert_eq!(CastleRights::from_fen(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn fen_rejects_junk_and_repeats() {
        assert!(CastleRights::from_fen("KX").is_err());
        assert!(CastleRights::from_fen("KK").is_err());
    }

    #[test]
    fn king_move_clears_both() {
        let r = CastleRights::ALL.after_move(Square::E1, Square::E2);
        assert!(!r.has(Color::White, CastleSide::KingSide));
        assert!(!r.has(Color::White, CastleSide::QueenSide));
        assert!(r.has(Color::Black, CastleSide::KingSide));
    }

    #[test]
    fn rook_capture_on_origin_clears_right() {
        let r = CastleRights::ALL.after_move(Square::B7, Square::A8);
        assert!(!r.has(Color::Black, CastleSide::QueenSide));
        assert!(r.has(Color::Black, CastleSide::KingSide));
    }

    #[test]
    fn paths_are_consistent() {
        for color in [Color::White, Color::Black] {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                let p = side.path(color);
                assert_eq!(p.king_from.rank(), p.rook_to.rank());
                assert!(p.between & p.king_to.bit() != 0);
                assert!(p.between & p.crossing.bit() != 0);
            }
        }
    }
}
