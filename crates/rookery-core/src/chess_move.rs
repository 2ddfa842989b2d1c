//! Moves packed into 24 bits: `from:8 | to:8 | flags:8`.

use std::fmt;

use crate::castle_rights::CastleSide;
use crate::piece::PieceKind;
use crate::square::Square;

/// A move. Bits 16..24 hold the origin square, bits 8..16 the target, bits 0..8 the flags.
///
/// ```text
/// flags: 0x80 CAPTURE | 0x40 PROMOTION | 0x20 SPECIAL1 | 0x10 SPECIAL2 | low nibble: promotion kind
///
/// king side castle    SPECIAL1
/// queen side castle   SPECIAL1 | SPECIAL2
/// en passant          CAPTURE | SPECIAL1
/// promotion           PROMOTION | kind       (plus CAPTURE when taking)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    pub const CAPTURE: u8 = 0x80;
    pub const PROMOTION: u8 = 0x40;
    pub const SPECIAL1: u8 = 0x20;
    pub const SPECIAL2: u8 = 0x10;

    /// The empty move (a1a1, no flags). Also what a TT slot without a move holds.
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn with_flags(from: Square, to: Square, flags: u8) -> Move {
        Move((from.index() as u32) << 16 | (to.index() as u32) << 8 | flags as u32)
    }

    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Move {
        Move::with_flags(from, to, 0)
    }

    #[inline]
    pub const fn capture(from: Square, to: Square) -> Move {
        Move::with_flags(from, to, Self::CAPTURE)
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Move {
        Move::with_flags(from, to, Self::CAPTURE | Self::SPECIAL1)
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, kind: PieceKind, capture: bool) -> Move {
        let flags = Self::PROMOTION | kind as u8 | if capture { Self::CAPTURE } else { 0 };
        Move::with_flags(from, to, flags)
    }

    #[inline]
    pub const fn castle(from: Square, to: Square, side: CastleSide) -> Move {
        let flags = match side {
            CastleSide::KingSide => Self::SPECIAL1,
            CastleSide::QueenSide => Self::SPECIAL1 | Self::SPECIAL2,
        };
        Move::with_flags(from, to, flags)
    }

    /// Rebuild a move from its packed 24-bit form.
    #[inline]
    pub const fn from_raw(raw: u32) -> Move {
        Move(raw & 0x00FF_FFFF)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 >> 16) as u8 & 63)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked((self.0 >> 8) as u8 & 63)
    }

    #[inline]
    pub const fn flags(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// True for ordinary captures, promotion captures, and en passant.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags() & Self::CAPTURE != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flags() & Self::PROMOTION != 0
    }

    /// Captures and promotions: the moves quiescence searches.
    #[inline]
    pub const fn is_tactical(self) -> bool {
        self.flags() & (Self::CAPTURE | Self::PROMOTION) != 0
    }

    #[inline]
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        if self.is_promotion() {
            PieceKind::from_code(self.flags() & 0x0F)
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags() == Self::CAPTURE | Self::SPECIAL1
    }

    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self.flags() {
            f if f == Self::SPECIAL1 => Some(CastleSide::KingSide),
            f if f == Self::SPECIAL1 | Self::SPECIAL2 => Some(CastleSide::QueenSide),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.castle_side().is_some()
    }

    #[inline]
    pub const fn is_kingside_castle(self) -> bool {
        self.flags() == Self::SPECIAL1
    }

    #[inline]
    pub const fn is_queenside_castle(self) -> bool {
        self.flags() == Self::SPECIAL1 | Self::SPECIAL2
    }

    /// Long algebraic form used on the wire: `e2e4`, `e7e8q`, `e1g1`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(kind) = self.promotion_kind() {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}, {:#04x})", self.flags())
    }
}
