//! Piece kinds and colored pieces in their one-byte board encoding.
//!
//! The low nibble holds the kind (empty = 0, pawn = 1 .. king = 6) and the high
//! nibble holds the color flag (white = 0x40, black = 0x80).

use std::fmt;

use crate::color::Color;

/// A piece kind without color. Discriminants match the board byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    /// Size of arrays indexed by [`PieceKind::index`]; slot 0 is unused.
    pub const SLOTS: usize = 7;

    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion targets, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// The kind code, 1..=6.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Lowercase letter used in FEN and move strings.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A board byte: either [`Piece::EMPTY`] or a colored piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    pub const EMPTY: Piece = Piece(0);

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece(kind as u8 | color.piece_flag())
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Kind of the piece, or `None` for an empty square.
    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        PieceKind::from_code(self.0 & 0x0F)
    }

    /// Color of the piece, or `None` for an empty square.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self.0 & 0xF0 {
            0x40 => Some(Color::White),
            0x80 => Some(Color::Black),
            _ => None,
        }
    }

    #[inline]
    pub fn is(self, kind: PieceKind, color: Color) -> bool {
        self == Piece::new(kind, color)
    }

    /// Dense index 0..12 (white pawn .. black king) for Zobrist and PST arrays.
    #[inline]
    pub const fn dense_index(self) -> usize {
        let kind = (self.0 & 0x0F) as usize - 1;
        if self.0 & 0x80 != 0 { 6 + kind } else { kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn fen_char(self) -> Option<char> {
        let letter = self.kind()?.letter();
        match self.color()? {
            Color::White => Some(letter.to_ascii_uppercase()),
            Color::Black => Some(letter),
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(kind, color))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fen_char() {
            Some(c) => write!(f, "Piece({c})"),
            None => f.write_str("Piece(-)"),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char().unwrap_or('.'))
    }
}
