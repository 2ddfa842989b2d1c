//! 64-bit square sets, one bit per square (A1 = bit 0, H8 = bit 63).

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::square::Square;

/// A set of squares packed into a `u64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_2: Bitboard = Bitboard(0x0000_0000_0000_FF00);
    pub const RANK_7: Bitboard = Bitboard(0x00FF_0000_0000_0000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    /// Light squares (B1, D1, ... A2, ...).
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);

    #[inline]
    pub const fn new(bits: u64) -> Bitboard {
        Bitboard(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Mask of all squares on `rank` (0 = first rank).
    #[inline]
    pub const fn rank(rank: u8) -> Bitboard {
        Bitboard(0xFF << (rank as u32 * 8))
    }

    /// Mask of all squares on `file` (0 = a-file).
    #[inline]
    pub const fn file(file: u8) -> Bitboard {
        Bitboard(Self::FILE_A.0 << file as u32)
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.bit();
    }

    #[inline]
    pub fn unset(&mut self, sq: Square) {
        self.0 &= !sq.bit();
    }

    #[inline]
    pub fn flip(&mut self, sq: Square) {
        self.0 ^= sq.bit();
    }

    /// Toggle two squares in one XOR. Used to slide a piece from `a` to `b`.
    #[inline]
    pub fn flip2(&mut self, a: Square, b: Square) {
        self.0 ^= a.bit() | b.bit();
    }

    #[inline]
    pub const fn is_set(self, sq: Square) -> bool {
        self.0 & sq.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonempty(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Index of the lowest set bit; 64 when empty.
    #[inline]
    pub const fn trailing_zeros(self) -> u32 {
        self.0.trailing_zeros()
    }

    /// Lowest set square, or `None` when empty.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_unchecked(self.0.trailing_zeros() as u8))
        }
    }

    /// Remove and return the lowest set square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// True if more than one bit is set.
    #[inline]
    pub const fn has_many(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// Shift every square one rank toward the eighth rank.
    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    /// Shift every square one rank toward the first rank.
    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 << 1) & !Self::FILE_A.0)
    }

    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 >> 1) & !Self::FILE_H.0)
    }
}

macro_rules! bitboard_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Bitboard {
            type Output = Bitboard;
            #[inline]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $op rhs.0)
            }
        }

        impl $assign_trait for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Bitboard) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}

bitboard_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bitboard_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
bitboard_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl Iterator for Bitboard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.popcount() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8u8).rev() {
            write!(f, "  {} ", rank + 1)?;
            for file in 0..8u8 {
                let mark = if self.0 >> (rank * 8 + file) & 1 == 1 { 'x' } else { '.' };
                write!(f, "{mark} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "    a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Bitboard;
    use crate::square::Square;

    #[test]
    fn set_unset_flip() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square::E4);
        assert!(bb.is_set(Square::E4));
        bb.flip(Square::D5);
        assert_eq!(bb.popcount(), 2);
        bb.unset(Square::E4);
        bb.flip(Square::D5);
        assert!(bb.is_empty());
    }

    #[test]
    fn flip2_moves_a_piece() {
        let mut bb = Square::G1.bitboard();
        bb.flip2(Square::G1, Square::F3);
        assert!(!bb.is_set(Square::G1));
        assert!(bb.is_set(Square::F3));
        assert_eq!(bb.popcount(), 1);
    }

    #[test]
    fn trailing_zeros_of_empty_is_64() {
        assert_eq!(Bitboard::EMPTY.trailing_zeros(), 64);
        assert_eq!(Square::C3.bitboard().trailing_zeros(), Square::C3.index() as u32);
    }

    #[test]
    fn rank_and_file_masks() {
        assert_eq!(Bitboard::rank(0), Bitboard::RANK_1);
        assert_eq!(Bitboard::rank(7), Bitboard::RANK_8);
        assert_eq!(Bitboard::file(7), Bitboard::FILE_H);
        for i in 0..8 {
            assert_eq!(Bitboard::rank(i).popcount(), 8);
            assert_eq!(Bitboard::file(i).popcount(), 8);
        }
    }

    #[test]
    fn shifts_drop_wrapped_squares() {
        assert!(Square::H4.bitboard().east().is_empty());
        assert!(Square::A4.bitboard().west().is_empty());
        assert!(Square::E8.bitboard().north().is_empty());
        assert_eq!(Square::E4.bitboard().north(), Square::E5.bitboard());
    }

    #[test]
    fn iterates_low_to_high() {
        let bb = Square::H8.bitboard() | Square::A1.bitboard() | Square::E4.bitboard();
        let squares: Vec<_> = bb.collect();
        assert_eq!(squares, vec![Square::A1, Square::E4, Square::H8]);
        assert_eq!(bb.len(), 3);
    }

    #[test]
    fn has_many() {
        assert!(!Bitboard::EMPTY.has_many());
        assert!(!Square::B2.bitboard().has_many());
        assert!(Bitboard::RANK_2.has_many());
    }

    #[test]
    fn light_squares_exclude_a1() {
        assert!(!Bitboard::LIGHT_SQUARES.is_set(Square::A1));
        assert!(Bitboard::LIGHT_SQUARES.is_set(Square::H1));
        assert_eq!(Bitboard::LIGHT_SQUARES.popcount(), 32);
    }
}
