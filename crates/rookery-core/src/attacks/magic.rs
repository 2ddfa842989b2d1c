//! Magic bitboard construction from per-square `{magic, shift, mask}` records.

use serde::Deserialize;

use crate::bitboard::Bitboard;
use crate::error::TableError;
use crate::square::Square;

/// One square's record as it appears in `rook-magics.json` / `bishop-magics.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct MagicRecord {
    pub(crate) magic: u64,
    pub(crate) shift: u8,
    pub(crate) mask: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MagicEntry {
    magic: u64,
    mask: u64,
    shift: u8,
    offset: usize,
}

impl MagicEntry {
    #[inline(always)]
    pub(crate) fn index(&self, occupied: Bitboard) -> usize {
        let relevant = occupied.bits() & self.mask;
        self.offset + (relevant.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Ray directions as `(file, rank)` steps.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    const fn directions(self) -> [(i8, i8); 4] {
        match self {
            Slider::Rook => [(0, 1), (0, -1), (1, 0), (-1, 0)],
            Slider::Bishop => [(1, 1), (1, -1), (-1, 1), (-1, -1)],
        }
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Slider::Rook => "rook",
            Slider::Bishop => "bishop",
        }
    }

    /// Attacks from `sq` found by stepping each ray until the first blocker, inclusive.
    pub(crate) const fn attacks_on_the_fly(self, sq: usize, occupied: u64) -> u64 {
        let dirs = self.directions();
        let mut attacks = 0u64;
        let mut d = 0;
        while d < 4 {
            let mut f = (sq % 8) as i8 + dirs[d].0;
            let mut r = (sq / 8) as i8 + dirs[d].1;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                let bit = 1u64 << (r * 8 + f) as u32;
                attacks |= bit;
                if occupied & bit != 0 {
                    break;
                }
                f += dirs[d].0;
                r += dirs[d].1;
            }
            d += 1;
        }
        attacks
    }

    /// Relevant-blocker mask: every ray square except the origin and the last square
    /// before the edge.
    pub(crate) const fn relevant_mask(self, sq: usize) -> u64 {
        let dirs = self.directions();
        let mut mask = 0u64;
        let mut d = 0;
        while d < 4 {
            let mut f = (sq % 8) as i8 + dirs[d].0;
            let mut r = (sq / 8) as i8 + dirs[d].1;
            loop {
                let nf = f + dirs[d].0;
                let nr = r + dirs[d].1;
                if nf < 0 || nf > 7 || nr < 0 || nr > 7 {
                    break;
                }
                mask |= 1u64 << (r * 8 + f) as u32;
                f = nf;
                r = nr;
            }
            d += 1;
        }
        mask
    }
}

/// Validate 64 records for `slider` and fill its flattened attack table.
pub(crate) fn build(
    slider: Slider,
    records: &[MagicRecord],
) -> Result<([MagicEntry; 64], Vec<Bitboard>), TableError> {
    if records.len() != 64 {
        return Err(TableError::EntryCount { slider: slider.name(), found: records.len() });
    }

    let mut entries = [MagicEntry::default(); 64];
    let mut offset = 0usize;
    for (sq, record) in records.iter().enumerate() {
        let square = Square::from_index_unchecked(sq as u8);
        let expected = slider.relevant_mask(sq);
        if record.mask != expected {
            return Err(TableError::MaskMismatch {
                slider: slider.name(),
                square,
                found: record.mask,
                expected,
            });
        }
        let expected_shift = 64 - expected.count_ones() as u8;
        if record.shift != expected_shift {
            return Err(TableError::ShiftMismatch {
                slider: slider.name(),
                square,
                found: record.shift,
                expected: expected_shift,
            });
        }
        entries[sq] = MagicEntry { magic: record.magic, mask: record.mask, shift: record.shift, offset };
        offset += 1usize << (64 - record.shift);
    }

    // Empty slots are distinguishable because every real attack set is non-empty.
    let mut table = vec![Bitboard::EMPTY; offset];
    for (sq, entry) in entries.iter().enumerate() {
        // Carry-rippler walk over every subset of the mask.
        let mut subset = 0u64;
        loop {
            let attacks = Bitboard::new(slider.attacks_on_the_fly(sq, subset));
            let slot = &mut table[entry.index(Bitboard::new(subset))];
            if slot.is_nonempty() && *slot != attacks {
                return Err(TableError::Collision {
                    slider: slider.name(),
                    square: Square::from_index_unchecked(sq as u8),
                });
            }
            *slot = attacks;
            subset = subset.wrapping_sub(entry.mask) & entry.mask;
            if subset == 0 {
                break;
            }
        }
    }
    Ok((entries, table))
}
