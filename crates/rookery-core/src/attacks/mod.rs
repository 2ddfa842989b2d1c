//! Precomputed attack tables: magic lookups for sliders plus leaper and pawn boards.
//!
//! [`Tables`] is immutable once built and is passed by reference into move
//! generation, check detection, and search.

mod leapers;
mod magic;

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use tracing::info;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::TableError;
use crate::piece::PieceKind;
use crate::square::Square;

use self::leapers::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS, PAWN_PUSHES};
use self::magic::{MagicEntry, MagicRecord, Slider};

/// File name of the rook magics inside a magics directory.
pub const ROOK_MAGICS_FILE: &str = "rook-magics.json";
/// File name of the bishop magics inside a magics directory.
pub const BISHOP_MAGICS_FILE: &str = "bishop-magics.json";

const EMBEDDED_ROOK: &str = include_str!("../../data/rook-magics.json");
const EMBEDDED_BISHOP: &str = include_str!("../../data/bishop-magics.json");

/// Attack lookup context shared by generation, check detection, SEE, and search.
pub struct Tables {
    rook_entries: [MagicEntry; 64],
    bishop_entries: [MagicEntry; 64],
    rook_attacks: Vec<Bitboard>,
    bishop_attacks: Vec<Bitboard>,
}

static SHARED: OnceLock<Tables> = OnceLock::new();

impl Tables {
    /// Build tables from the contents of the two magic JSON files.
    pub fn from_json(rook_json: &str, bishop_json: &str) -> Result<Tables, TableError> {
        let rook: Vec<MagicRecord> = serde_json::from_str(rook_json)?;
        let bishop: Vec<MagicRecord> = serde_json::from_str(bishop_json)?;
        let (rook_entries, rook_attacks) = magic::build(Slider::Rook, &rook)?;
        let (bishop_entries, bishop_attacks) = magic::build(Slider::Bishop, &bishop)?;
        Ok(Tables { rook_entries, bishop_entries, rook_attacks, bishop_attacks })
    }

    /// Read `rook-magics.json` and `bishop-magics.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Tables, TableError> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| TableError::Io {
                path: path.display().to_string(),
                source,
            })
        };
        let tables = Tables::from_json(&read(ROOK_MAGICS_FILE)?, &read(BISHOP_MAGICS_FILE)?)?;
        info!(dir = %dir.display(), "loaded magic tables");
        Ok(tables)
    }

    /// Tables from the magic JSON compiled into the crate.
    pub fn embedded() -> Result<Tables, TableError> {
        Tables::from_json(EMBEDDED_ROOK, EMBEDDED_BISHOP)
    }

    /// Process-wide tables built once from the embedded JSON.
    ///
    /// # Panics
    ///
    /// Panics if the embedded JSON is invalid, which the test suite rules out.
    pub fn shared() -> &'static Tables {
        SHARED.get_or_init(|| {
            Tables::embedded().unwrap_or_else(|err| panic!("embedded magic tables are invalid: {err}"))
        })
    }

    #[inline]
    pub fn knight(&self, sq: Square) -> Bitboard {
        KNIGHT_ATTACKS[sq.index()]
    }

    #[inline]
    pub fn king(&self, sq: Square) -> Bitboard {
        KING_ATTACKS[sq.index()]
    }

    /// Squares a pawn of `color` on `sq` captures on.
    #[inline]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        PAWN_ATTACKS[color.index()][sq.index()]
    }

    /// Squares a pawn of `color` on `sq` may push to on an empty board.
    #[inline]
    pub fn pawn_pushes(&self, color: Color, sq: Square) -> Bitboard {
        PAWN_PUSHES[color.index()][sq.index()]
    }

    #[inline]
    pub fn rook(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks[self.rook_entries[sq.index()].index(occupied)]
    }

    #[inline]
    pub fn bishop(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_attacks[self.bishop_entries[sq.index()].index(occupied)]
    }

    #[inline]
    pub fn queen(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook(sq, occupied) | self.bishop(sq, occupied)
    }

    /// Squares a `kind` of `color` standing on `sq` attacks.
    #[inline]
    pub fn piece_attacks(&self, kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
        match kind {
            PieceKind::Pawn => self.pawn_attacks(color, sq),
            PieceKind::Knight => self.knight(sq),
            PieceKind::Bishop => self.bishop(sq, occupied),
            PieceKind::Rook => self.rook(sq, occupied),
            PieceKind::Queen => self.queen(sq, occupied),
            PieceKind::King => self.king(sq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::magic::Slider;
    use super::*;

    fn lcg(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *state
    }

    #[test]
    fn embedded_json_loads() {
        assert!(Tables::embedded().is_ok());
    }

    #[test]
    fn rook_magic_matches_ray_walk() {
        let t = Tables::shared();
        let mut rng = 0xDEAD_BEEF_1234_5678;
        for sq in Square::all() {
            for _ in 0..128 {
                let occ = lcg(&mut rng) & lcg(&mut rng);
                let expected = Slider::Rook.attacks_on_the_fly(sq.index(), occ);
                assert_eq!(t.rook(sq, Bitboard::new(occ)).bits(), expected, "{sq} {occ:#x}");
            }
        }
    }

    #[test]
    fn bishop_magic_matches_ray_walk() {
        let t = Tables::shared();
        let mut rng = 0xCAFE_BABE_8765_4321;
        for sq in Square::all() {
            for _ in 0..128 {
                let occ = lcg(&mut rng) & lcg(&mut rng);
                let expected = Slider::Bishop.attacks_on_the_fly(sq.index(), occ);
                assert_eq!(t.bishop(sq, Bitboard::new(occ)).bits(), expected, "{sq} {occ:#x}");
            }
        }
    }

    #[test]
    fn empty_board_slider_counts() {
        let t = Tables::shared();
        for sq in Square::all() {
            assert_eq!(t.rook(sq, Bitboard::EMPTY).popcount(), 14);
        }
        assert_eq!(t.bishop(Square::D4, Bitboard::EMPTY).popcount(), 13);
        assert_eq!(t.queen(Square::A1, Bitboard::EMPTY).popcount(), 21);
        assert_eq!(
            t.piece_attacks(PieceKind::Queen, Color::Black, Square::A1, Bitboard::EMPTY),
            t.queen(Square::A1, Bitboard::EMPTY)
        );
    }

    #[test]
    fn leaper_counts() {
        let t = Tables::shared();
        assert_eq!(t.knight(Square::E4).popcount(), 8);
        assert_eq!(t.knight(Square::A1).popcount(), 2);
        assert_eq!(t.king(Square::E1).popcount(), 5);
        assert_eq!(t.king(Square::H8).popcount(), 3);
    }

    #[test]
    fn pawn_tables_are_color_asymmetric() {
        let t = Tables::shared();
        assert_eq!(
            t.pawn_attacks(Color::White, Square::A4),
            Square::B5.bitboard()
        );
        assert_eq!(
            t.pawn_attacks(Color::Black, Square::E5),
            Square::D4.bitboard() | Square::F4.bitboard()
        );
        assert_eq!(
            t.pawn_pushes(Color::White, Square::E2),
            Square::E3.bitboard() | Square::E4.bitboard()
        );
        assert_eq!(t.pawn_pushes(Color::White, Square::E3), Square::E4.bitboard());
        assert_eq!(
            t.pawn_pushes(Color::Black, Square::D7),
            Square::D6.bitboard() | Square::D5.bitboard()
        );
    }

    #[test]
    fn tampered_mask_is_rejected() {
        let mut records: Vec<serde_json::Value> = serde_json::from_str(EMBEDDED_ROOK).unwrap();
        records[5]["mask"] = serde_json::Value::from(1u64);
        let rook = serde_json::to_string(&records).unwrap();
        let err = Tables::from_json(&rook, EMBEDDED_BISHOP).err().unwrap();
        assert!(matches!(err, TableError::MaskMismatch { .. }), "{err}");
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            Tables::from_json("[{", EMBEDDED_BISHOP),
            Err(TableError::Json(_))
        ));
    }

    #[test]
    fn load_reads_the_data_directory() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        assert!(Tables::load(&dir).is_ok());
        assert!(matches!(
            Tables::load(&dir.join("missing")),
            Err(TableError::Io { .. })
        ));
    }
}
