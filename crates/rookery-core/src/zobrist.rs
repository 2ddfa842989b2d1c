//! Zobrist keys: one random 64-bit value per position feature, XORed together.

use crate::castle_rights::CastleRights;
use crate::piece::Piece;
use crate::square::Square;

struct Keys {
    piece_square: [[u64; 64]; 12],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

const SEED: u64 = 0x726f_6f6b_6572_7921;

const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

static KEYS: Keys = {
    let mut keys = Keys {
        piece_square: [[0; 64]; 12],
        side_to_move: 0,
        castling: [0; 16],
        en_passant_file: [0; 8],
    };
    let mut state = SEED;

    let mut piece = 0;
    while piece < 12 {
        let mut sq = 0;
        while sq < 64 {
            state = xorshift64(state);
            keys.piece_square[piece][sq] = state;
            sq += 1;
        }
        piece += 1;
    }

    state = xorshift64(state);
    keys.side_to_move = state;

    // Index 0 (no rights) keeps a zero key so positions without castling hash the same
    // whether or not the term is folded in.
    let mut i = 1;
    while i < 16 {
        state = xorshift64(state);
        keys.castling[i] = state;
        i += 1;
    }

    let mut file = 0;
    while file < 8 {
        state = xorshift64(state);
        keys.en_passant_file[file] = state;
        file += 1;
    }
    keys
};

#[inline]
pub fn piece_square(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.dense_index()][sq.index()]
}

#[inline]
pub fn side_to_move() -> u64 {
    KEYS.side_to_move
}

#[inline]
pub fn castling(rights: CastleRights) -> u64 {
    KEYS.castling[rights.bits() as usize]
}

/// Key for an en passant target, keyed by its file.
#[inline]
pub fn en_passant(sq: Square) -> u64 {
    KEYS.en_passant_file[sq.file() as usize]
}
