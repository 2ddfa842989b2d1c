//! Core chess types: board representation, move generation, and game rules.
//!
//! A [`Position`] keeps a square-indexed mailbox and per-kind/per-color
//! bitboards in step, and is changed in place by [`Position::make_move`] and
//! [`Position::unmake_move`]. Attack lookups go through an immutable [`Tables`]
//! context built from the magic JSON.

mod attacks;
mod bitboard;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod legal;
mod make_move;
mod movegen;
mod notation;
mod perft;
mod piece;
mod position;
mod square;
pub mod zobrist;

pub use attacks::{BISHOP_MAGICS_FILE, ROOK_MAGICS_FILE, Tables};
pub use bitboard::Bitboard;
pub use castle_rights::{CastlePath, CastleRights, CastleSide};
pub use chess_move::Move;
pub use color::Color;
pub use error::{FenError, IllegalMove, MoveError, MoveParseError, TableError};
pub use fen::STARTING_FEN;
pub use movegen::{
    MAX_MOVES, MoveList, MoveListing, generate_listing, generate_moves, generate_tactical,
    generate_tactical_listing,
};
pub use perft::{PerftStats, divide, perft, perft_stats};
pub use piece::{Piece, PieceKind};
pub use position::{BoardInfo, MAX_PLIES, Position, PrettyBoard};
pub use square::Square;
