//! Error types surfaced by the core: parse failures, illegal moves, and table loading.

use crate::square::Square;

/// Errors that occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The FEN string has neither 4 nor 6 space-separated fields.
    #[error("expected 4 or 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },
    /// The piece placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    /// A rank in the piece placement describes more or fewer than 8 squares.
    #[error("rank {rank} describes {length} squares, expected 8")]
    BadRankLength { rank: usize, length: usize },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },
    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },
    /// An unrecognized or repeated character appeared in the castling field.
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },
    /// The en passant field is not "-" or a square on the 3rd or 6th rank.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },
    /// A move counter is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },
    /// A side does not have exactly one king.
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: &'static str, count: u32 },
    /// Pawns occupy the first or eighth rank.
    #[error("pawns found on back rank")]
    PawnsOnBackRank,
    /// A castling right is present without its king and rook on their origin squares.
    #[error("castling right '{right}' without king and rook on origin squares")]
    CastlingWithoutPieces { right: char },
}

/// Errors that occur when parsing a move string such as `e7e8q`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    /// The string is not 4 or 5 characters long.
    #[error("move string \"{found}\" must be 4 or 5 characters")]
    BadLength { found: String },
    /// A square in the string is not valid algebraic notation.
    #[error("unknown square \"{found}\"")]
    UnknownSquare { found: String },
    /// The promotion suffix is not one of `q`, `r`, `b`, `n`.
    #[error("bad promotion glyph '{glyph}'")]
    BadPromotion { glyph: char },
}

/// Reasons a move is rejected by [`Position::is_move_legal`](crate::Position::is_move_legal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("no piece on {0}")]
    EmptyFrom(Square),
    #[error("piece on {0} belongs to the side not on move")]
    WrongColor(Square),
    #[error("{0} is occupied by a friendly piece")]
    CapturesOwnPiece(Square),
    #[error("cannot capture the king on {0}")]
    CapturesKing(Square),
    #[error("pawn move to {0} requires a promotion piece")]
    MissingPromotion(Square),
    #[error("promotion flag on a move to {0} that does not promote")]
    UnexpectedPromotion(Square),
    #[error("move is not playable in this position")]
    NotPlayable,
}

/// Errors returned by the move-string parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error(transparent)]
    Parse(#[from] MoveParseError),
    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalMove),
}

/// Errors from loading magic bitboard tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed magic JSON")]
    Json(#[from] serde_json::Error),
    #[error("{slider} magics: expected 64 entries, found {found}")]
    EntryCount { slider: &'static str, found: usize },
    #[error("{slider} magic for {square}: mask {found:#018x} does not match {expected:#018x}")]
    MaskMismatch {
        slider: &'static str,
        square: Square,
        found: u64,
        expected: u64,
    },
    #[error("{slider} magic for {square}: shift {found} does not match {expected}")]
    ShiftMismatch {
        slider: &'static str,
        square: Square,
        found: u8,
        expected: u8,
    },
    #[error("{slider} magic for {square} maps two attack sets to one index")]
    Collision { slider: &'static str, square: Square },
}
