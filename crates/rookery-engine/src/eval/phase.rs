//! Game phase from remaining non-pawn material.

use rookery_core::{PieceKind, Position};

/// Phase of the starting position: knights and bishops weigh 1, rooks 2, queens 4.
pub const MAX_PHASE: i32 = 24;

const WEIGHTS: [(PieceKind, i32); 4] = [
    (PieceKind::Knight, 1),
    (PieceKind::Bishop, 1),
    (PieceKind::Rook, 2),
    (PieceKind::Queen, 4),
];

/// `MAX_PHASE` with full material, 0 with only kings and pawns. Promotions
/// cannot push it past the maximum.
pub fn game_phase(pos: &Position) -> i32 {
    WEIGHTS
        .iter()
        .map(|&(kind, weight)| pos.pieces(kind).popcount() as i32 * weight)
        .sum::<i32>()
        .min(MAX_PHASE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookery_core::STARTING_FEN;

    fn phase(fen: &str) -> i32 {
        game_phase(&fen.parse().unwrap())
    }

    #[test]
    fn start_is_max_and_bare_kings_zero() {
        assert_eq!(phase(STARTING_FEN), MAX_PHASE);
        assert_eq!(phase("8/8/4k3/8/8/4K3/8/8 w - - 0 1"), 0);
    }

    #[test]
    fn queen_trade_removes_eight() {
        assert_eq!(phase("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1"), 16);
    }
}
