//! Static exchange evaluation.
//!
//! Plays out every capture on one square, each side always recapturing with
//! its least valuable attacker, and reports what the first capture nets.

use rookery_core::{Bitboard, Color, Move, MoveList, PieceKind, Position, Square, Tables};

use crate::eval::material::piece_value;

/// Exchange value of a piece. The king is worth more than anything it can win.
#[inline]
fn see_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 20_000,
        _ => piece_value(kind),
    }
}

/// Net gain for the side owning the piece on `from` when it captures on `dest`
/// with a piece of `attacker`, assuming the best sequence of recaptures.
pub fn see(pos: &Position, tables: &Tables, dest: Square, attacker: PieceKind, from: Square) -> i32 {
    let victim = pos.piece_at(dest).kind().map_or(0, see_value);
    let occupied = pos.occupied();
    swap(pos, tables, dest, from, see_value(attacker), victim, occupied)
}

/// [`see`] for a generated move. En passant removes the passed pawn, and a
/// promotion puts the promoted piece on the square as the next victim.
pub fn see_move(pos: &Position, tables: &Tables, mv: Move) -> i32 {
    let from = mv.from();
    let dest = mv.to();
    let Some(attacker) = pos.piece_at(from).kind() else {
        return 0;
    };
    let mut occupied = pos.occupied();
    let victim = if mv.is_en_passant() {
        if let Some(passed) = dest.offset(0, -pos.side_to_move().forward().signum()) {
            occupied.unset(passed);
        }
        see_value(PieceKind::Pawn)
    } else {
        pos.piece_at(dest).kind().map_or(0, see_value)
    };
    let (on_square, bonus) = match mv.promotion_kind() {
        Some(kind) => (see_value(kind), see_value(kind) - see_value(PieceKind::Pawn)),
        None => (see_value(attacker), 0),
    };
    swap(pos, tables, dest, from, on_square, victim + bonus, occupied)
}

fn least_valuable(pos: &Position, attackers: Bitboard, side: Color) -> Option<(Square, PieceKind)> {
    let ours = attackers & pos.color_bb(side);
    PieceKind::ALL
        .into_iter()
        .find_map(|kind| (ours & pos.pieces(kind)).lsb().map(|sq| (sq, kind)))
}

fn swap(
    pos: &Position,
    tables: &Tables,
    dest: Square,
    from: Square,
    first_attacker: i32,
    first_gain: i32,
    mut occupied: Bitboard,
) -> i32 {
    let Some(mut side) = pos.piece_at(from).color() else {
        return 0;
    };
    let mut gain = [0i32; 32];
    let mut depth = 0;
    gain[0] = first_gain;
    let mut on_square = first_attacker;
    occupied.unset(from);

    loop {
        side = !side;
        // Recomputed each time so sliders behind the last capturer join in.
        let attackers = pos.attackers_to(tables, dest, occupied);
        let Some((sq, kind)) = least_valuable(pos, attackers, side) else {
            break;
        };
        if depth + 1 >= gain.len() {
            break;
        }
        depth += 1;
        gain[depth] = on_square - gain[depth - 1];
        on_square = see_value(kind);
        occupied.unset(sq);
        let defended = (pos.attackers_to(tables, dest, occupied) & pos.color_bb(!side)).is_nonempty();
        if kind == PieceKind::King && defended {
            // A king may not recapture onto a defended square.
            depth -= 1;
            break;
        }
    }

    while depth > 0 {
        depth -= 1;
        gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
    }
    gain[0]
}

/// Drop captures that lose material by exchange, keeping every pawn move and
/// every non-capture.
pub fn filter_see_captures(pos: &Position, tables: &Tables, moves: &mut MoveList) {
    moves.retain(|mv| {
        !mv.is_capture()
            || pos.piece_at(mv.from()).kind() == Some(PieceKind::Pawn)
            || see_move(pos, tables, mv) > 0
    });
}
