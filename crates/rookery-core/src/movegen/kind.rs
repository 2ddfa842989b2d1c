//! Compile-time selection of the move set a generator call produces.

/// Marker trait for which moves a generation pass emits.
pub(crate) trait GenKind {
    /// Emit quiet moves and castles, not just captures and promotions.
    const QUIETS: bool;
}

/// Zero-sized type selecting every pseudo-legal move.
pub(crate) struct AllMoves;
impl GenKind for AllMoves {
    const QUIETS: bool = true;
}

/// Zero-sized type selecting captures and promotions.
pub(crate) struct Tactical;
impl GenKind for Tactical {
    const QUIETS: bool = false;
}
