//! Monotonic board invariant: cells never change once claimed.

use super::super::{Board, Cell, Position};
use super::Invariant;

/// A board before and after one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTransition {
    before: Board,
    after: Board,
}

impl BoardTransition {
    /// Pairs the two boards.
    pub fn new(before: Board, after: Board) -> Self {
        Self { before, after }
    }
}

/// Invariant: occupied cells are never overwritten or cleared, and one
/// transition claims at most one cell.
pub struct MonotonicBoardInvariant;

impl Invariant<BoardTransition> for MonotonicBoardInvariant {
    fn holds(t: &BoardTransition) -> bool {
        let mut claimed = 0;
        for pos in Position::ALL {
            match (t.before.get(pos), t.after.get(pos)) {
                (Cell::Empty, Cell::Empty) => {}
                (Cell::Empty, Cell::Occupied(_)) => claimed += 1,
                (before, after) if before == after => {}
                _ => return false,
            }
        }
        claimed <= 1
    }

    fn description() -> &'static str {
        "Board cells are monotonic (never overwritten)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerId;

    #[test]
    fn test_unchanged_board_holds() {
        let board = Board::new();
        assert!(MonotonicBoardInvariant::holds(&BoardTransition::new(board, board)));
    }

    #[test]
    fn test_single_claim_holds() {
        let before = Board::new();
        let mut after = before;
        after.set(Position::Center, Cell::Occupied(PlayerId::One));
        assert!(MonotonicBoardInvariant::holds(&BoardTransition::new(before, after)));
    }

    #[test]
    fn test_overwrite_violates() {
        let mut before = Board::new();
        before.set(Position::Center, Cell::Occupied(PlayerId::One));
        let mut after = before;
        after.set(Position::Center, Cell::Occupied(PlayerId::Two));
        assert!(!MonotonicBoardInvariant::holds(&BoardTransition::new(before, after)));
    }

    #[test]
    fn test_clearing_violates() {
        let mut before = Board::new();
        before.set(Position::TopLeft, Cell::Occupied(PlayerId::Two));
        assert!(!MonotonicBoardInvariant::holds(&BoardTransition::new(
            before,
            Board::new()
        )));
    }

    #[test]
    fn test_double_claim_violates() {
        let before = Board::new();
        let mut after = before;
        after.set(Position::TopLeft, Cell::Occupied(PlayerId::One));
        after.set(Position::TopRight, Cell::Occupied(PlayerId::One));
        assert!(!MonotonicBoardInvariant::holds(&BoardTransition::new(before, after)));
    }
}
