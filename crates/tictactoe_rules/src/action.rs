//! Move requests and the reasons a move can be refused.

use super::{PlayerId, Position};
use serde::{Deserialize, Serialize};

/// A client's request to claim one cell.
///
/// Coordinates are kept exactly as submitted; the engine validates them, so a
/// move aimed off the board is a refused move rather than a decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: PlayerId,
    /// Target row, expected in `[0, 3)`.
    pub row: i64,
    /// Target column, expected in `[0, 3)`.
    pub col: i64,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: PlayerId, row: i64, col: i64) -> Self {
        Self { player, row, col }
    }

    /// The validated target, if it lies on the board.
    pub fn position(&self) -> Option<Position> {
        Position::from_coords(self.row, self.col)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ({}, {})", self.player, self.row, self.col)
    }
}

/// Why a move was refused.
///
/// None of these are faults: the session is left untouched and play goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Row or column outside the board.
    #[display("Cell ({}, {}) is off the board", row, col)]
    OutOfBounds {
        /// Submitted row.
        row: i64,
        /// Submitted column.
        col: i64,
    },

    /// The cell already belongs to someone.
    #[display("{} is already occupied", _0)]
    CellOccupied(#[error(not(source))] Position),

    /// The submitting player is not the expected mover.
    #[display("It is {}'s turn, not {}'s", expected, actual)]
    OutOfTurn {
        /// Player the turn counter expects.
        expected: PlayerId,
        /// Player that tried to move.
        actual: PlayerId,
    },

    /// A winner or draw has already been decided.
    #[display("Game is already over")]
    GameFinished,
}
