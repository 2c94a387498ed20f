//! The authoritative game session and its single mutation entry point.

use super::invariants::{
    BoardTransition, Invariant, InvariantSet, MonotonicBoardInvariant, SessionInvariants,
};
use super::rules::evaluate_termination;
use super::{Board, Cell, Move, MoveError, TurnCounter, Winner};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Board, turn counter and outcome for one game.
///
/// Every change goes through [`GameSession::apply_move`] or
/// [`GameSession::reset`]; callers sharing a session across tasks are expected
/// to hold one lock around each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    turn: TurnCounter,
    winner: Winner,
    enforce_turns: bool,
}

/// Immutable copy of the session state, taken under the lock and used after it
/// is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Board contents.
    pub board: Board,
    /// Current turn counter.
    pub turn: TurnCounter,
    /// Outcome so far.
    pub winner: Winner,
}

impl GameSession {
    /// Creates a fresh session.
    ///
    /// With `enforce_turns` off, either player may move at any time; occupancy
    /// and finished-game checks still apply.
    #[instrument]
    pub fn new(enforce_turns: bool) -> Self {
        Self {
            board: Board::new(),
            turn: TurnCounter::START,
            winner: Winner::None,
            enforce_turns,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the turn counter.
    pub fn turn(&self) -> TurnCounter {
        self.turn
    }

    /// Returns the outcome so far.
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Whether out-of-turn moves are refused.
    pub fn enforces_turns(&self) -> bool {
        self.enforce_turns
    }

    /// True once a winner or draw has been recorded.
    pub fn is_finished(&self) -> bool {
        self.winner.is_finished()
    }

    /// Copies out the current state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            turn: self.turn,
            winner: self.winner,
        }
    }

    /// Validates and applies one move.
    ///
    /// On success the cell is claimed, the turn counter advances by one and
    /// the outcome is re-evaluated; the new outcome is returned. On refusal
    /// nothing changes.
    #[instrument(skip(self), fields(turn = self.turn.value()))]
    pub fn apply_move(&mut self, mv: Move) -> Result<Winner, MoveError> {
        if self.is_finished() {
            debug!(winner = ?self.winner, "Move after game over");
            return Err(MoveError::GameFinished);
        }

        let pos = mv.position().ok_or(MoveError::OutOfBounds {
            row: mv.row,
            col: mv.col,
        })?;

        let expected = self.turn.expected_mover();
        if self.enforce_turns && mv.player != expected {
            return Err(MoveError::OutOfTurn {
                expected,
                actual: mv.player,
            });
        }

        if !self.board.is_empty(pos) {
            return Err(MoveError::CellOccupied(pos));
        }

        let before = self.board;
        self.board.set(pos, Cell::Occupied(mv.player));
        self.turn.advance();
        self.winner = evaluate_termination(&self.board);

        debug_assert!(
            MonotonicBoardInvariant::holds(&BoardTransition::new(before, self.board)),
            "{}",
            MonotonicBoardInvariant::description()
        );
        debug_assert!(
            SessionInvariants::check_all(self).is_ok(),
            "session invariants violated after {mv}"
        );

        info!(
            player = %mv.player,
            position = %pos,
            turn = self.turn.value(),
            winner = ?self.winner,
            "Move applied"
        );
        Ok(self.winner)
    }

    /// Clears board, turn and outcome. Turn enforcement is kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(previous_winner = ?self.winner, "Resetting session");
        *self = Self::new(self.enforce_turns);
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(true)
    }
}
