//! Winner invariant: the recorded outcome matches the board.

use super::super::GameSession;
use super::super::rules::evaluate_termination;
use super::Invariant;

/// Invariant: the stored winner is exactly what the board evaluates to.
pub struct WinnerConsistentInvariant;

impl Invariant<GameSession> for WinnerConsistentInvariant {
    fn holds(session: &GameSession) -> bool {
        session.winner() == evaluate_termination(session.board())
    }

    fn description() -> &'static str {
        "Recorded winner matches board evaluation"
    }
}
