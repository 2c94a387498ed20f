//! Invariants over the game session.
//!
//! Each invariant is a logical property checked independently; the session
//! runs them with `debug_assert!` after every accepted move.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod monotonic_board;
pub mod turn_consistent;
pub mod winner_consistent;

pub use monotonic_board::{BoardTransition, MonotonicBoardInvariant};
pub use turn_consistent::TurnConsistentInvariant;
pub use winner_consistent::WinnerConsistentInvariant;

/// Invariants that hold for every reachable session.
pub type SessionInvariants = (TurnConsistentInvariant, WinnerConsistentInvariant);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameSession, Move, PlayerId};

    #[test]
    fn test_invariant_set_holds_for_new_session() {
        assert!(SessionInvariants::check_all(&GameSession::new(true)).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut session = GameSession::new(true);
        session.apply_move(Move::new(PlayerId::One, 0, 0)).unwrap();
        session.apply_move(Move::new(PlayerId::Two, 2, 2)).unwrap();
        session.apply_move(Move::new(PlayerId::One, 1, 1)).unwrap();
        assert!(SessionInvariants::check_all(&session).is_ok());
    }
}
