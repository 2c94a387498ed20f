//! Turn counter invariant: one tick per claimed cell.

use super::super::GameSession;
use super::Invariant;

/// Invariant: `turn == occupied cells + 1`.
///
/// Holds because the counter only advances on an accepted move and every
/// accepted move claims exactly one cell.
pub struct TurnConsistentInvariant;

impl Invariant<GameSession> for TurnConsistentInvariant {
    fn holds(session: &GameSession) -> bool {
        usize::try_from(session.turn().value())
            .is_ok_and(|turn| turn == session.board().occupied_count() + 1)
    }

    fn description() -> &'static str {
        "Turn counter equals occupied cells plus one"
    }
}
