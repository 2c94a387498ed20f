//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]; no session state, no I/O.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;

use super::{Board, Winner};
use tracing::instrument;

/// Evaluates whether the board is decided.
///
/// Lines are checked rows first, then columns, then the two diagonals. A full
/// board without a line is a draw; anything else is still in progress.
#[instrument(skip(board))]
pub fn evaluate_termination(board: &Board) -> Winner {
    if let Some(player) = check_winner(board) {
        Winner::Player(player)
    } else if is_full(board) {
        Winner::Draw
    } else {
        Winner::None
    }
}
