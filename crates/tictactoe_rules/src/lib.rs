//! Tic-tac-toe rules engine.
//!
//! Pure state and rule evaluation for a two-player 3x3 game: the board, the
//! turn counter whose parity decides who may move, and win/draw detection.
//! Nothing here performs I/O or knows about connections; a server wraps a
//! [`GameSession`] in a lock and calls [`GameSession::apply_move`].
//!
//! # Example
//!
//! ```
//! use tictactoe_rules::{GameSession, Move, PlayerId, Winner};
//!
//! let mut session = GameSession::new(true);
//! assert_eq!(session.apply_move(Move::new(PlayerId::One, 1, 1)), Ok(Winner::None));
//! assert!(session.apply_move(Move::new(PlayerId::One, 0, 0)).is_err());
//! assert_eq!(session.turn().value(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod position;
mod rules;
mod session;
mod types;

pub mod invariants;

pub use action::{Move, MoveError};
pub use position::Position;
pub use rules::{check_winner, evaluate_termination, is_full};
pub use session::{GameSession, GameSnapshot};
pub use types::{Board, Cell, PlayerId, TurnCounter, Winner};
