//! Seat assignment and the shared game state.

use crate::protocol::{Handshake, ServerMessage};
use derive_more::{Display, Error};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tictactoe_rules::{GameSession, GameSnapshot, Move, MoveError, PlayerId};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Send path to one connection's writer task.
pub type Outbound = mpsc::Sender<ServerMessage>;

/// Returned when both seats are already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Both player slots are taken")]
pub struct Rejected;

#[derive(Debug, Default)]
struct SlotTable {
    assigned: usize,
    outbound: [Option<Outbound>; 2],
}

/// Two seats plus the one [`GameSession`] they share.
///
/// Seats and game state sit behind separate locks. Seats are written once at
/// connect time (and cleared on disconnect); the game lock covers every
/// check-and-apply on the session and is never held across an `.await`.
#[derive(Debug)]
pub struct SessionRegistry {
    slots: Mutex<SlotTable>,
    game: Mutex<GameSession>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // The guarded data is only ever replaced wholesale, so a poisoned lock
    // still holds a consistent value.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionRegistry {
    /// Creates a registry with both seats open and a fresh session.
    #[instrument]
    pub fn new(enforce_turns: bool) -> Self {
        info!("Creating session registry");
        Self {
            slots: Mutex::new(SlotTable::default()),
            game: Mutex::new(GameSession::new(enforce_turns)),
        }
    }

    /// Assigns the next seat in arrival order.
    ///
    /// The handshake is queued on `outbound` before the seat becomes visible
    /// to the other handler, so it is always the first message the client
    /// receives. A third caller gets [`Rejected`] and nothing is queued.
    #[instrument(skip(self, outbound))]
    pub fn register(&self, outbound: Outbound) -> Result<PlayerId, Rejected> {
        let mut slots = lock(&self.slots);
        let Some(&player) = PlayerId::ALL.get(slots.assigned) else {
            warn!(assigned = slots.assigned, "Session already has 2 players");
            return Err(Rejected);
        };

        if let Err(e) = outbound.try_send(ServerMessage::Handshake(Handshake::new(player))) {
            warn!(%player, error = %e, "Could not queue handshake");
        }
        slots.outbound[player.index()] = Some(outbound);
        slots.assigned += 1;

        info!(%player, "Registered player");
        Ok(player)
    }

    /// The send path for `player`'s own connection, if still connected.
    pub fn connection(&self, player: PlayerId) -> Option<Outbound> {
        lock(&self.slots).outbound[player.index()].clone()
    }

    /// The send path for `player`'s opponent, if connected.
    ///
    /// `None` both before the opponent arrives and after it leaves.
    pub fn get_peer_connection(&self, player: PlayerId) -> Option<Outbound> {
        self.connection(player.opponent())
    }

    /// Drops a seat's send path after its handler exits.
    ///
    /// The seat stays assigned: there is no reconnection, so later
    /// connections are still refused and broadcasts to it become no-ops.
    #[instrument(skip(self))]
    pub fn release(&self, player: PlayerId) {
        if lock(&self.slots).outbound[player.index()].take().is_some() {
            info!(%player, "Released connection");
        }
    }

    /// Number of seats handed out so far (0..=2).
    pub fn assigned_slots(&self) -> usize {
        lock(&self.slots).assigned
    }

    /// Validates and applies a move under the game lock.
    ///
    /// This is the only path by which a handler mutates the game. Returns
    /// the post-move snapshot on acceptance.
    #[instrument(skip(self), fields(player = %mv.player, row = mv.row, col = mv.col))]
    pub fn submit_move(&self, mv: Move) -> Result<GameSnapshot, MoveError> {
        let mut game = lock(&self.game);
        game.apply_move(mv)?;
        Ok(game.snapshot())
    }

    /// Starts a new game, keeping both seats.
    #[instrument(skip(self))]
    pub fn reset(&self) -> GameSnapshot {
        let mut game = lock(&self.game);
        game.reset();
        game.snapshot()
    }

    /// Resets only if the current game is decided; `None` otherwise.
    ///
    /// Check and reset happen under one lock acquisition.
    #[instrument(skip(self))]
    pub fn reset_if_finished(&self) -> Option<GameSnapshot> {
        let mut game = lock(&self.game);
        if !game.is_finished() {
            debug!(turn = game.turn().value(), "Reset refused: game in progress");
            return None;
        }
        game.reset();
        Some(game.snapshot())
    }

    /// Copies out the current game state.
    pub fn snapshot(&self) -> GameSnapshot {
        lock(&self.game).snapshot()
    }
}
