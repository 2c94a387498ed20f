//! Fan-out of state snapshots to both seats.

use crate::error::ProtocolError;
use crate::protocol::{ServerMessage, Update};
use crate::registry::{Outbound, SessionRegistry};
use std::sync::Arc;
use tictactoe_rules::{GameSnapshot, PlayerId};
use tracing::{debug, instrument};

/// What happened to the opponent's copy of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerDelivery {
    /// Queued on the opponent's connection.
    Delivered,
    /// No opponent has connected yet, or it has already left.
    NotConnected,
    /// The opponent's writer has shut down; the update was dropped.
    Gone,
}

/// Sends one snapshot to the acting seat and a mirrored copy to its opponent.
///
/// The two copies differ only in `Player`. Nothing here touches the game
/// lock; callers pass a snapshot taken after the lock was released.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<SessionRegistry>,
}

impl Broadcaster {
    /// Creates a broadcaster over the given registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Delivers `snapshot` to `own` (as `actor`) and to the opponent.
    ///
    /// Fails only if the actor's own connection is gone, which means its
    /// handler should stop. Opponent failures are reported, not raised.
    #[instrument(skip(self, own, snapshot), fields(turn = snapshot.turn.value()))]
    pub async fn broadcast(
        &self,
        own: &Outbound,
        actor: PlayerId,
        snapshot: &GameSnapshot,
    ) -> Result<PeerDelivery, ProtocolError> {
        let update = Update::from_snapshot(actor, snapshot);
        let mirrored = Update::from_snapshot(actor.opponent(), snapshot);

        own.send(ServerMessage::Update(update))
            .await
            .map_err(|_| ProtocolError::closed("own writer has shut down"))?;

        let delivery = match self.registry.get_peer_connection(actor) {
            None => PeerDelivery::NotConnected,
            Some(peer) => match peer.send(ServerMessage::Update(mirrored)).await {
                Ok(()) => PeerDelivery::Delivered,
                Err(_) => PeerDelivery::Gone,
            },
        };
        debug!(?delivery, "Broadcast complete");
        Ok(delivery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_rules::Move;
    use tokio::sync::mpsc;

    fn updates(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<Update> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let ServerMessage::Update(update) = msg {
                out.push(update);
            }
        }
        out
    }

    #[tokio::test]
    async fn test_mirrored_updates_differ_only_in_player() {
        let registry = Arc::new(SessionRegistry::new(true));
        let (tx1, mut rx1) = mpsc::channel(4);
        let (tx2, mut rx2) = mpsc::channel(4);
        registry.register(tx1.clone()).unwrap();
        registry.register(tx2).unwrap();

        let snapshot = registry.submit_move(Move::new(PlayerId::One, 1, 1)).unwrap();
        let delivery = Broadcaster::new(Arc::clone(&registry))
            .broadcast(&tx1, PlayerId::One, &snapshot)
            .await
            .unwrap();
        assert_eq!(delivery, PeerDelivery::Delivered);

        let mine = updates(&mut rx1);
        let theirs = updates(&mut rx2);
        assert_eq!(mine.len(), 1);
        assert_eq!(theirs.len(), 1);
        assert_eq!(mine[0].player, 1);
        assert_eq!(theirs[0].player, 2);
        assert_eq!(mine[0].board, theirs[0].board);
        assert_eq!(mine[0].turn, theirs[0].turn);
        assert_eq!(mine[0].winner, theirs[0].winner);
    }

    #[tokio::test]
    async fn test_missing_peer_is_not_an_error() {
        let registry = Arc::new(SessionRegistry::new(true));
        let (tx1, mut rx1) = mpsc::channel(4);
        registry.register(tx1.clone()).unwrap();

        let snapshot = registry.submit_move(Move::new(PlayerId::One, 0, 0)).unwrap();
        let delivery = Broadcaster::new(registry)
            .broadcast(&tx1, PlayerId::One, &snapshot)
            .await
            .unwrap();

        assert_eq!(delivery, PeerDelivery::NotConnected);
        assert_eq!(updates(&mut rx1).len(), 1);
    }

    #[tokio::test]
    async fn test_dead_peer_reported_as_gone() {
        let registry = Arc::new(SessionRegistry::new(true));
        let (tx1, _rx1) = mpsc::channel(4);
        let (tx2, rx2) = mpsc::channel(4);
        registry.register(tx1.clone()).unwrap();
        registry.register(tx2).unwrap();
        drop(rx2);

        let snapshot = registry.snapshot();
        let delivery = Broadcaster::new(registry)
            .broadcast(&tx1, PlayerId::One, &snapshot)
            .await
            .unwrap();
        assert_eq!(delivery, PeerDelivery::Gone);
    }

    #[tokio::test]
    async fn test_closed_own_channel_fails() {
        let registry = Arc::new(SessionRegistry::new(true));
        let (tx1, rx1) = mpsc::channel(4);
        registry.register(tx1.clone()).unwrap();
        drop(rx1);

        let snapshot = registry.snapshot();
        let result = Broadcaster::new(registry)
            .broadcast(&tx1, PlayerId::One, &snapshot)
            .await;
        assert!(result.is_err());
    }
}
