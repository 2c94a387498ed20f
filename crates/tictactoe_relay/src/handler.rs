//! Per-connection task: decode client messages, apply them, fan out updates.

use crate::broadcast::Broadcaster;
use crate::config::RelayConfig;
use crate::error::ProtocolError;
use crate::protocol::{ClientMessage, MessageReader, MessageWriter, MoveRequest, ServerMessage};
use crate::registry::{Outbound, SessionRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use tictactoe_rules::{Move, PlayerId};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// Drains a connection's outbound queue onto its socket.
///
/// Ends when every sender is dropped or a write fails; dropping the writer
/// then closes the write side of the socket.
pub fn spawn_writer<W>(
    writer: W,
    mut outbound: mpsc::Receiver<ServerMessage>,
    player: PlayerId,
) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let span = info_span!("writer", %player);
    tokio::spawn(
        async move {
            let mut writer = MessageWriter::new(writer);
            while let Some(msg) = outbound.recv().await {
                if let Err(e) = writer.send(&msg).await {
                    warn!(error = %e, "Send failed, closing writer");
                    break;
                }
            }
            debug!("Writer finished");
        }
        .instrument(span),
    )
}

/// One admitted connection's read loop.
///
/// The handshake was already queued at registration; this task reads moves
/// and reset requests until the peer disconnects or sends garbage.
#[derive(Debug)]
pub struct ConnectionHandler {
    player: PlayerId,
    peer_addr: SocketAddr,
    outbound: Outbound,
    registry: Arc<SessionRegistry>,
    broadcaster: Broadcaster,
    config: Arc<RelayConfig>,
}

impl ConnectionHandler {
    /// Creates a handler for a registered seat.
    pub fn new(
        player: PlayerId,
        peer_addr: SocketAddr,
        outbound: Outbound,
        registry: Arc<SessionRegistry>,
        config: Arc<RelayConfig>,
    ) -> Self {
        Self {
            player,
            peer_addr,
            outbound,
            broadcaster: Broadcaster::new(Arc::clone(&registry)),
            registry,
            config,
        }
    }

    /// Runs until the connection ends, then gives up the seat's send path.
    #[instrument(skip_all, fields(player = %self.player, peer_addr = %self.peer_addr))]
    pub async fn run<R>(self, reader: R)
    where
        R: AsyncRead + Unpin,
    {
        info!("Handler started");
        match self.serve(reader).await {
            Ok(()) => info!("Client disconnected"),
            Err(e) => warn!(error = %e, "Handler terminated"),
        }
        self.registry.release(self.player);
    }

    async fn serve<R>(&self, reader: R) -> Result<(), ProtocolError>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = MessageReader::new(reader);
        while let Some(msg) = reader.next::<ClientMessage>().await? {
            match msg {
                ClientMessage::Move(req) => self.on_move(req).await?,
                ClientMessage::Reset(_) => self.on_reset().await?,
            }
        }
        Ok(())
    }

    async fn on_move(&self, req: MoveRequest) -> Result<(), ProtocolError> {
        info!(claimed = req.player, row = req.row, col = req.col, "Move received");

        let Some(player) = PlayerId::from_number(req.player) else {
            debug!(claimed = req.player, "Unknown player id, move ignored");
            return Ok(());
        };
        if player != self.player {
            warn!(%player, "Move for the other seat ignored");
            return Ok(());
        }

        let snapshot = match self.registry.submit_move(Move::new(player, req.row, req.col)) {
            Ok(snapshot) => snapshot,
            Err(reason) => {
                debug!(%reason, "Move rejected");
                return Ok(());
            }
        };

        self.broadcaster
            .broadcast(&self.outbound, self.player, &snapshot)
            .await?;
        Ok(())
    }

    async fn on_reset(&self) -> Result<(), ProtocolError> {
        if !*self.config.allow_reset() {
            debug!("Reset disabled, request ignored");
            return Ok(());
        }
        let Some(snapshot) = self.registry.reset_if_finished() else {
            return Ok(());
        };

        info!("Game reset");
        self.broadcaster
            .broadcast(&self.outbound, self.player, &snapshot)
            .await?;
        Ok(())
    }
}
