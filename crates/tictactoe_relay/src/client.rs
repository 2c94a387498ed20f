//! Minimal protocol client.
//!
//! Speaks the same wire format as the graphical clients; used by the `play`
//! subcommand and by the integration tests.

use crate::error::ProtocolError;
use crate::protocol::{ClientMessage, Handshake, MessageReader, MessageWriter, MoveRequest, Update};
use tictactoe_rules::PlayerId;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, instrument};

/// Receiving half of a client connection.
pub type UpdateReader = MessageReader<OwnedReadHalf>;

/// Sending half of a client connection.
pub type RequestWriter = MessageWriter<OwnedWriteHalf>;

/// A connected, seated client.
#[derive(Debug)]
pub struct RelayClient {
    player: PlayerId,
    reader: UpdateReader,
    writer: RequestWriter,
}

impl RelayClient {
    /// Connects and waits for the seat handshake.
    ///
    /// Fails with a `Closed` error if the server hangs up first, which is how
    /// a full server refuses a third player.
    #[instrument(skip(addr))]
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect(addr).await?;
        let (read, write) = stream.into_split();
        let mut reader = MessageReader::new(read);

        let handshake: Handshake = reader
            .next()
            .await?
            .ok_or_else(|| ProtocolError::closed("server closed before handshake"))?;
        let player = PlayerId::from_number(i64::from(handshake.player)).ok_or_else(|| {
            ProtocolError::malformed(format!("invalid seat {}", handshake.player))
        })?;

        debug!(%player, "Seated");
        Ok(Self {
            player,
            reader,
            writer: MessageWriter::new(write),
        })
    }

    /// Seat assigned by the server.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Requests a move as this client's own seat.
    pub async fn send_move(&mut self, row: i64, col: i64) -> Result<(), ProtocolError> {
        let player = i64::from(self.player.number());
        self.send_move_as(player, row, col).await
    }

    /// Requests a move with an arbitrary `Player` field.
    pub async fn send_move_as(&mut self, player: i64, row: i64, col: i64) -> Result<(), ProtocolError> {
        self.writer
            .send(&ClientMessage::Move(MoveRequest::new(player, row, col)))
            .await
    }

    /// Asks the server to start a new game.
    pub async fn send_reset(&mut self) -> Result<(), ProtocolError> {
        self.writer.send(&ClientMessage::RESET).await
    }

    /// Next update, or `None` once the server closes the connection.
    pub async fn next_update(&mut self) -> Result<Option<Update>, ProtocolError> {
        self.reader.next().await
    }

    /// Splits into independent receive and send halves.
    pub fn into_split(self) -> (UpdateReader, RequestWriter) {
        (self.reader, self.writer)
    }
}
