//! Wire protocol: newline-delimited JSON records.
//!
//! One JSON document per line, field names capitalised:
//!
//! - handshake, server to client: `{"Player":1}`
//! - move, client to server: `{"Player":1,"Row":0,"Col":2}`
//! - reset, client to server: a bare integer such as `1`
//! - update, server to client:
//!   `{"Player":2,"Board":[[1,0,0],[0,2,0],[0,0,0]],"Turn":3,"Winner":""}`

use crate::error::ProtocolError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tictactoe_rules::{GameSnapshot, PlayerId};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::trace;

/// Identity message sent once, first, on every admitted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Handshake {
    /// Assigned seat (1 or 2).
    pub player: u8,
}

impl Handshake {
    /// Handshake for the given seat.
    pub fn new(player: PlayerId) -> Self {
        Self {
            player: player.number(),
        }
    }
}

/// A move as it arrives on the wire.
///
/// Fields are wide signed integers so that nonsense values still decode and
/// are refused by the rules rather than killing the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MoveRequest {
    /// Claimed seat.
    pub player: i64,
    /// Target row.
    pub row: i64,
    /// Target column.
    pub col: i64,
}

impl MoveRequest {
    /// Creates a move request.
    pub fn new(player: i64, row: i64, col: i64) -> Self {
        Self { player, row, col }
    }
}

/// Anything a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    /// Claim a cell.
    Move(MoveRequest),
    /// Ask to start over. Any bare integer is a reset request.
    Reset(i64),
}

impl ClientMessage {
    /// The reset sentinel clients send.
    pub const RESET: ClientMessage = ClientMessage::Reset(1);
}

/// Full state snapshot pushed to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Update {
    /// Seat this update concerns.
    pub player: u8,
    /// Row-major grid, 0 = empty, 1 = P1, 2 = P2.
    pub board: [[u8; 3]; 3],
    /// Turn counter after the change.
    pub turn: u32,
    /// `""` while playing, `"Player N"` or `"CAT"` once decided.
    pub winner: String,
}

impl Update {
    /// Renders a snapshot for the given seat.
    pub fn from_snapshot(player: PlayerId, snapshot: &GameSnapshot) -> Self {
        Self {
            player: player.number(),
            board: snapshot.board.to_grid(),
            turn: snapshot.turn.value(),
            winner: snapshot.winner.wire_label(),
        }
    }

    /// True once a winner or draw is reported.
    pub fn is_finished(&self) -> bool {
        !self.winner.is_empty()
    }
}

/// Anything the server sends.
///
/// Untagged; `Update` is listed first so that a client decoding into this
/// type does not mistake an update for a handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// State snapshot.
    Update(Update),
    /// Seat assignment.
    Handshake(Handshake),
}

/// Encodes one message as a JSON line (trailing newline included).
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = serde_json::to_vec(msg)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes one JSON line.
pub fn decode<T: DeserializeOwned>(line: &str) -> Result<T, ProtocolError> {
    Ok(serde_json::from_str(line.trim())?)
}

/// Reads newline-delimited messages from a byte stream.
#[derive(Debug)]
pub struct MessageReader<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    /// Wraps a read half.
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Next message, or `None` on clean end of stream. Blank lines are skipped.
    pub async fn next<T: DeserializeOwned>(&mut self) -> Result<Option<T>, ProtocolError> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            trace!(line = %line, "Received line");
            return decode(&line).map(Some);
        }
        Ok(None)
    }
}

/// Writes newline-delimited messages to a byte stream.
#[derive(Debug)]
pub struct MessageWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    /// Wraps a write half.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Encodes, writes and flushes one message.
    pub async fn send<T: Serialize>(&mut self, msg: &T) -> Result<(), ProtocolError> {
        let bytes = encode(msg)?;
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Recovers the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_rules::{GameSession, Move};

    #[test]
    fn test_move_decodes_from_wire_names() {
        let msg: ClientMessage = decode(r#"{"Player":2,"Row":1,"Col":0}"#).unwrap();
        assert_eq!(msg, ClientMessage::Move(MoveRequest::new(2, 1, 0)));
    }

    #[test]
    fn test_bare_integer_is_reset() {
        let msg: ClientMessage = decode("1\n").unwrap();
        assert_eq!(msg, ClientMessage::RESET);
        assert_eq!(encode(&ClientMessage::RESET).unwrap(), b"1\n");
    }

    #[test]
    fn test_out_of_range_move_still_decodes() {
        let msg: ClientMessage = decode(r#"{"Player":7,"Row":-4,"Col":99}"#).unwrap();
        assert_eq!(msg, ClientMessage::Move(MoveRequest::new(7, -4, 99)));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let msg: ClientMessage =
            decode(r#"{"Player":1,"Row":0,"Col":0,"Note":"hi"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Move(MoveRequest::new(1, 0, 0)));
    }

    #[test]
    fn test_malformed_payloads_rejected() {
        for line in [
            "{",
            r#"{"Player":1,"Row":0}"#,
            r#""reset""#,
            r#"{"Player":"one","Row":0,"Col":0}"#,
            "1.5",
        ] {
            assert!(decode::<ClientMessage>(line).is_err(), "{line}");
        }
    }

    #[test]
    fn test_update_wire_shape() {
        let mut session = GameSession::new(true);
        session.apply_move(Move::new(PlayerId::One, 0, 0)).unwrap();
        let update = Update::from_snapshot(PlayerId::Two, &session.snapshot());

        let json = String::from_utf8(encode(&update).unwrap()).unwrap();
        assert_eq!(
            json,
            "{\"Player\":2,\"Board\":[[1,0,0],[0,0,0],[0,0,0]],\"Turn\":2,\"Winner\":\"\"}\n"
        );
    }

    #[test]
    fn test_server_message_disambiguates() {
        let handshake: ServerMessage = decode(r#"{"Player":1}"#).unwrap();
        assert_eq!(handshake, ServerMessage::Handshake(Handshake { player: 1 }));

        let update: ServerMessage =
            decode(r#"{"Player":1,"Board":[[0,0,0],[0,0,0],[0,0,0]],"Turn":1,"Winner":""}"#)
                .unwrap();
        assert!(matches!(update, ServerMessage::Update(_)));
    }

    #[tokio::test]
    async fn test_reader_skips_blank_lines_and_reports_eof() {
        let input: &[u8] = b"\n{\"Player\":1,\"Row\":2,\"Col\":2}\n\n  \n1\n";
        let mut reader = MessageReader::new(input);

        let first: Option<ClientMessage> = reader.next().await.unwrap();
        assert_eq!(first, Some(ClientMessage::Move(MoveRequest::new(1, 2, 2))));
        let second: Option<ClientMessage> = reader.next().await.unwrap();
        assert_eq!(second, Some(ClientMessage::RESET));
        let end: Option<ClientMessage> = reader.next().await.unwrap();
        assert_eq!(end, None);
    }

    #[tokio::test]
    async fn test_writer_appends_newline() {
        let mut writer = MessageWriter::new(Vec::new());
        writer.send(&Handshake::new(PlayerId::Two)).await.unwrap();
        assert_eq!(writer.into_inner(), b"{\"Player\":2}\n");
    }
}
