//! Authoritative two-player tic-tac-toe relay.
//!
//! The server owns the only copy of the game. Each of the two admitted
//! connections gets a handler task that decodes moves, applies them to the
//! shared [`tictactoe_rules::GameSession`] under one lock, and pushes the
//! resulting snapshot to both players.
//!
//! # Architecture
//!
//! - **Listener**: accepts connections, seats the first two, refuses the rest
//! - **Registry**: seat table plus the locked game session
//! - **Handler**: one task per seat, reads newline-delimited JSON requests
//! - **Broadcaster**: mirrors each accepted change to both seats
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_relay::{RelayConfig, RelayServer};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RelayConfig::default().with_listen_addr("0.0.0.0:8080");
//! let server = RelayServer::bind(config).await?;
//! server.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod broadcast;
mod client;
mod config;
mod error;
mod handler;
mod listener;
mod protocol;
mod registry;

pub use broadcast::{Broadcaster, PeerDelivery};
pub use client::{RelayClient, RequestWriter, UpdateReader};
pub use config::{ConfigError, RelayConfig};
pub use error::{ProtocolError, ProtocolErrorKind, RelayError};
pub use handler::{ConnectionHandler, spawn_writer};
pub use listener::RelayServer;
pub use protocol::{
    ClientMessage, Handshake, MessageReader, MessageWriter, MoveRequest, ServerMessage, Update,
    decode, encode,
};
pub use registry::{Outbound, Rejected, SessionRegistry};
