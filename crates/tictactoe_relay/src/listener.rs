//! Accept loop: admits up to two connections and starts their handlers.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::handler::{ConnectionHandler, spawn_writer};
use crate::registry::SessionRegistry;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// A bound relay server.
#[derive(Debug)]
pub struct RelayServer {
    listener: TcpListener,
    registry: Arc<SessionRegistry>,
    config: Arc<RelayConfig>,
}

impl RelayServer {
    /// Validates `config` and binds its listen address.
    ///
    /// Binding is the only fatal failure; everything after it is contained
    /// per connection.
    #[instrument(skip(config), fields(listen_addr = %config.listen_addr()))]
    pub async fn bind(config: RelayConfig) -> Result<Self, RelayError> {
        config.validate()?;
        let listener = TcpListener::bind(config.listen_addr().as_str())
            .await
            .map_err(|source| RelayError::Bind {
                addr: config.listen_addr().clone(),
                source,
            })?;

        info!(
            enforce_turns = *config.enforce_turns(),
            allow_reset = *config.allow_reset(),
            "Listener bound"
        );
        Ok(Self {
            listener,
            registry: Arc::new(SessionRegistry::new(*config.enforce_turns())),
            config: Arc::new(config),
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared registry, for inspection.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accepts connections forever.
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// Accept errors are logged and the loop carries on.
    #[instrument(skip_all)]
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => self.admit(stream, peer_addr),
                    Err(e) => warn!(error = %e, "Accept failed"),
                },
            }
        }
    }

    #[instrument(skip(self, stream))]
    fn admit(&self, stream: TcpStream, peer_addr: SocketAddr) {
        let (tx, rx) = mpsc::channel(self.config.outbound_capacity());
        let player = match self.registry.register(tx.clone()) {
            Ok(player) => player,
            Err(rejected) => {
                warn!(%peer_addr, reason = %rejected, "Connection refused");
                drop(stream);
                return;
            }
        };
        info!(%player, %peer_addr, "Player connected");

        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "Could not disable Nagle");
        }
        let (reader, writer) = stream.into_split();
        spawn_writer(writer, rx, player);

        let handler = ConnectionHandler::new(
            player,
            peer_addr,
            tx,
            Arc::clone(&self.registry),
            Arc::clone(&self.config),
        );
        tokio::spawn(handler.run(reader));
    }
}
