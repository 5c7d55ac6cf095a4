//! `BackgammonServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → session.

use std::sync::Arc;
use std::time::Duration;

use backgammon_protocol::{Codec, JsonCodec};
use backgammon_session::{MatchmakingService, SessionConfig};
use backgammon_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{BackgammonError, ServerConfig};

/// Shared server state passed to each connection handler task.
///
/// The matchmaking service sits behind one mutex: joins, disconnects, and
/// lookups are serialized through it.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) lobby: Mutex<MatchmakingService>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) ping_interval: Duration,
    pub(crate) ping_timeout: Duration,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use backgammon_server::BackgammonServerBuilder;
///
/// # async fn start() -> Result<(), backgammon_server::BackgammonError> {
/// let server = BackgammonServerBuilder::new()
///     .bind("0.0.0.0:5050")
///     .idle_timeout(Duration::from_secs(600))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BackgammonServerBuilder {
    config: ServerConfig,
}

impl BackgammonServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a complete configuration, e.g. one read from the
    /// environment.
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Closes connections that stay silent this long.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = Some(timeout);
        self
    }

    /// Pings every connection each `interval` and drops one that has sent
    /// nothing, not even a pong, for `timeout`.
    pub fn heartbeat(mut self, interval: Duration, timeout: Duration) -> Self {
        self.config.ping_interval = interval;
        self.config.ping_timeout = timeout;
        self
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Binds the listener. Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<BackgammonServer<JsonCodec>, BackgammonError> {
        if self.config.ping_interval.is_zero() {
            return Err(BackgammonError::Config("ping interval must be positive".into()));
        }
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let state = Arc::new(ServerState {
            lobby: Mutex::new(MatchmakingService::new(self.config.session)),
            codec: JsonCodec,
            idle_timeout: self.config.idle_timeout,
            ping_interval: self.config.ping_interval,
            ping_timeout: self.config.ping_timeout,
        });

        Ok(BackgammonServer { transport, state })
    }
}

/// A bound server. Call [`run()`](Self::run) to start accepting
/// connections.
pub struct BackgammonServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl BackgammonServer<JsonCodec> {
    pub fn builder() -> BackgammonServerBuilder {
        BackgammonServerBuilder::new()
    }
}

impl<C: Codec> BackgammonServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning one handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), BackgammonError> {
        tracing::info!("backgammon server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
