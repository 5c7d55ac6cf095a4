//! Transport layer for the backgammon server.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the persistent, bidirectional connection a browser opens to play.
//! Frames are text: one JSON document each.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::net::SocketAddr;

use tokio::time::Instant;

/// Opaque identifier for a connection.
///
/// The server uses it as the participant's identity, so it must never be
/// reused within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// The address the transport is listening on.
    fn local_addr(&self) -> std::io::Result<SocketAddr>;
}

/// A single connection that can send text frames and receive frames.
///
/// `send` and `recv` may be called concurrently from the same task (e.g.
/// from two arms of a `select!`): implementations keep the two directions
/// independent.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text frame to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the payload of the next data frame, text or binary.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Sends a liveness check the peer answers without involving the
    /// application.
    async fn ping(&self) -> Result<(), Self::Error>;

    /// When the last frame of any kind arrived from the peer, pongs
    /// included. Starts at connection time.
    fn last_heard(&self) -> Instant;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
