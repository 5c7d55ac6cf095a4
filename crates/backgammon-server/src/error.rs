//! Unified error type for the backgammon server.

use backgammon_protocol::ProtocolError;
use backgammon_session::SessionError;
use backgammon_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BackgammonError {
    /// Connection, send, or receive failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encode or decode failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Missing session or stopped session actor.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Bad startup configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
