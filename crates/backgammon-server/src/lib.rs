//! # Backgammon server
//!
//! Server-authoritative live backgammon for browsers. Clients connect over
//! WebSocket and exchange one JSON event per text frame; the server pairs
//! them two at a time, owns every board, and validates every move.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use backgammon_server::prelude::*;
//!
//! # async fn start() -> Result<(), BackgammonError> {
//! let server = BackgammonServerBuilder::new()
//!     .bind("0.0.0.0:5050")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{DEFAULT_BIND_ADDR, DEFAULT_PING_INTERVAL, DEFAULT_PING_TIMEOUT, ServerConfig};
pub use error::BackgammonError;
pub use server::{BackgammonServer, BackgammonServerBuilder};

/// The types most programs need, in one import.
pub mod prelude {
    pub use crate::{BackgammonError, BackgammonServer, BackgammonServerBuilder, ServerConfig};
    pub use backgammon_engine::{BoardState, Snapshot};
    pub use backgammon_protocol::{ClientEvent, Color, Destination, ServerEvent};
    pub use backgammon_session::SessionConfig;
}
