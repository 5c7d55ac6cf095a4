//! Wire protocol for the backgammon server.
//!
//! This crate defines the "language" that browsers and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Destination`], [`Color`]) —
//!   the events that travel on the wire and the board tokens inside them.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those events are
//!   converted to/from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the game
//! session layer. It doesn't know about connections, sessions, or rules;
//! it only knows how to serialize and deserialize events.
//!
//! ```text
//! Transport (frames) → Protocol (ClientEvent) → Session (player + color)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, Color, Destination, PlayerId, Recipient, ServerEvent,
    SessionId,
};
