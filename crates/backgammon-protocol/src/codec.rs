//! Codec trait and implementations for serializing/deserializing events.
//!
//! The protocol layer doesn't care HOW events are serialized; it just
//! needs something that implements the [`Codec`] trait. Browsers speak
//! JSON over WebSocket text frames, so [`JsonCodec`] is the one codec we
//! ship; the seam stays so tests and tools can swap it.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to text frames and decode raw frame
/// bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes frame bytes back into a value.
    ///
    /// Takes bytes rather than `&str` because clients may send the JSON
    /// document in a binary frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use backgammon_protocol::{ClientEvent, Codec, Destination, JsonCodec};
///
/// let codec = JsonCodec;
///
/// let event = ClientEvent::Move {
///     source: Destination::BoardPoint(12),
///     dest: Destination::BoardPoint(9),
/// };
/// let text = codec.encode(&event).unwrap();
/// assert_eq!(text, r#"{"event":"move","source":12,"dest":9}"#);
///
/// let decoded: ClientEvent = codec.decode(text.as_bytes()).unwrap();
/// assert_eq!(event, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
