//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization, not in
//! networking or game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: bytes that are not UTF-8, malformed JSON,
    /// an unknown `event` tag, a missing field, or a board token that is
    /// neither an integer nor `"OFF"`/`"BAR"`.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
