//! Error types for the protocol layer.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The byte stream does not contain a valid frame.
    ///
    /// In raw (concatenated) framing this is unrecoverable: the parser
    /// cannot tell where the garbage ends and the next message begins,
    /// so the connection must be closed.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The message decoded but its payload is invalid at the protocol
    /// level — e.g. a known kind whose `data` fields have the wrong
    /// types.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
