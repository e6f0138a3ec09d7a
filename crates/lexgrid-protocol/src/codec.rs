//! Frame codec: one [`Message`] to bytes and back.
//!
//! Two framing conventions exist in the wild for this protocol, and a
//! given server speaks exactly one of them:
//!
//! - **Length-prefixed**: a 4-byte big-endian payload length, then the
//!   JSON payload. Decoding is exact — the header says how many bytes
//!   to wait for.
//! - **Raw**: JSON payloads concatenated back to back with no
//!   delimiter. Decoding leans on JSON being self-delimiting. The
//!   failure mode is worse: after a malformed read the parser cannot
//!   find the start of the next message, so a malformed raw frame is
//!   connection-fatal by policy.
//!
//! The mode is a fixed deployment property. It is configured, never
//! sniffed from the byte stream.

use crate::{Message, ProtocolError};

/// Upper bound on a single frame's payload, shared by both modes.
///
/// A corrupted length header would otherwise make the reader buffer
/// gigabytes before failing. Real messages are a few KB at most.
pub const MAX_FRAME_LEN: usize = 1 << 20;

/// Which framing convention the connection uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingMode {
    /// 4-byte big-endian length prefix, then the JSON payload.
    #[default]
    LengthPrefixed,
    /// Concatenated self-delimiting JSON values, no delimiter.
    Raw,
}

/// Outcome of a successful `decode` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A complete frame was decoded; `consumed` bytes belong to it.
    Frame { message: Message, consumed: usize },
    /// The buffer holds a prefix of a frame. No bytes were consumed;
    /// feed more and retry.
    Incomplete,
}

/// Encodes and decodes messages under a fixed [`FramingMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec {
    mode: FramingMode,
}

impl FrameCodec {
    /// Creates a codec for the given framing mode.
    pub fn new(mode: FramingMode) -> Self {
        Self { mode }
    }

    /// Returns the framing mode this codec uses.
    pub fn mode(&self) -> FramingMode {
        self.mode
    }

    /// Serializes a message into one wire frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails. It
    /// cannot for messages built from JSON-representable values; the
    /// variant exists so the failure is loud rather than silent if
    /// that ever changes.
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError> {
        let payload = serde_json::to_vec(message).map_err(ProtocolError::Encode)?;
        match self.mode {
            FramingMode::Raw => Ok(payload),
            FramingMode::LengthPrefixed => {
                let mut frame = Vec::with_capacity(4 + payload.len());
                frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
                frame.extend_from_slice(&payload);
                Ok(frame)
            }
        }
    }

    /// Attempts to decode one frame from the front of `buf`.
    ///
    /// Never consumes bytes on [`Decoded::Incomplete`] — the caller
    /// keeps its buffer and retries once more bytes arrive.
    ///
    /// # Errors
    /// Returns `ProtocolError::Malformed` when the buffered bytes can
    /// never become a valid frame. In raw mode the caller must treat
    /// this as fatal for the connection.
    pub fn decode(&self, buf: &[u8]) -> Result<Decoded, ProtocolError> {
        match self.mode {
            FramingMode::LengthPrefixed => self.decode_length_prefixed(buf),
            FramingMode::Raw => self.decode_raw(buf),
        }
    }

    fn decode_length_prefixed(&self, buf: &[u8]) -> Result<Decoded, ProtocolError> {
        if buf.len() < 4 {
            return Ok(Decoded::Incomplete);
        }

        let mut header = [0u8; 4];
        header.copy_from_slice(&buf[..4]);
        let len = u32::from_be_bytes(header) as usize;
        if len > MAX_FRAME_LEN {
            return Err(ProtocolError::Malformed(format!(
                "declared frame length {len} exceeds limit {MAX_FRAME_LEN}"
            )));
        }

        if buf.len() < 4 + len {
            return Ok(Decoded::Incomplete);
        }

        let message = serde_json::from_slice(&buf[4..4 + len])
            .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        Ok(Decoded::Frame {
            message,
            consumed: 4 + len,
        })
    }

    fn decode_raw(&self, buf: &[u8]) -> Result<Decoded, ProtocolError> {
        let mut stream =
            serde_json::Deserializer::from_slice(buf).into_iter::<Message>();
        match stream.next() {
            None => Ok(Decoded::Incomplete),
            Some(Ok(message)) => Ok(Decoded::Frame {
                consumed: stream.byte_offset(),
                message,
            }),
            // A parse error at end-of-input means the buffer is a true
            // prefix of a valid value: wait for more bytes — unless the
            // "value" has already outgrown any plausible frame. Anything
            // else is garbage we cannot resynchronize past.
            Some(Err(e)) if e.is_eof() => {
                if buf.len() > MAX_FRAME_LEN {
                    Err(ProtocolError::Malformed(format!(
                        "unterminated frame exceeds limit {MAX_FRAME_LEN}"
                    )))
                } else {
                    Ok(Decoded::Incomplete)
                }
            }
            Some(Err(e)) => Err(ProtocolError::Malformed(e.to_string())),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
