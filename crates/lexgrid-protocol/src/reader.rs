//! Stream reader: byte chunks in, complete messages out.
//!
//! The transport hands over whatever chunk sizes the network produced;
//! message boundaries never line up with read boundaries. The reader
//! accumulates bytes and drains every complete frame on each push, so
//! one chunk may yield zero messages, one, or several.

use crate::{Decoded, FrameCodec, FramingMode, Message, ProtocolError};

/// Accumulates transport bytes and yields decoded messages.
#[derive(Debug)]
pub struct StreamReader {
    codec: FrameCodec,
    buf: Vec<u8>,
    poisoned: bool,
}

impl StreamReader {
    /// Creates a reader for the given framing mode.
    pub fn new(mode: FramingMode) -> Self {
        Self {
            codec: FrameCodec::new(mode),
            buf: Vec::new(),
            poisoned: false,
        }
    }

    /// Appends a chunk and drains all frames it completed.
    ///
    /// # Errors
    /// Returns `ProtocolError::Malformed` when the stream can no longer
    /// be parsed. The reader stays poisoned afterwards: there is no
    /// safe resynchronization point, so the connection must be closed
    /// and every later push fails the same way.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Message>, ProtocolError> {
        if self.poisoned {
            return Err(ProtocolError::Malformed(
                "stream already corrupted".to_string(),
            ));
        }

        self.buf.extend_from_slice(chunk);

        let mut messages = Vec::new();
        loop {
            match self.codec.decode(&self.buf) {
                Ok(Decoded::Frame { message, consumed }) => {
                    self.buf.drain(..consumed);
                    tracing::trace!(kind = %message.kind, "frame decoded");
                    messages.push(message);
                }
                Ok(Decoded::Incomplete) => break,
                Err(e) => {
                    self.poisoned = true;
                    return Err(e);
                }
            }
        }
        Ok(messages)
    }

    /// Number of bytes buffered awaiting a complete frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages() -> Vec<Message> {
        vec![
            Message::new("ROOM_CREATED", json!({"roomCode":"AB12","playerId":"p1"})),
            Message::new("GAME_STARTING", json!({"countdown":5})),
            Message::new("LEVEL_START", json!({"grid":[["C","A"],["T",""]]})),
        ]
    }

    fn wire(mode: FramingMode) -> Vec<u8> {
        let codec = FrameCodec::new(mode);
        let mut bytes = Vec::new();
        for msg in messages() {
            bytes.extend_from_slice(&codec.encode(&msg).unwrap());
        }
        bytes
    }

    #[test]
    fn test_one_push_can_yield_several_messages() {
        for mode in [FramingMode::LengthPrefixed, FramingMode::Raw] {
            let mut reader = StreamReader::new(mode);
            let out = reader.push(&wire(mode)).unwrap();
            assert_eq!(out, messages(), "{mode:?}");
            assert_eq!(reader.buffered(), 0);
        }
    }

    #[test]
    fn test_byte_at_a_time_delivery_yields_same_messages() {
        // The harshest boundary mismatch: every chunk is one byte.
        for mode in [FramingMode::LengthPrefixed, FramingMode::Raw] {
            let mut reader = StreamReader::new(mode);
            let mut out = Vec::new();
            for byte in wire(mode) {
                out.extend(reader.push(&[byte]).unwrap());
            }
            assert_eq!(out, messages(), "{mode:?}");
        }
    }

    #[test]
    fn test_chunks_straddling_frame_boundaries() {
        for mode in [FramingMode::LengthPrefixed, FramingMode::Raw] {
            let bytes = wire(mode);
            // Split mid-way through the second frame.
            let cut = bytes.len() / 2;

            let mut reader = StreamReader::new(mode);
            let mut out = reader.push(&bytes[..cut]).unwrap();
            out.extend(reader.push(&bytes[cut..]).unwrap());
            assert_eq!(out, messages(), "{mode:?}");
        }
    }

    #[test]
    fn test_empty_push_yields_nothing() {
        let mut reader = StreamReader::new(FramingMode::LengthPrefixed);
        assert!(reader.push(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_poisons_the_reader() {
        let mut reader = StreamReader::new(FramingMode::Raw);
        assert!(reader.push(b"garbage").is_err());

        // Even a valid frame afterwards must fail: raw mode cannot
        // resynchronize after garbage.
        let codec = FrameCodec::new(FramingMode::Raw);
        let frame = codec
            .encode(&Message::new("START_GAME", json!({})))
            .unwrap();
        assert!(reader.push(&frame).is_err());
    }

    #[test]
    fn test_incomplete_frame_stays_buffered() {
        let codec = FrameCodec::new(FramingMode::LengthPrefixed);
        let frame = codec
            .encode(&Message::new("START_GAME", json!({})))
            .unwrap();

        let mut reader = StreamReader::new(FramingMode::LengthPrefixed);
        assert!(reader.push(&frame[..5]).unwrap().is_empty());
        assert_eq!(reader.buffered(), 5);

        let out = reader.push(&frame[5..]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(reader.buffered(), 0);
    }
}
