//! Wire protocol for Lexgrid.
//!
//! This crate defines the "language" the client speaks with the game
//! server:
//!
//! - **Types** ([`Message`], [`ClientCommand`], [`ServerEvent`], the
//!   payload structs) — the structures that travel on the wire.
//! - **Codec** ([`FrameCodec`]) — how one message becomes bytes and
//!   back, under either of the two framing conventions.
//! - **Reader** ([`StreamReader`]) — turns an arbitrary sequence of
//!   byte chunks into a sequence of complete messages.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (game state). It doesn't know about connections or rooms — it only
//! knows how to frame, serialize, and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (Message) → Session (state machine)
//! ```

mod codec;
mod error;
mod reader;
mod types;

pub use codec::{Decoded, FrameCodec, FramingMode, MAX_FRAME_LEN};
pub use error::ProtocolError;
pub use reader::StreamReader;
pub use types::{
    ClientCommand, GameStartingData, GridUpdateData, LeaderboardData,
    LevelEndData, LevelStartData, Message, OpponentScoredData, Player,
    PlayerEntry, PlayerJoinedData, PlayerLeftData, RoomAck, RoomStateData,
    ScoreEntry, ServerErrorData, ServerEvent, TimerUpdateData,
    WordAcceptedData, WordRejectedData, DEFAULT_COUNTDOWN,
};
