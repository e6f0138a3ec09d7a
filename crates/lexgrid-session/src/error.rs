//! Error types for the session layer.

use crate::ConnectionState;

/// Errors that can occur while driving the session state machine.
///
/// The first four are local command rejections: they surface
/// synchronously at the call site and guarantee nothing was sent.
/// `OutOfState` is the inbound mirror — a valid message kind that is
/// not applicable right now; the caller logs it and drops the message.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The command is not valid in the current lifecycle state.
    #[error("{command} is not valid while {state}")]
    InvalidCommand {
        command: &'static str,
        state: ConnectionState,
    },

    /// Only the host may start the game.
    #[error("only the host can start the game")]
    NotHost,

    /// A word needs at least two cells.
    #[error("selection path too short to submit")]
    WordTooShort,

    /// The submitted word text is empty.
    #[error("cannot submit an empty word")]
    EmptyWord,

    /// An inbound message that cannot apply to the current state.
    #[error("{event} is not applicable while {state}")]
    OutOfState {
        event: String,
        state: ConnectionState,
    },
}
