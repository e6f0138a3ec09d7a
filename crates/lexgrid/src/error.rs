//! Unified error type for the Lexgrid client engine.

use lexgrid_protocol::ProtocolError;
use lexgrid_session::SessionError;
use lexgrid_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `lexgrid` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From`
/// impls, so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LexgridError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, malformed frame, bad payload).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (command not valid in this state).
    #[error(transparent)]
    Session(#[from] SessionError),
}
