//! Client session state for Lexgrid.
//!
//! This crate holds the client's authoritative local view of the
//! connection/room/game lifecycle:
//!
//! 1. **State** — the [`ConnectionState`] lifecycle enum and the
//!    [`Session`] value it gates.
//! 2. **Machine** — the [`SessionStateMachine`], the single owner of a
//!    `Session`. Outgoing commands are validated against the current
//!    state before they become wire messages; incoming events are
//!    applied server-authoritatively.
//!
//! # How it fits in the stack
//!
//! ```text
//! Router (above)   ← feeds decoded events into the machine
//!     ↕
//! Session (this crate)  ← owns the one mutable Session value
//!     ↕
//! Protocol (below)  ← provides Message, ClientCommand, ServerEvent
//! ```
//!
//! The machine itself is not thread-safe and doesn't need to be: it is
//! owned by a single consumer task, and the receive side never touches
//! it directly (it only decodes and enqueues).

mod error;
mod machine;
mod session;

pub use error::SessionError;
pub use machine::SessionStateMachine;
pub use session::{ConnectionState, Session};
