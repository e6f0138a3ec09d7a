//! # Lexgrid
//!
//! Client-side session engine for a multiplayer word game: wire
//! framing and dispatch, the session state machine, and grid path
//! selection. The rendering layer and the game server live elsewhere —
//! this crate is the part with the invariants.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lexgrid::prelude::*;
//!
//! # async fn run() -> Result<(), LexgridError> {
//! let mut client = GameClient::connect(ClientConfig::default()).await?;
//! client.create_room("Alice", "animals", 5, 30, 4).await?;
//!
//! while let Some(event) = client.next_event().await {
//!     match event {
//!         ClientEvent::Server(event) => {
//!             tracing::info!(kind = %event.kind(), "server event");
//!         }
//!         ClientEvent::Disconnected { .. } => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod router;

pub use client::{ClientEvent, GameClient};
pub use config::{ClientConfig, DEFAULT_PORT};
pub use error::LexgridError;
pub use router::{MessageRouter, SessionObserver};

/// The most commonly needed types, re-exported in one place.
pub mod prelude {
    pub use crate::{
        ClientConfig, ClientEvent, GameClient, LexgridError, MessageRouter,
        SessionObserver, DEFAULT_PORT,
    };
    pub use lexgrid_board::{GridSnapshot, PathOutcome, PathSelector};
    pub use lexgrid_protocol::{
        ClientCommand, FrameCodec, FramingMode, Message, Player, ServerEvent,
        StreamReader,
    };
    pub use lexgrid_session::{
        ConnectionState, Session, SessionError, SessionStateMachine,
    };
    pub use lexgrid_transport::{Connection, ConnectionId, TcpConnection, TransportError};
}
