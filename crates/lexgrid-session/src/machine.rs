//! The session state machine: single owner of the [`Session`] value.
//!
//! Two entry points move the session forward:
//!
//! - [`issue`](SessionStateMachine::issue) — validates an outgoing
//!   command against the current state and turns it into a wire
//!   message. A rejected command never reaches the wire.
//! - [`apply`](SessionStateMachine::apply) — folds an inbound server
//!   event into the session. The server is authoritative: events are
//!   applied regardless of what we optimistically sent, and rosters,
//!   scores, and the grid are replaced wholesale.
//!
//! Transport lifecycle (connect/close) has its own hooks because those
//! transitions are driven by the socket, not by wire messages.

use lexgrid_board::GridSnapshot;
use lexgrid_protocol::{ClientCommand, Message, PlayerEntry, ServerEvent};
use serde_json::json;

use crate::{ConnectionState, Session, SessionError};

/// Validates commands and applies server events to the one [`Session`].
///
/// Not thread-safe by design: exactly one task owns the machine and
/// with it the only write access to the session. The receive side
/// decodes and enqueues; it never calls into here directly.
#[derive(Debug, Default)]
pub struct SessionStateMachine {
    session: Session,
}

impl SessionStateMachine {
    /// Creates a machine with a fresh, disconnected session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.session.state
    }

    // -----------------------------------------------------------------
    // Transport lifecycle
    // -----------------------------------------------------------------

    /// Marks the start of a connection attempt.
    ///
    /// # Errors
    /// Rejected unless the session is `Disconnected` — there is no
    /// reconnect-while-connected.
    pub fn begin_connect(&mut self) -> Result<(), SessionError> {
        if self.session.state != ConnectionState::Disconnected {
            return Err(SessionError::InvalidCommand {
                command: "CONNECT",
                state: self.session.state,
            });
        }
        self.session.state = ConnectionState::Connecting;
        Ok(())
    }

    /// Marks the transport as established.
    pub fn connect_established(&mut self) -> Result<(), SessionError> {
        if self.session.state != ConnectionState::Connecting {
            return Err(SessionError::InvalidCommand {
                command: "CONNECT",
                state: self.session.state,
            });
        }
        self.session.state = ConnectionState::Connected;
        tracing::info!("session connected");
        Ok(())
    }

    /// Marks a failed connection attempt. The error itself is surfaced
    /// by the transport; here we only fall back to `Disconnected`.
    pub fn connect_failed(&mut self) {
        self.session.state = ConnectionState::Disconnected;
    }

    /// Handles the transport dropping, from any state.
    ///
    /// Clears every per-room field and returns `true` on the first
    /// call. Shutdown is idempotent: a second close is a no-op and
    /// returns `false` so the caller delivers no duplicate event.
    pub fn transport_closed(&mut self) -> bool {
        if self.session.state == ConnectionState::Disconnected {
            return false;
        }
        tracing::info!(state = %self.session.state, "transport closed");
        self.session.state = ConnectionState::Disconnected;
        self.session.clear_room_state();
        true
    }

    // -----------------------------------------------------------------
    // Outgoing commands
    // -----------------------------------------------------------------

    /// Validates a command against the current state and returns the
    /// wire message to send.
    ///
    /// # Errors
    /// Any [`SessionError`] from here means nothing was (or may be)
    /// sent: the rejection is local and synchronous.
    pub fn issue(&self, command: ClientCommand) -> Result<Message, SessionError> {
        let state = self.session.state;
        match &command {
            ClientCommand::CreateRoom { .. } | ClientCommand::JoinRoom { .. } => {
                if state != ConnectionState::Connected {
                    return Err(SessionError::InvalidCommand {
                        command: command.kind(),
                        state,
                    });
                }
            }
            ClientCommand::ToggleReady => {
                if state != ConnectionState::InRoom {
                    return Err(SessionError::InvalidCommand {
                        command: command.kind(),
                        state,
                    });
                }
            }
            ClientCommand::StartGame => {
                if state != ConnectionState::InRoom {
                    return Err(SessionError::InvalidCommand {
                        command: command.kind(),
                        state,
                    });
                }
                if !self.session.is_host {
                    return Err(SessionError::NotHost);
                }
            }
            ClientCommand::SubmitWord { word, path } => {
                if state != ConnectionState::InGame {
                    return Err(SessionError::InvalidCommand {
                        command: command.kind(),
                        state,
                    });
                }
                if word.is_empty() {
                    return Err(SessionError::EmptyWord);
                }
                if path.len() < 2 {
                    return Err(SessionError::WordTooShort);
                }
            }
        }

        let message = match &command {
            // The ready flag is derived from the last confirmed roster,
            // not from a locally flipped bit: the server is
            // authoritative and the UI shows only confirmed state.
            ClientCommand::ToggleReady => {
                let ready =
                    !self.session.own_player().map(|p| p.ready).unwrap_or(false);
                Message::new(command.kind(), json!({ "ready": ready }))
            }
            other => other.to_message(),
        };
        tracing::debug!(kind = %message.kind, "command issued");
        Ok(message)
    }

    // -----------------------------------------------------------------
    // Inbound events
    // -----------------------------------------------------------------

    /// Applies a server event to the session.
    ///
    /// # Errors
    /// Returns [`SessionError::OutOfState`] when the event is valid
    /// protocol but not applicable right now (e.g. `LEVEL_START` while
    /// `Disconnected`). The caller logs and drops it; the session is
    /// untouched.
    pub fn apply(&mut self, event: &ServerEvent) -> Result<(), SessionError> {
        use ConnectionState::*;

        let state = self.session.state;
        let guard = |allowed: &[ConnectionState]| -> Result<(), SessionError> {
            if allowed.contains(&state) {
                Ok(())
            } else {
                Err(SessionError::OutOfState {
                    event: event.kind().to_string(),
                    state,
                })
            }
        };

        match event {
            ServerEvent::ConnectionSuccess => {
                guard(&[Connected])?;
                tracing::debug!("server confirmed connection");
            }

            ServerEvent::RoomCreated(ack) => {
                guard(&[Connected])?;
                self.session.room_code = Some(ack.room_code.clone());
                self.session.player_id = Some(ack.player_id.clone());
                self.session.is_host = true;
                self.session.state = InRoom;
                tracing::info!(room_code = %ack.room_code, "room created");
            }

            ServerEvent::RoomJoined(ack) => {
                guard(&[Connected])?;
                self.session.room_code = Some(ack.room_code.clone());
                self.session.player_id = Some(ack.player_id.clone());
                self.session.is_host = false;
                self.session.state = InRoom;
                tracing::info!(room_code = %ack.room_code, "room joined");
            }

            ServerEvent::PlayerJoined(data) => {
                guard(&[InRoom, ReadyWait])?;
                self.session.players = roster(&data.players);
                tracing::debug!(
                    player = %data.player_name,
                    players = self.session.players.len(),
                    "player joined"
                );
            }

            ServerEvent::PlayerLeft(data) => {
                guard(&[InRoom, ReadyWait])?;
                self.session.players.retain(|p| p.id != data.player_id);
                tracing::debug!(player_id = %data.player_id, "player left");
            }

            ServerEvent::RoomState(data) => {
                guard(&[InRoom, ReadyWait])?;
                self.session.players = roster(&data.players);
            }

            ServerEvent::GameStarting(data) => {
                guard(&[InRoom])?;
                self.session.countdown = Some(data.countdown);
                self.session.state = ReadyWait;
                tracing::info!(countdown = data.countdown, "game starting");
            }

            ServerEvent::LevelStart(data) => {
                guard(&[ReadyWait, InGame, RoundEnded])?;
                self.session.grid = Some(GridSnapshot::from_rows(&data.grid));
                self.session.state = InGame;
                tracing::info!(level = data.level, "level started");
            }

            ServerEvent::GridUpdate(data) => {
                guard(&[ReadyWait, InGame])?;
                self.session.grid = Some(GridSnapshot::from_rows(&data.grid));
                self.session.state = InGame;
            }

            ServerEvent::WordAccepted(data) => {
                guard(&[InGame])?;
                if let Some(id) = self.session.player_id.clone() {
                    *self.session.scores.entry(id).or_insert(0) += data.points;
                }
                tracing::debug!(word = %data.word, points = data.points, "word accepted");
            }

            ServerEvent::WordRejected(data) => {
                guard(&[InGame])?;
                tracing::debug!(reason = %data.reason, "word rejected");
            }

            ServerEvent::LevelEnd(data) => {
                guard(&[InGame])?;
                self.session.state = RoundEnded;
                tracing::info!(level = data.level, "level ended");
            }

            ServerEvent::GameEnd => {
                guard(&[InGame, RoundEnded])?;
                self.session.state = InRoom;
                self.session.grid = None;
                self.session.countdown = None;
                for player in &mut self.session.players {
                    player.ready = false;
                }
                tracing::info!("game ended, back to lobby");
            }

            ServerEvent::LeaderboardUpdate(data) => {
                guard(&[InGame, RoundEnded])?;
                self.session.scores = data
                    .scores
                    .iter()
                    .map(|s| (s.player_id.clone(), s.score))
                    .collect();
            }

            ServerEvent::OpponentScored(data) => {
                guard(&[InGame])?;
                *self
                    .session
                    .scores
                    .entry(data.player_id.clone())
                    .or_insert(0) += data.points;
            }

            ServerEvent::TimerUpdate(_) => {
                guard(&[InGame])?;
            }

            // Recoverable and stateless: surfaced to the caller by the
            // router, no transition forced.
            ServerEvent::Error(data) => {
                tracing::warn!(error = %data.error, "server error");
            }

            // Forward compatibility: unknown kinds are dropped upstream,
            // but applying one is still harmless.
            ServerEvent::Unknown { .. } => {}
        }

        Ok(())
    }
}

/// Normalizes wire roster entries into players.
fn roster(entries: &[PlayerEntry]) -> Vec<lexgrid_protocol::Player> {
    entries.iter().cloned().map(PlayerEntry::into_player).collect()
}

// =========================================================================
// Tests
// =========================================================================
