//! Session types: the client's record of where it is in the game.

use std::collections::HashMap;

use lexgrid_board::GridSnapshot;
use lexgrid_protocol::Player;

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// The lifecycle state of the client session.
///
/// ```text
/// Disconnected → Connecting → Connected → InRoom → ReadyWait → InGame
///                                            ↑                    │
///                                            │    (LEVEL_END)     ▼
///                                            └─(GAME_END)── RoundEnded
/// ```
///
/// `RoundEnded` returns to `InGame` when the next level starts, or to
/// `InRoom` when the game ends. A transport failure drops back to
/// `Disconnected` from anywhere; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    InRoom,
    ReadyWait,
    InGame,
    RoundEnded,
}

impl ConnectionState {
    /// `true` once the transport is established, in or out of a room.
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Disconnected | Self::Connecting)
    }

    /// `true` while the session belongs to a room.
    pub fn is_in_room(&self) -> bool {
        matches!(
            self,
            Self::InRoom | Self::ReadyWait | Self::InGame | Self::RoundEnded
        )
    }

    /// `true` while a level is actively being played.
    pub fn is_in_game(&self) -> bool {
        matches!(self, Self::InGame)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::InRoom => write!(f, "InRoom"),
            Self::ReadyWait => write!(f, "ReadyWait"),
            Self::InGame => write!(f, "InGame"),
            Self::RoundEnded => write!(f, "RoundEnded"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The client's authoritative local view of the session.
///
/// Owned exclusively by the state machine; everything else reads it
/// through a shared reference. Rosters, scores, and the grid are
/// replaced wholesale on the corresponding server events, never
/// patched in place.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Where we are in the lifecycle.
    pub state: ConnectionState,

    /// The room code, set once on room creation/join, cleared on
    /// disconnect. Unset while `Disconnected`.
    pub room_code: Option<String>,

    /// Our server-assigned player id, set alongside `room_code`.
    pub player_id: Option<String>,

    /// Whether we created the room (host privileges: starting the game).
    pub is_host: bool,

    /// The roster as last announced by the server.
    pub players: Vec<Player>,

    /// Leaderboard scores by player id.
    pub scores: HashMap<String, i64>,

    /// The current letter grid, present from the first `LEVEL_START`.
    pub grid: Option<GridSnapshot>,

    /// The countdown announced by `GAME_STARTING`.
    pub countdown: Option<u32>,
}

impl Session {
    /// Our own roster entry, if the server has told us who we are.
    pub fn own_player(&self) -> Option<&Player> {
        let id = self.player_id.as_deref()?;
        self.players.iter().find(|p| p.id == id)
    }

    /// Our own score, 0 until the server reports one.
    pub fn own_score(&self) -> i64 {
        self.player_id
            .as_deref()
            .and_then(|id| self.scores.get(id))
            .copied()
            .unwrap_or(0)
    }

    /// Clears every per-room field. Used when the transport drops.
    pub(crate) fn clear_room_state(&mut self) {
        self.room_code = None;
        self.player_id = None;
        self.is_host = false;
        self.players.clear();
        self.scores.clear();
        self.grid = None;
        self.countdown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_disconnected() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
        let session = Session::default();
        assert_eq!(session.state, ConnectionState::Disconnected);
        assert!(session.room_code.is_none());
    }

    #[test]
    fn test_is_connected() {
        assert!(!ConnectionState::Disconnected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(ConnectionState::Connected.is_connected());
        assert!(ConnectionState::InRoom.is_connected());
        assert!(ConnectionState::InGame.is_connected());
    }

    #[test]
    fn test_is_in_room() {
        assert!(!ConnectionState::Connected.is_in_room());
        assert!(ConnectionState::InRoom.is_in_room());
        assert!(ConnectionState::ReadyWait.is_in_room());
        assert!(ConnectionState::InGame.is_in_room());
        assert!(ConnectionState::RoundEnded.is_in_room());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::ReadyWait.to_string(), "ReadyWait");
        assert_eq!(ConnectionState::RoundEnded.to_string(), "RoundEnded");
    }

    #[test]
    fn test_own_player_and_score() {
        let mut session = Session {
            player_id: Some("p1".into()),
            ..Session::default()
        };
        assert!(session.own_player().is_none());
        assert_eq!(session.own_score(), 0);

        session.players = vec![Player {
            id: "p1".into(),
            name: "Alice".into(),
            ready: true,
            is_host: true,
        }];
        session.scores.insert("p1".into(), 42);

        assert_eq!(session.own_player().map(|p| p.name.as_str()), Some("Alice"));
        assert_eq!(session.own_score(), 42);
    }
}
