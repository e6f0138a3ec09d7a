//! Core protocol types for Lexgrid's wire format.
//!
//! Every message on the wire is a JSON object with a kind discriminator
//! and a `data` object of kind-specific fields. For compatibility with
//! deployed servers, the discriminator travels under TWO top-level keys —
//! `type` and `messageType` — both populated on encode. A decoder accepts
//! either key, preferring `type` when both are present.
//!
//! Outbound traffic is strict: [`ClientCommand`] always produces fully
//! populated payloads. Inbound traffic is permissive: missing `data`
//! fields take documented defaults, extra fields are ignored, and an
//! unrecognized kind becomes [`ServerEvent::Unknown`] instead of an error.

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::ProtocolError;

/// Countdown seconds assumed when `GAME_STARTING` omits the field.
pub const DEFAULT_COUNTDOWN: u32 = 5;

/// Rejection reason assumed when `WORD_REJECTED` omits the field.
const DEFAULT_REJECT_REASON: &str = "Invalid word";

// ---------------------------------------------------------------------------
// Message — the symmetric wire unit
// ---------------------------------------------------------------------------

/// One decoded wire message: a kind string plus its `data` object.
///
/// Immutable once constructed; created by [`ClientCommand::to_message`]
/// on the way out, or by the frame decoder on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The kind discriminator, e.g. `"CREATE_ROOM"`.
    pub kind: String,
    /// Kind-specific fields. Always a JSON object for well-formed
    /// traffic; a missing `data` key decodes as an empty object.
    pub data: Value,
}

impl Message {
    /// Creates a message from a kind and a `data` value.
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Both discriminator keys carry the same value on encode; older
        // server builds read one, newer builds read the other.
        let mut st = serializer.serialize_struct("Message", 3)?;
        st.serialize_field("type", &self.kind)?;
        st.serialize_field("messageType", &self.kind)?;
        st.serialize_field("data", &self.data)?;
        st.end()
    }
}

/// Decode-side view of the wire object. Either discriminator key may be
/// absent, but not both.
#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "messageType")]
    compat_kind: Option<String>,
    #[serde(default = "empty_object")]
    data: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawMessage::deserialize(deserializer)?;
        let kind = raw
            .kind
            .or(raw.compat_kind)
            .ok_or_else(|| D::Error::missing_field("type"))?;
        Ok(Message {
            kind,
            data: raw.data,
        })
    }
}

// ---------------------------------------------------------------------------
// ClientCommand — outbound
// ---------------------------------------------------------------------------

/// The closed set of commands a client can put on the wire.
///
/// Whether a command is currently *allowed* is the session state
/// machine's business; this type only knows the wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    CreateRoom {
        player_name: String,
        topic: String,
        level_count: u32,
        level_duration: u32,
        max_players: u32,
    },
    JoinRoom {
        room_code: String,
        player_name: String,
    },
    ToggleReady,
    StartGame,
    SubmitWord {
        word: String,
        path: Vec<usize>,
    },
}

impl ClientCommand {
    /// The wire kind string for this command.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "CREATE_ROOM",
            Self::JoinRoom { .. } => "JOIN_ROOM",
            Self::ToggleReady => "PLAYER_READY",
            Self::StartGame => "START_GAME",
            Self::SubmitWord { .. } => "SUBMIT_WORD",
        }
    }

    /// Builds the fully populated wire message for this command.
    ///
    /// `CREATE_ROOM` mirrors the player name into `hostName` — deployed
    /// servers read one or the other. `ToggleReady` here carries
    /// `ready: true`; the session state machine substitutes the real
    /// toggled value when it issues the command.
    pub fn to_message(&self) -> Message {
        let data = match self {
            Self::CreateRoom {
                player_name,
                topic,
                level_count,
                level_duration,
                max_players,
            } => json!({
                "playerName": player_name,
                "hostName": player_name,
                "topic": topic,
                "levelCount": level_count,
                "levelDuration": level_duration,
                "maxPlayers": max_players,
            }),
            Self::JoinRoom {
                room_code,
                player_name,
            } => json!({
                "roomCode": room_code,
                "playerName": player_name,
            }),
            Self::ToggleReady => json!({ "ready": true }),
            Self::StartGame => json!({}),
            Self::SubmitWord { word, path } => json!({
                "word": word,
                "path": path,
            }),
        };
        Message::new(self.kind(), data)
    }
}

// ---------------------------------------------------------------------------
// Shared wire structs
// ---------------------------------------------------------------------------

/// A player as reported by the server in roster updates.
///
/// Equality is by `id` only — the server may change a player's ready
/// flag or host status between updates, but it is still the same player.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub ready: bool,
    pub is_host: bool,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

/// One roster entry. Older server builds send bare name strings,
/// newer ones send full player objects; both are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlayerEntry {
    Full(Player),
    Named(String),
}

impl PlayerEntry {
    /// Normalizes the entry into a [`Player`]. Bare names get an empty
    /// id; rosters are replaced wholesale, never merged, so the empty
    /// id never collides with a tracked player.
    pub fn into_player(self) -> Player {
        match self {
            Self::Full(player) => player,
            Self::Named(name) => Player {
                name,
                ..Player::default()
            },
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreEntry {
    pub player_id: String,
    pub player_name: String,
    pub score: i64,
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// `ROOM_CREATED` / `ROOM_JOINED` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomAck {
    pub room_code: String,
    pub player_id: String,
}

/// `PLAYER_JOINED` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerJoinedData {
    pub player_name: String,
    pub players: Vec<PlayerEntry>,
}

/// `PLAYER_LEFT` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerLeftData {
    pub player_id: String,
}

/// `ROOM_STATE` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomStateData {
    pub players: Vec<PlayerEntry>,
}

/// `GAME_STARTING` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStartingData {
    pub countdown: u32,
}

impl Default for GameStartingData {
    fn default() -> Self {
        Self {
            countdown: DEFAULT_COUNTDOWN,
        }
    }
}

/// `LEVEL_START` payload. The grid rows arrive as strings; one
/// character per tile, empty string for a hole.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelStartData {
    pub grid: Vec<Vec<String>>,
    pub level: u32,
    pub duration: u64,
}

/// `GRID_UPDATE` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridUpdateData {
    pub grid: Vec<Vec<String>>,
}

/// `WORD_ACCEPTED` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordAcceptedData {
    pub word: String,
    pub points: i64,
}

/// `WORD_REJECTED` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordRejectedData {
    pub word: Option<String>,
    pub reason: String,
}

impl Default for WordRejectedData {
    fn default() -> Self {
        Self {
            word: None,
            reason: DEFAULT_REJECT_REASON.to_string(),
        }
    }
}

/// `LEVEL_END` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelEndData {
    pub level: u32,
}

/// `LEADERBOARD_UPDATE` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderboardData {
    pub scores: Vec<ScoreEntry>,
}

/// `OPPONENT_SCORED` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpponentScoredData {
    pub player_id: String,
    pub points: i64,
    pub word: String,
}

/// `TIMER_UPDATE` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerUpdateData {
    pub time_remaining: u64,
}

/// `ERROR` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerErrorData {
    pub error: String,
}

impl Default for ServerErrorData {
    fn default() -> Self {
        Self {
            error: "Unknown error".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerEvent — inbound
// ---------------------------------------------------------------------------

/// A typed inbound message from the server.
///
/// `Unknown` preserves forward compatibility: the router drops it
/// without treating it as an error, so a newer server can add message
/// kinds without breaking older clients.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    ConnectionSuccess,
    RoomCreated(RoomAck),
    RoomJoined(RoomAck),
    PlayerJoined(PlayerJoinedData),
    PlayerLeft(PlayerLeftData),
    RoomState(RoomStateData),
    GameStarting(GameStartingData),
    LevelStart(LevelStartData),
    GridUpdate(GridUpdateData),
    WordAccepted(WordAcceptedData),
    WordRejected(WordRejectedData),
    LevelEnd(LevelEndData),
    GameEnd,
    LeaderboardUpdate(LeaderboardData),
    OpponentScored(OpponentScoredData),
    TimerUpdate(TimerUpdateData),
    Error(ServerErrorData),
    Unknown { kind: String },
}

// PlayerEntry lists compare by their normalized players.
impl PartialEq for PlayerJoinedData {
    fn eq(&self, other: &Self) -> bool {
        self.player_name == other.player_name
            && entries_eq(&self.players, &other.players)
    }
}

impl PartialEq for RoomStateData {
    fn eq(&self, other: &Self) -> bool {
        entries_eq(&self.players, &other.players)
    }
}

fn entries_eq(a: &[PlayerEntry], b: &[PlayerEntry]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.clone().into_player() == y.clone().into_player())
}

impl ServerEvent {
    /// Resolves a wire message into a typed event.
    ///
    /// Unknown kinds yield [`ServerEvent::Unknown`]. A known kind whose
    /// payload fields have the wrong types yields
    /// [`ProtocolError::InvalidMessage`]; missing fields never fail —
    /// they take their documented defaults.
    pub fn from_message(message: &Message) -> Result<Self, ProtocolError> {
        // Some servers omit `data` entirely; treat that as `{}` so the
        // payload defaults kick in.
        let data = if message.data.is_null() {
            empty_object()
        } else {
            message.data.clone()
        };

        fn payload<T: serde::de::DeserializeOwned>(
            kind: &str,
            data: Value,
        ) -> Result<T, ProtocolError> {
            serde_json::from_value(data).map_err(|e| {
                ProtocolError::InvalidMessage(format!("{kind}: {e}"))
            })
        }

        let event = match message.kind.as_str() {
            "CONNECTION_SUCCESS" => Self::ConnectionSuccess,
            "ROOM_CREATED" => Self::RoomCreated(payload(&message.kind, data)?),
            "ROOM_JOINED" => Self::RoomJoined(payload(&message.kind, data)?),
            "PLAYER_JOINED" => Self::PlayerJoined(payload(&message.kind, data)?),
            "PLAYER_LEFT" => Self::PlayerLeft(payload(&message.kind, data)?),
            "ROOM_STATE" => Self::RoomState(payload(&message.kind, data)?),
            "GAME_STARTING" => Self::GameStarting(payload(&message.kind, data)?),
            "LEVEL_START" => Self::LevelStart(payload(&message.kind, data)?),
            "GRID_UPDATE" => Self::GridUpdate(payload(&message.kind, data)?),
            "WORD_ACCEPTED" => Self::WordAccepted(payload(&message.kind, data)?),
            "WORD_REJECTED" => Self::WordRejected(payload(&message.kind, data)?),
            "LEVEL_END" => Self::LevelEnd(payload(&message.kind, data)?),
            "GAME_END" => Self::GameEnd,
            "LEADERBOARD_UPDATE" => {
                Self::LeaderboardUpdate(payload(&message.kind, data)?)
            }
            "OPPONENT_SCORED" => {
                Self::OpponentScored(payload(&message.kind, data)?)
            }
            "TIMER_UPDATE" => Self::TimerUpdate(payload(&message.kind, data)?),
            "ERROR" => Self::Error(payload(&message.kind, data)?),
            _ => Self::Unknown {
                kind: message.kind.clone(),
            },
        };
        Ok(event)
    }

    /// The wire kind string this event was decoded from.
    pub fn kind(&self) -> &str {
        match self {
            Self::ConnectionSuccess => "CONNECTION_SUCCESS",
            Self::RoomCreated(_) => "ROOM_CREATED",
            Self::RoomJoined(_) => "ROOM_JOINED",
            Self::PlayerJoined(_) => "PLAYER_JOINED",
            Self::PlayerLeft(_) => "PLAYER_LEFT",
            Self::RoomState(_) => "ROOM_STATE",
            Self::GameStarting(_) => "GAME_STARTING",
            Self::LevelStart(_) => "LEVEL_START",
            Self::GridUpdate(_) => "GRID_UPDATE",
            Self::WordAccepted(_) => "WORD_ACCEPTED",
            Self::WordRejected(_) => "WORD_REJECTED",
            Self::LevelEnd(_) => "LEVEL_END",
            Self::GameEnd => "GAME_END",
            Self::LeaderboardUpdate(_) => "LEADERBOARD_UPDATE",
            Self::OpponentScored(_) => "OPPONENT_SCORED",
            Self::TimerUpdate(_) => "TIMER_UPDATE",
            Self::Error(_) => "ERROR",
            Self::Unknown { kind } => kind,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Tests for the wire JSON shapes. The deployed servers are picky
    //! about exact key names and casing, so these pin the format down.

    use super::*;

    // =====================================================================
    // Message — dual discriminator keys
    // =====================================================================

    #[test]
    fn test_message_serializes_both_type_keys() {
        let msg = Message::new("START_GAME", json!({}));
        let value: Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "START_GAME");
        assert_eq!(value["messageType"], "START_GAME");
        assert!(value["data"].is_object());
    }

    #[test]
    fn test_message_decodes_from_type_key_alone() {
        let msg: Message =
            serde_json::from_str(r#"{"type":"ERROR","data":{}}"#).unwrap();
        assert_eq!(msg.kind, "ERROR");
    }

    #[test]
    fn test_message_decodes_from_message_type_key_alone() {
        let msg: Message =
            serde_json::from_str(r#"{"messageType":"ERROR","data":{}}"#)
                .unwrap();
        assert_eq!(msg.kind, "ERROR");
    }

    #[test]
    fn test_message_prefers_type_over_message_type() {
        let json = r#"{"type":"ROOM_CREATED","messageType":"LEGACY","data":{}}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind, "ROOM_CREATED");
    }

    #[test]
    fn test_message_without_any_type_key_fails() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"data":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_message_missing_data_decodes_as_empty_object() {
        let msg: Message =
            serde_json::from_str(r#"{"type":"CONNECTION_SUCCESS"}"#).unwrap();
        assert_eq!(msg.data, json!({}));
    }

    #[test]
    fn test_message_round_trip() {
        let msg = Message::new("SUBMIT_WORD", json!({"word":"CAT","path":[0,1,2]}));
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: Message = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    // =====================================================================
    // ClientCommand — outbound shapes
    // =====================================================================

    #[test]
    fn test_create_room_mirrors_player_name_into_host_name() {
        let cmd = ClientCommand::CreateRoom {
            player_name: "Alice".into(),
            topic: "animals".into(),
            level_count: 5,
            level_duration: 30,
            max_players: 4,
        };
        let msg = cmd.to_message();

        assert_eq!(msg.kind, "CREATE_ROOM");
        assert_eq!(msg.data["playerName"], "Alice");
        assert_eq!(msg.data["hostName"], "Alice");
        assert_eq!(msg.data["topic"], "animals");
        assert_eq!(msg.data["levelCount"], 5);
        assert_eq!(msg.data["levelDuration"], 30);
        assert_eq!(msg.data["maxPlayers"], 4);
    }

    #[test]
    fn test_join_room_shape() {
        let cmd = ClientCommand::JoinRoom {
            room_code: "AB12".into(),
            player_name: "Bob".into(),
        };
        let msg = cmd.to_message();

        assert_eq!(msg.kind, "JOIN_ROOM");
        assert_eq!(msg.data["roomCode"], "AB12");
        assert_eq!(msg.data["playerName"], "Bob");
    }

    #[test]
    fn test_start_game_has_empty_data() {
        let msg = ClientCommand::StartGame.to_message();
        assert_eq!(msg.kind, "START_GAME");
        assert_eq!(msg.data, json!({}));
    }

    #[test]
    fn test_submit_word_shape() {
        let cmd = ClientCommand::SubmitWord {
            word: "CAT".into(),
            path: vec![0, 1, 2],
        };
        let msg = cmd.to_message();

        assert_eq!(msg.kind, "SUBMIT_WORD");
        assert_eq!(msg.data["word"], "CAT");
        assert_eq!(msg.data["path"], json!([0, 1, 2]));
    }

    // =====================================================================
    // ServerEvent — permissive inbound parsing
    // =====================================================================

    #[test]
    fn test_room_created_payload() {
        let msg = Message::new(
            "ROOM_CREATED",
            json!({"roomCode":"AB12","playerId":"p1"}),
        );
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::RoomCreated(RoomAck {
                room_code: "AB12".into(),
                player_id: "p1".into(),
            })
        );
    }

    #[test]
    fn test_game_starting_defaults_countdown() {
        let msg = Message::new("GAME_STARTING", json!({}));
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::GameStarting(GameStartingData {
                countdown: DEFAULT_COUNTDOWN
            })
        );
    }

    #[test]
    fn test_word_rejected_defaults_reason() {
        let msg = Message::new("WORD_REJECTED", json!({}));
        let event = ServerEvent::from_message(&msg).unwrap();
        match event {
            ServerEvent::WordRejected(data) => {
                assert_eq!(data.word, None);
                assert_eq!(data.reason, "Invalid word");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_error_defaults_message() {
        let msg = Message::new("ERROR", json!({}));
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::Error(ServerErrorData {
                error: "Unknown error".into()
            })
        );
    }

    #[test]
    fn test_null_data_treated_as_empty_object() {
        let msg = Message::new("GAME_STARTING", Value::Null);
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::GameStarting(GameStartingData::default())
        );
    }

    #[test]
    fn test_player_joined_accepts_names_and_objects() {
        let msg = Message::new(
            "PLAYER_JOINED",
            json!({
                "playerName": "Bob",
                "players": [
                    "Alice",
                    {"id":"p2","name":"Bob","ready":true,"isHost":false},
                ],
            }),
        );
        let event = ServerEvent::from_message(&msg).unwrap();
        let data = match event {
            ServerEvent::PlayerJoined(data) => data,
            other => panic!("unexpected event: {other:?}"),
        };

        let players: Vec<Player> = data
            .players
            .into_iter()
            .map(PlayerEntry::into_player)
            .collect();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Alice");
        assert_eq!(players[0].id, "");
        assert_eq!(players[1].id, "p2");
        assert!(players[1].ready);
    }

    #[test]
    fn test_room_state_parses_roster() {
        let msg = Message::new(
            "ROOM_STATE",
            json!({
                "players": [
                    {"id":"p1","name":"Alice","ready":false,"isHost":true},
                    {"id":"p2","name":"Bob","ready":true,"isHost":false},
                ],
            }),
        );
        let event = ServerEvent::from_message(&msg).unwrap();
        let data = match event {
            ServerEvent::RoomState(data) => data,
            other => panic!("unexpected event: {other:?}"),
        };
        let players: Vec<Player> = data
            .players
            .into_iter()
            .map(PlayerEntry::into_player)
            .collect();
        assert!(players[0].is_host);
        assert_eq!(players[1].name, "Bob");
    }

    #[test]
    fn test_level_start_parses_grid_and_extras() {
        let msg = Message::new(
            "LEVEL_START",
            json!({
                "grid": [["C","A","T"],["","O",""]],
                "level": 2,
                "duration": 30,
            }),
        );
        let event = ServerEvent::from_message(&msg).unwrap();
        let data = match event {
            ServerEvent::LevelStart(data) => data,
            other => panic!("unexpected event: {other:?}"),
        };
        assert_eq!(data.level, 2);
        assert_eq!(data.duration, 30);
        assert_eq!(data.grid[0], vec!["C", "A", "T"]);
        assert_eq!(data.grid[1][0], "");
    }

    #[test]
    fn test_leaderboard_update_parses_scores() {
        let msg = Message::new(
            "LEADERBOARD_UPDATE",
            json!({
                "scores": [
                    {"playerId":"p1","playerName":"Alice","score":42},
                    {"playerId":"p2","playerName":"Bob","score":17},
                ],
            }),
        );
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::LeaderboardUpdate(LeaderboardData {
                scores: vec![
                    ScoreEntry {
                        player_id: "p1".into(),
                        player_name: "Alice".into(),
                        score: 42,
                    },
                    ScoreEntry {
                        player_id: "p2".into(),
                        player_name: "Bob".into(),
                        score: 17,
                    },
                ],
            })
        );
    }

    #[test]
    fn test_timer_update_parses_time_remaining() {
        let msg = Message::new("TIMER_UPDATE", json!({"timeRemaining": 12}));
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::TimerUpdate(TimerUpdateData { time_remaining: 12 })
        );
    }

    #[test]
    fn test_unknown_kind_is_not_an_error() {
        let msg = Message::new("FLY_TO_MOON", json!({"speed":9000}));
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::Unknown {
                kind: "FLY_TO_MOON".into()
            }
        );
    }

    #[test]
    fn test_wrong_payload_type_is_invalid_message() {
        // countdown must be a number, not a string
        let msg = Message::new("GAME_STARTING", json!({"countdown":"soon"}));
        let result = ServerEvent::from_message(&msg);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_extra_payload_fields_are_ignored() {
        let msg = Message::new(
            "GAME_STARTING",
            json!({"countdown":3,"message":"Game starting in 3 seconds!"}),
        );
        let event = ServerEvent::from_message(&msg).unwrap();
        assert_eq!(
            event,
            ServerEvent::GameStarting(GameStartingData { countdown: 3 })
        );
    }

    // =====================================================================
    // Player equality
    // =====================================================================

    #[test]
    fn test_player_equality_is_by_id() {
        let a = Player {
            id: "p1".into(),
            name: "Alice".into(),
            ready: false,
            is_host: false,
        };
        let b = Player {
            id: "p1".into(),
            name: "Alice (renamed)".into(),
            ready: true,
            is_host: true,
        };
        assert_eq!(a, b);

        let c = Player {
            id: "p2".into(),
            ..b.clone()
        };
        assert_ne!(a, c);
    }
}
