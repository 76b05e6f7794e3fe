//! JSON frames exchanged with clients: `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::room::{ChatMessage, Participant, RoomId};
use crate::types::{Color, GameState};

/// Inbound command from one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Payload is the creator's display name.
    CreateRoom(String),
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String, player_name: String },
    #[serde(rename_all = "camelCase")]
    MakeMove { room_id: String, row: u8, col: u8 },
    #[serde(rename_all = "camelCase")]
    UpdateEmoji { room_id: String, emoji: String },
    /// Payload is the room id.
    ResetGame(String),
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: String, message: String },
}

impl ClientCommand {
    pub fn from_json(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Outbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomId,
        game: GameState,
        color: Color,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomId,
        game: GameState,
        color: Color,
    },
    PlayerJoined {
        players: Vec<Participant>,
        game: GameState,
    },
    ChatHistory(Vec<ChatMessage>),
    GameUpdated(GameState),
    NewMessage(ChatMessage),
    PlayerLeft {
        players: Vec<Participant>,
    },
    /// Room destroyed by the idle reaper.
    #[serde(rename_all = "camelCase")]
    RoomClosed { room_id: RoomId },
    Error(String),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
