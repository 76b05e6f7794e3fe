use std::collections::VecDeque;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::game::GameEngine;
use crate::types::{Color, Profile};

pub const MAX_PARTICIPANTS: usize = 2;
const ROOM_ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Short uppercase alphanumeric room code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Client-typed codes are matched case-insensitively.
    pub fn normalize(input: &str) -> Self {
        Self(input.trim().to_ascii_uppercase())
    }

    /// Normalizes client input and checks it could be a code of `len`
    /// characters from the room alphabet.
    pub fn parse(input: &str, len: usize) -> Option<Self> {
        let id = Self::normalize(input);
        let valid = id.0.len() == len && id.0.bytes().all(|b| ROOM_ID_ALPHABET.contains(&b));
        valid.then_some(id)
    }

    pub(crate) fn generate<R: Rng>(rng: &mut R, len: usize) -> Self {
        let code = (0..len)
            .map(|_| ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transport-assigned identifier of one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: String,
    pub color: Color,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    #[serde(rename = "playerName")]
    pub author_name: String,
    #[serde(rename = "message")]
    pub text: String,
    /// Unix epoch milliseconds.
    #[serde(rename = "timestamp")]
    pub created_at: u64,
}

/// Keeps the most recent `capacity` messages, oldest first.
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(128)),
            capacity,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }
}

/// One game table: an engine, up to two participants and their chat.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub engine: GameEngine,
    participants: Vec<Participant>,
    pub chat: ChatLog,
    last_activity: Instant,
}

impl Room {
    pub(crate) fn new(id: RoomId, chat_capacity: usize, now: Instant) -> Self {
        Self {
            id,
            engine: GameEngine::new(),
            participants: Vec::with_capacity(MAX_PARTICIPANTS),
            chat: ChatLog::new(chat_capacity),
            last_activity: now,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub(crate) fn participant_mut(&mut self, id: ConnectionId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    /// First color no participant holds, Black before White.
    pub fn free_color(&self) -> Option<Color> {
        [Color::Black, Color::White]
            .into_iter()
            .find(|color| self.participants.iter().all(|p| p.color != *color))
    }

    /// Seats a participant and copies their display data into the engine
    /// profile for their color.
    pub(crate) fn seat(&mut self, participant: Participant) {
        self.engine.set_profile(
            participant.color,
            Profile {
                name: participant.name.clone(),
                emoji: participant.emoji.clone(),
            },
        );
        self.participants.push(participant);
    }

    pub(crate) fn remove(&mut self, id: ConnectionId) -> Option<Participant> {
        let idx = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(idx))
    }

    pub fn connections(&self) -> Vec<ConnectionId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }
}
