use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use web_time::{Instant, SystemTime, UNIX_EPOCH};

use crate::board::in_range;
use crate::config::RegistryConfig;
use crate::error::{MoveError, RoomError};
use crate::room::{ChatMessage, ConnectionId, Participant, Room, RoomId};
use crate::types::{Color, GameState};

/// Codes drawn before `create_room` gives up on finding a free one.
const MAX_ROOM_ID_ATTEMPTS: usize = 64;

/// What a participant receives after creating or joining a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    pub room_id: RoomId,
    pub state: GameState,
    pub color: Color,
    pub participants: Vec<Participant>,
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Last participant left; the room no longer exists.
    Closed,
    RosterChanged { remaining: Vec<Participant> },
}

/// Owns every live room. Each mutating call runs to completion under
/// `&mut self`, so moves within a room are serialized.
pub struct SessionRegistry {
    rooms: HashMap<RoomId, Room>,
    config: RegistryConfig,
    rng: StdRng,
    next_message_id: u64,
}

impl SessionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rooms: HashMap::new(),
            config,
            rng,
            next_message_id: 1,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Looks up a room by client-typed code. Input that cannot be a code is
    /// reported the same as an unknown room.
    pub fn room(&self, room_id: &str) -> Result<&Room, RoomError> {
        let id = self.parse_room_id(room_id)?;
        self.rooms.get(&id).ok_or(RoomError::RoomNotFound)
    }

    /// Lookup only; callers touch the room once a command is accepted.
    fn room_mut(&mut self, room_id: &str) -> Result<&mut Room, RoomError> {
        let id = self.parse_room_id(room_id)?;
        self.rooms.get_mut(&id).ok_or(RoomError::RoomNotFound)
    }

    fn parse_room_id(&self, room_id: &str) -> Result<RoomId, RoomError> {
        RoomId::parse(room_id, self.config.room_id_len).ok_or(RoomError::RoomNotFound)
    }

    /// Opens a room with a fresh engine and seats the creator as Black.
    pub fn create_room(
        &mut self,
        connection: ConnectionId,
        creator_name: &str,
    ) -> Result<JoinedRoom, RoomError> {
        let room_id = self.unique_room_id()?;
        let mut room = Room::new(room_id.clone(), self.config.chat_capacity, Instant::now());
        room.seat(Participant {
            id: connection,
            name: creator_name.to_string(),
            color: Color::Black,
            emoji: Color::Black.default_emoji().to_string(),
        });

        let joined = JoinedRoom {
            room_id: room_id.clone(),
            state: room.engine.snapshot(),
            color: Color::Black,
            participants: room.participants().to_vec(),
            chat_history: Vec::new(),
        };
        self.rooms.insert(room_id.clone(), room);
        log::info!("room {room_id} created by {connection}");
        Ok(joined)
    }

    /// Seats `connection` in the color nobody holds.
    pub fn join_room(
        &mut self,
        room_id: &str,
        connection: ConnectionId,
        joiner_name: &str,
    ) -> Result<JoinedRoom, RoomError> {
        let room = self.room_mut(room_id)?;
        if room.participant(connection).is_some() {
            return Err(RoomError::AlreadyJoined);
        }
        let color = match room.free_color() {
            Some(color) if !room.is_full() => color,
            _ => return Err(RoomError::RoomFull),
        };

        room.seat(Participant {
            id: connection,
            name: joiner_name.to_string(),
            color,
            emoji: color.default_emoji().to_string(),
        });
        room.touch(Instant::now());
        log::info!("{connection} joined room {} as {color:?}", room.id);

        Ok(JoinedRoom {
            room_id: room.id.clone(),
            state: room.engine.snapshot(),
            color,
            participants: room.participants().to_vec(),
            chat_history: room.chat.to_vec(),
        })
    }

    /// Plays a move for the participant behind `connection`. Only the side
    /// whose turn it is may move.
    pub fn submit_move(
        &mut self,
        room_id: &str,
        connection: ConnectionId,
        row: u8,
        col: u8,
    ) -> Result<GameState, RoomError> {
        let room = self.room_mut(room_id)?;
        let color = room
            .participant(connection)
            .map(|p| p.color)
            .ok_or(RoomError::UnknownParticipant)?;
        if color != room.engine.current_turn() {
            return Err(MoveError::NotYourTurn.into());
        }
        if !in_range(row, col) {
            return Err(MoveError::OutOfBounds.into());
        }

        let outcome = room.engine.apply_move(row, col, color)?;
        room.touch(Instant::now());
        if let Some(passed) = outcome.passed {
            log::debug!("room {}: {passed:?} has no move and passes", room.id);
        }
        if let Some(winner) = room.engine.winner() {
            log::info!("room {}: game over, winner {winner:?}", room.id);
        }
        Ok(room.engine.snapshot())
    }

    pub fn update_profile(
        &mut self,
        room_id: &str,
        connection: ConnectionId,
        emoji: &str,
    ) -> Result<GameState, RoomError> {
        let room = self.room_mut(room_id)?;
        let participant = room
            .participant_mut(connection)
            .ok_or(RoomError::UnknownParticipant)?;
        participant.emoji = emoji.to_string();
        let color = participant.color;

        room.engine.set_emoji(color, emoji);
        room.touch(Instant::now());
        Ok(room.engine.snapshot())
    }

    /// Restarts the room's game. Anyone who knows the room id may do this,
    /// so it does not count as activity for the idle reaper.
    pub fn reset_room(&mut self, room_id: &str) -> Result<GameState, RoomError> {
        let room = self.room_mut(room_id)?;
        room.engine.reset();
        log::info!("room {} reset", room.id);
        Ok(room.engine.snapshot())
    }

    pub fn post_message(
        &mut self,
        room_id: &str,
        connection: ConnectionId,
        text: &str,
    ) -> Result<ChatMessage, RoomError> {
        let id = self.next_message_id;
        let room = self.room_mut(room_id)?;
        let author_name = room
            .participant(connection)
            .map(|p| p.name.clone())
            .ok_or(RoomError::UnknownParticipant)?;

        let message = ChatMessage {
            id,
            author_name,
            text: text.to_string(),
            created_at: unix_millis(),
        };
        room.chat.push(message.clone());
        room.touch(Instant::now());
        self.next_message_id += 1;
        Ok(message)
    }

    /// Removes `connection` from the room, destroying the room once empty.
    /// The remaining participant keeps their color.
    pub fn leave(
        &mut self,
        room_id: &str,
        connection: ConnectionId,
    ) -> Result<LeaveOutcome, RoomError> {
        let room = self.room_mut(room_id)?;
        room.remove(connection).ok_or(RoomError::UnknownParticipant)?;

        if room.participants().is_empty() {
            let id = room.id.clone();
            self.rooms.remove(&id);
            log::info!("room {id} closed");
            return Ok(LeaveOutcome::Closed);
        }

        room.touch(Instant::now());
        log::info!("{connection} left room {}", room.id);
        Ok(LeaveOutcome::RosterChanged {
            remaining: room.participants().to_vec(),
        })
    }

    /// Implicit leave for a dropped connection, across every room it sat in.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Vec<(RoomId, LeaveOutcome)> {
        let mut seated: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.participant(connection).is_some())
            .map(|room| room.id.clone())
            .collect();
        seated.sort();

        seated
            .into_iter()
            .filter_map(|id| {
                let outcome = self.leave(id.as_str(), connection).ok()?;
                Some((id, outcome))
            })
            .collect()
    }

    /// Destroys rooms idle longer than the configured timeout. Returns the
    /// removed rooms' participants so the caller can notify them.
    pub fn reap_idle(&mut self, now: Instant) -> Vec<(RoomId, Vec<ConnectionId>)> {
        let Some(timeout) = self.config.idle_timeout() else {
            return Vec::new();
        };

        let mut expired: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| now.saturating_duration_since(room.last_activity()) >= timeout)
            .map(|room| room.id.clone())
            .collect();
        expired.sort();

        expired
            .into_iter()
            .filter_map(|id| {
                let room = self.rooms.remove(&id)?;
                log::info!("room {id} reaped after {}s idle", timeout.as_secs());
                Some((id, room.connections()))
            })
            .collect()
    }

    fn unique_room_id(&mut self) -> Result<RoomId, RoomError> {
        for _ in 0..MAX_ROOM_ID_ATTEMPTS {
            let id = RoomId::generate(&mut self.rng, self.config.room_id_len);
            if !self.rooms.contains_key(&id) {
                return Ok(id);
            }
        }
        log::warn!(
            "no free {}-character room code after {MAX_ROOM_ID_ATTEMPTS} draws ({} rooms live)",
            self.config.room_id_len,
            self.rooms.len()
        );
        Err(RoomError::RoomIdsExhausted)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
