use web_time::Instant;

use crate::error::RoomError;
use crate::protocol::{ClientCommand, ServerEvent};
use crate::registry::{LeaveOutcome, SessionRegistry};
use crate::room::ConnectionId;

/// One event addressed to one or more connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub recipients: Vec<ConnectionId>,
    pub event: ServerEvent,
}

impl Outbound {
    fn to(connection: ConnectionId, event: ServerEvent) -> Self {
        Self {
            recipients: vec![connection],
            event,
        }
    }
}

/// Routes client commands into the registry and decides who hears about the
/// result. The transport delivers the returned [`Outbound`] events.
pub struct Dispatcher {
    registry: SessionRegistry,
}

impl Dispatcher {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Decodes and handles one raw frame. Malformed frames are dropped.
    pub fn handle_frame(&mut self, connection: ConnectionId, frame: &str) -> Vec<Outbound> {
        match ClientCommand::from_json(frame) {
            Ok(command) => self.handle(connection, command),
            Err(e) => {
                log::warn!("{connection}: {e}");
                if self.registry.config().surface_rejections {
                    vec![Outbound::to(connection, ServerEvent::Error(e.to_string()))]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Only `create_room` and `join_room` failures are reported to the actor
    /// unless `surface_rejections` is configured; everything else fails silently.
    pub fn handle(&mut self, connection: ConnectionId, command: ClientCommand) -> Vec<Outbound> {
        let reports_errors = matches!(
            command,
            ClientCommand::CreateRoom(_) | ClientCommand::JoinRoom { .. }
        );
        let result = match command {
            ClientCommand::CreateRoom(name) => self
                .registry
                .create_room(connection, &name)
                .map(|created| {
                    vec![Outbound::to(
                        connection,
                        ServerEvent::RoomCreated {
                            room_id: created.room_id,
                            game: created.state,
                            color: created.color,
                        },
                    )]
                }),
            ClientCommand::JoinRoom {
                room_id,
                player_name,
            } => self
                .registry
                .join_room(&room_id, connection, &player_name)
                .map(|joined| {
                    let everyone: Vec<ConnectionId> =
                        joined.participants.iter().map(|p| p.id).collect();
                    vec![
                        Outbound::to(
                            connection,
                            ServerEvent::RoomJoined {
                                room_id: joined.room_id,
                                game: joined.state.clone(),
                                color: joined.color,
                            },
                        ),
                        Outbound {
                            recipients: everyone,
                            event: ServerEvent::PlayerJoined {
                                players: joined.participants,
                                game: joined.state,
                            },
                        },
                        Outbound::to(connection, ServerEvent::ChatHistory(joined.chat_history)),
                    ]
                }),
            ClientCommand::MakeMove { room_id, row, col } => self
                .registry
                .submit_move(&room_id, connection, row, col)
                .and_then(|state| self.broadcast(&room_id, ServerEvent::GameUpdated(state))),
            ClientCommand::UpdateEmoji { room_id, emoji } => self
                .registry
                .update_profile(&room_id, connection, &emoji)
                .and_then(|state| self.broadcast(&room_id, ServerEvent::GameUpdated(state))),
            ClientCommand::ResetGame(room_id) => self
                .registry
                .reset_room(&room_id)
                .and_then(|state| self.broadcast(&room_id, ServerEvent::GameUpdated(state))),
            ClientCommand::SendMessage { room_id, message } => self
                .registry
                .post_message(&room_id, connection, &message)
                .and_then(|message| self.broadcast(&room_id, ServerEvent::NewMessage(message))),
        };

        result.unwrap_or_else(|err| self.reject(connection, err, reports_errors))
    }

    /// Implicit leave when the transport loses `connection`.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Vec<Outbound> {
        self.registry
            .disconnect(connection)
            .into_iter()
            .filter_map(|(_, outcome)| match outcome {
                LeaveOutcome::Closed => None,
                LeaveOutcome::RosterChanged { remaining } => Some(Outbound {
                    recipients: remaining.iter().map(|p| p.id).collect(),
                    event: ServerEvent::PlayerLeft { players: remaining },
                }),
            })
            .collect()
    }

    /// Runs the idle reaper and tells anyone still seated that their room is gone.
    pub fn reap_idle(&mut self, now: Instant) -> Vec<Outbound> {
        self.registry
            .reap_idle(now)
            .into_iter()
            .filter(|(_, connections)| !connections.is_empty())
            .map(|(room_id, connections)| Outbound {
                recipients: connections,
                event: ServerEvent::RoomClosed { room_id },
            })
            .collect()
    }

    fn broadcast(&self, room_id: &str, event: ServerEvent) -> Result<Vec<Outbound>, RoomError> {
        let room = self.registry.room(room_id)?;
        Ok(vec![Outbound {
            recipients: room.connections(),
            event,
        }])
    }

    fn reject(&self, connection: ConnectionId, err: RoomError, reported: bool) -> Vec<Outbound> {
        if reported || self.registry.config().surface_rejections {
            return vec![Outbound::to(connection, ServerEvent::Error(err.to_string()))];
        }
        log::debug!("{connection}: dropped command: {err}");
        Vec::new()
    }
}
