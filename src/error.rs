use std::fmt;

/// Why the engine refused a move. Every variant is an illegal move from the
/// room's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    GameOver,
    NotYourTurn,
    OutOfBounds,
    Occupied,
    NoCaptures,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameOver => write!(f, "game is already over"),
            MoveError::NotYourTurn => write!(f, "it is not the player's turn"),
            MoveError::OutOfBounds => write!(f, "row/col out of range"),
            MoveError::Occupied => write!(f, "square is occupied"),
            MoveError::NoCaptures => write!(f, "move captures nothing"),
        }
    }
}

impl std::error::Error for MoveError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    RoomNotFound,
    RoomFull,
    AlreadyJoined,
    UnknownParticipant,
    IllegalMove(MoveError),
    /// Every generated code collided with a live room.
    RoomIdsExhausted,
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::RoomNotFound => write!(f, "Room not found"),
            RoomError::RoomFull => write!(f, "Room is full"),
            RoomError::AlreadyJoined => write!(f, "Already in room"),
            RoomError::UnknownParticipant => write!(f, "Not a participant of this room"),
            RoomError::IllegalMove(e) => write!(f, "Illegal move: {e}"),
            RoomError::RoomIdsExhausted => write!(f, "No room code available"),
        }
    }
}

impl std::error::Error for RoomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoomError::IllegalMove(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MoveError> for RoomError {
    fn from(e: MoveError) -> Self {
        RoomError::IllegalMove(e)
    }
}

/// Malformed inbound frame or config document.
#[derive(Debug)]
pub enum ProtocolError {
    Json(serde_json::Error),
    InvalidConfig(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Json(e) => write!(f, "malformed JSON: {e}"),
            ProtocolError::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Json(e) => Some(e),
            ProtocolError::InvalidConfig(_) => None,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::Json(e)
    }
}
