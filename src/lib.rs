use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod protocol;
pub mod registry;
pub mod room;
pub mod types;
pub mod wasm;

pub use config::RegistryConfig;
pub use dispatch::{Dispatcher, Outbound};
pub use error::{MoveError, ProtocolError, RoomError};
pub use game::{GameEngine, MoveOutcome};
pub use registry::{JoinedRoom, LeaveOutcome, SessionRegistry};
pub use room::{ChatMessage, ConnectionId, Participant, RoomId};
pub use types::{Color, GameState, Position, Winner};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
