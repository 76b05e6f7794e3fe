use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

pub const BOARD_WIDTH: usize = 8;

/// A side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    pub(crate) fn default_emoji(self) -> &'static str {
        match self {
            Color::Black => "😎",
            Color::White => "🤖",
        }
    }

    pub(crate) fn default_name(self) -> &'static str {
        match self {
            Color::Black => "Player 1",
            Color::White => "Player 2",
        }
    }
}

/// Contents of one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

impl Cell {
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
        }
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Tie,
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_WIDTH) as u8,
            col: (idx % BOARD_WIDTH) as u8,
        }
    }
}

/// Cosmetic per-side display data. Never affects legality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub emoji: String,
    pub name: String,
}

impl Profile {
    pub fn default_for(color: Color) -> Self {
        Self {
            emoji: color.default_emoji().to_string(),
            name: color.default_name().to_string(),
        }
    }
}

/// One profile per side, indexed by [`Color`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profiles {
    pub black: Profile,
    pub white: Profile,
}

impl Default for Profiles {
    fn default() -> Self {
        Self {
            black: Profile::default_for(Color::Black),
            white: Profile::default_for(Color::White),
        }
    }
}

impl Index<Color> for Profiles {
    type Output = Profile;

    fn index(&self, color: Color) -> &Profile {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }
}

impl IndexMut<Color> for Profiles {
    fn index_mut(&mut self, color: Color) -> &mut Profile {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub black: u8,
    pub white: u8,
}

/// Full engine snapshot, retransmitted to every participant after each change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Row-major; `None` is an empty square.
    pub board: Vec<Vec<Option<Color>>>,
    pub current_player: Color,
    pub players: Profiles,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub scores: Scores,
    /// Contract:
    /// - `true` when the last move made the opponent pass.
    /// - `false` after a normal move or a reset.
    pub is_pass: bool,
    /// Squares flipped by the last move; empty after a reset.
    pub flipped: Vec<Position>,
}
