use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::grid::Grid;

/// One of the four board shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown direction: {other:?}")),
        }
    }
}

/// State of one game. Replaced wholesale on a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub grid: Grid,
    pub score: u32,
    pub game_over: bool,
    /// Contract:
    /// - Set the first time a 2048 tile appears.
    /// - Never cleared until the next new game.
    pub won: bool,
}

/// What a single directional input did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    /// `false` when the input was rejected as a no-op.
    pub moved: bool,
    pub score_gained: u32,
    /// `true` only on the move that flipped `won` from false to true.
    pub just_won: bool,
}

/// Snapshot handed to the rendering layer after every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub grid: Grid,
    pub score: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub won: bool,
    pub keep_playing: bool,
    pub moved: bool,
    pub score_gained: u32,
    pub just_won: bool,
}
