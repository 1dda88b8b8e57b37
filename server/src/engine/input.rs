// Player input, independent of whichever front-end produced it

use serde::{Deserialize, Serialize};

use super::game_state::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    ChangeDirection(Direction),
    TogglePause,
    /// Begin a game from `Ready` (or start over after a game over).
    Start,
    /// Only honoured after a game over.
    Restart,
    /// Abandon the current game and return to `Ready`.
    Exit,
}

impl Input {
    /// Map a key name (DOM `KeyboardEvent.key` style) to an input.
    pub fn from_key(key: &str) -> Option<Self> {
        let input = match key {
            "ArrowUp" => Input::ChangeDirection(Direction::Up),
            "ArrowDown" => Input::ChangeDirection(Direction::Down),
            "ArrowLeft" => Input::ChangeDirection(Direction::Left),
            "ArrowRight" => Input::ChangeDirection(Direction::Right),
            "Escape" | " " => Input::TogglePause,
            "Enter" => Input::Restart,
            other => match other.to_lowercase().as_str() {
                "w" => Input::ChangeDirection(Direction::Up),
                "s" => Input::ChangeDirection(Direction::Down),
                "a" => Input::ChangeDirection(Direction::Left),
                "d" => Input::ChangeDirection(Direction::Right),
                "p" => Input::TogglePause,
                "q" => Input::Exit,
                _ => return None,
            },
        };

        Some(input)
    }
}
