// Game state representation for a single-player Snake session

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

// 2D cell position on the grid. Signed so a head that leaves the board
// through the left or top edge is still representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Screen coordinates: y grows downwards, so `Up` decrements it.
    pub fn apply_direction(&self, direction: Direction) -> Coordinate {
        match direction {
            Direction::Up => Coordinate {
                x: self.x,
                y: self.y - 1,
            },
            Direction::Down => Coordinate {
                x: self.x,
                y: self.y + 1,
            },
            Direction::Left => Coordinate {
                x: self.x - 1,
                y: self.y,
            },
            Direction::Right => Coordinate {
                x: self.x + 1,
                y: self.y,
            },
        }
    }
}

// Movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// Regular food on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: Coordinate,
}

/// Higher-value food that disappears once the game clock passes `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusFood {
    pub position: Coordinate,
    pub expires_at: Duration,
}

// Snake representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    pub body: VecDeque<Coordinate>, // Head is at index 0
}

impl Snake {
    pub fn new(segments: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            body: segments.into_iter().collect(),
        }
    }

    pub fn get_head(&self) -> Coordinate {
        self.body[0]
    }

    pub fn get_next_head(&self, direction: Direction) -> Coordinate {
        self.get_head().apply_direction(direction)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, position: &Coordinate) -> bool {
        self.body.contains(position)
    }

    pub fn move_to(&mut self, new_head: Coordinate) {
        self.body.push_front(new_head);
        self.body.pop_back();
    }

    pub fn grow(&mut self, new_head: Coordinate) {
        self.body.push_front(new_head);
    }
}

// Game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_valid_position(&self, pos: &Coordinate) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coordinate { x, y }))
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Ready,
    Running,
    Paused,
    GameOver,
}

// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub snake: Snake,
    /// Direction used by the last tick.
    pub direction: Direction,
    /// Latest accepted request, committed at the start of the next tick.
    pub pending_direction: Direction,
    pub food: Option<Food>,
    pub bonus_food: Option<BonusFood>,
    /// Game-clock time of the next scheduled bonus spawn.
    pub next_bonus_at: Option<Duration>,
    pub score: u32,
    pub tick_interval: Duration,
    /// Time spent in `Running`; bonus timers are measured against it.
    pub clock: Duration,
    pub phase: GamePhase,
    pub turn: u32,
}

impl GameState {
    pub fn new(
        board: Board,
        snake: Snake,
        direction: Direction,
        tick_interval: Duration,
    ) -> Self {
        Self {
            board,
            snake,
            direction,
            pending_direction: direction,
            food: None,
            bonus_food: None,
            next_bonus_at: None,
            score: 0,
            tick_interval,
            clock: Duration::ZERO,
            phase: GamePhase::Ready,
            turn: 0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// True if the cell holds a snake segment or either kind of food.
    pub fn is_occupied(&self, position: &Coordinate) -> bool {
        self.snake.occupies(position)
            || self.food.is_some_and(|f| f.position == *position)
            || self.bonus_food.is_some_and(|b| b.position == *position)
    }

    pub fn free_cells(&self) -> Vec<Coordinate> {
        self.board
            .cells()
            .filter(|cell| !self.is_occupied(cell))
            .collect()
    }
}
