// Game rules configuration for Snake

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use super::game_state::{Coordinate, Direction};

/// How bonus food comes into play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BonusPolicy {
    /// Never spawns.
    Disabled,
    /// Rolls `chance` on every regular-food pickup.
    OnPickup { chance: f64 },
    /// A timer spawns one after a uniformly random delay; once it is eaten
    /// or expires, the next spawn is scheduled the same way.
    Scheduled {
        min_delay: Duration,
        max_delay: Duration,
    },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RulesError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: i32, height: i32 },
    #[error("starting snake must have at least one segment")]
    EmptySnake,
    #[error("starting segment ({x}, {y}) is outside the board")]
    SegmentOutOfBounds { x: i32, y: i32 },
    #[error("starting segment ({x}, {y}) appears more than once")]
    DuplicateSegment { x: i32, y: i32 },
    #[error("minimum tick interval {min:?} exceeds initial interval {initial:?}")]
    IntervalFloorAboveStart { min: Duration, initial: Duration },
    #[error("tick interval must be non-zero")]
    ZeroInterval,
    #[error("bonus chance {0} is not a probability")]
    InvalidChance(f64),
    #[error("bonus delay range {min:?}..{max:?} is empty")]
    InvalidDelayRange { min: Duration, max: Duration },
}

// Standard arcade rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub board_width: i32,
    pub board_height: i32,
    pub food_reward: u32,
    pub bonus_reward: u32,
    pub initial_tick_interval: Duration,
    /// Subtracted from the tick interval on every regular-food pickup.
    pub speed_up_step: Duration,
    pub min_tick_interval: Duration,
    pub bonus_policy: BonusPolicy,
    pub bonus_lifetime: Duration,
    pub starting_snake: Vec<Coordinate>,
    pub starting_direction: Direction,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            board_width: 20,
            board_height: 20,
            food_reward: 10,
            bonus_reward: 50,
            initial_tick_interval: Duration::from_millis(150),
            speed_up_step: Duration::from_millis(2),
            min_tick_interval: Duration::from_millis(50),
            bonus_policy: BonusPolicy::OnPickup { chance: 0.3 },
            bonus_lifetime: Duration::from_secs(5),
            starting_snake: vec![
                Coordinate::new(5, 5),
                Coordinate::new(4, 5),
                Coordinate::new(3, 5),
            ],
            starting_direction: Direction::Right,
        }
    }
}

impl Rules {
    /// Fixed 10 ticks per second with a timer-driven bonus that shows up
    /// every 5 to 15 seconds.
    pub fn classic() -> Self {
        Self {
            initial_tick_interval: Duration::from_millis(100),
            speed_up_step: Duration::ZERO,
            min_tick_interval: Duration::from_millis(100),
            bonus_policy: BonusPolicy::Scheduled {
                min_delay: Duration::from_secs(5),
                max_delay: Duration::from_secs(15),
            },
            starting_snake: vec![
                Coordinate::new(3, 1),
                Coordinate::new(2, 1),
                Coordinate::new(1, 1),
            ],
            ..Self::default()
        }
    }

    /// A single-segment snake in the middle of the board, constant speed and
    /// no bonus food.
    pub fn minimal() -> Self {
        Self {
            speed_up_step: Duration::ZERO,
            min_tick_interval: Duration::from_millis(150),
            bonus_policy: BonusPolicy::Disabled,
            starting_snake: vec![Coordinate::new(10, 10)],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.board_width < 1 || self.board_height < 1 {
            return Err(RulesError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.starting_snake.is_empty() {
            return Err(RulesError::EmptySnake);
        }

        let mut seen = HashSet::new();
        for segment in &self.starting_snake {
            let in_bounds = (0..self.board_width).contains(&segment.x)
                && (0..self.board_height).contains(&segment.y);
            if !in_bounds {
                return Err(RulesError::SegmentOutOfBounds {
                    x: segment.x,
                    y: segment.y,
                });
            }
            if !seen.insert(*segment) {
                return Err(RulesError::DuplicateSegment {
                    x: segment.x,
                    y: segment.y,
                });
            }
        }

        if self.min_tick_interval.is_zero() {
            return Err(RulesError::ZeroInterval);
        }
        if self.min_tick_interval > self.initial_tick_interval {
            return Err(RulesError::IntervalFloorAboveStart {
                min: self.min_tick_interval,
                initial: self.initial_tick_interval,
            });
        }

        match self.bonus_policy {
            BonusPolicy::OnPickup { chance } if !(0.0..=1.0).contains(&chance) => {
                Err(RulesError::InvalidChance(chance))
            }
            BonusPolicy::Scheduled {
                min_delay,
                max_delay,
            } if min_delay > max_delay => Err(RulesError::InvalidDelayRange {
                min: min_delay,
                max: max_delay,
            }),
            _ => Ok(()),
        }
    }

    /// Interval after one more regular-food pickup.
    pub fn next_tick_interval(&self, current: Duration) -> Duration {
        current
            .saturating_sub(self.speed_up_step)
            .max(self.min_tick_interval)
    }
}

// Named presets selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSet {
    #[default]
    Arcade,
    Classic,
    Minimal,
}

impl RuleSet {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arcade" => Some(RuleSet::Arcade),
            "classic" => Some(RuleSet::Classic),
            "minimal" => Some(RuleSet::Minimal),
            _ => None,
        }
    }

    pub fn rules(&self) -> Rules {
        match self {
            RuleSet::Arcade => Rules::default(),
            RuleSet::Classic => Rules::classic(),
            RuleSet::Minimal => Rules::minimal(),
        }
    }
}
