// Snake Game Engine
// This module implements the core game logic shared by every front-end

use rand::{Rng, RngCore, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod game_state;
pub mod input;
pub mod rules;
pub mod runner;


pub use game_state::{
    Board, BonusFood, Coordinate, Direction, Food, GamePhase, GameState, Snake,
};
pub use input::Input;
pub use rules::{BonusPolicy, RuleSet, Rules, RulesError};
pub use runner::GameLoop;

/// Random placements before falling back to scanning for free cells.
const PLACEMENT_ATTEMPTS: usize = 100;

// Main engine trait that different front-ends drive
pub trait GameEngine {
    fn initialize_game(&self, rng: &mut dyn RngCore) -> GameState;
    fn handle_input(
        &self,
        state: &mut GameState,
        input: Input,
        rng: &mut dyn RngCore,
    ) -> Vec<GameEvent>;
    fn advance(&self, state: &mut GameState, rng: &mut dyn RngCore) -> Vec<GameEvent>;
    fn advance_clock(
        &self,
        state: &mut GameState,
        elapsed: Duration,
        rng: &mut dyn RngCore,
    ) -> Vec<GameEvent>;
}

// Events that occur during gameplay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    SnakeMoved {
        direction: Direction,
        new_head: Coordinate,
    },
    DirectionRejected {
        requested: Direction,
        current: Direction,
    },
    FoodEaten {
        position: Coordinate,
        reward: u32,
    },
    FoodSpawned {
        position: Coordinate,
    },
    BonusFoodSpawned {
        position: Coordinate,
        expires_at: Duration,
    },
    BonusFoodEaten {
        position: Coordinate,
        reward: u32,
    },
    BonusFoodExpired {
        position: Coordinate,
    },
    SpeedChanged {
        tick_interval: Duration,
    },
    ScoreChanged {
        score: u32,
    },
    Paused,
    Resumed,
    GameOver {
        cause: GameOverCause,
        score: u32,
    },
    Reset,
}

// Reasons a game can end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    WallCollision,
    SelfCollision,
}

// Standard single-player engine
#[derive(Debug, Clone, Default)]
pub struct StandardEngine {
    rules: Rules,
}

impl StandardEngine {
    pub fn new(rules: Rules) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self { rules })
    }
}

impl GameEngine for StandardEngine {
    fn initialize_game(&self, rng: &mut dyn RngCore) -> GameState {
        let mut state = GameState::new(
            Board::new(self.rules.board_width, self.rules.board_height),
            Snake::new(self.rules.starting_snake.iter().copied()),
            self.rules.starting_direction,
            self.rules.initial_tick_interval,
        );
        state.food = self.spawn_food(&state, rng);
        state
    }

    fn handle_input(
        &self,
        state: &mut GameState,
        input: Input,
        rng: &mut dyn RngCore,
    ) -> Vec<GameEvent> {
        match input {
            Input::ChangeDirection(requested) => {
                if matches!(state.phase, GamePhase::Ready | GamePhase::GameOver) {
                    return vec![];
                }
                // Checked against the committed direction, not the pending one
                if requested == state.direction.opposite() {
                    return vec![GameEvent::DirectionRejected {
                        requested,
                        current: state.direction,
                    }];
                }
                state.pending_direction = requested;
                vec![]
            }
            Input::TogglePause => match state.phase {
                GamePhase::Running => {
                    state.phase = GamePhase::Paused;
                    vec![GameEvent::Paused]
                }
                GamePhase::Paused => {
                    state.phase = GamePhase::Running;
                    vec![GameEvent::Resumed]
                }
                GamePhase::Ready | GamePhase::GameOver => vec![],
            },
            Input::Start => match state.phase {
                GamePhase::Ready | GamePhase::GameOver => self.start(state, rng),
                GamePhase::Running | GamePhase::Paused => vec![],
            },
            Input::Restart => {
                if state.is_game_over() {
                    self.start(state, rng)
                } else {
                    vec![]
                }
            }
            Input::Exit => {
                *state = self.initialize_game(rng);
                vec![GameEvent::Reset, GameEvent::ScoreChanged { score: 0 }]
            }
        }
    }

    fn advance(&self, state: &mut GameState, rng: &mut dyn RngCore) -> Vec<GameEvent> {
        if state.phase != GamePhase::Running {
            return vec![];
        }

        let mut events = Vec::new();
        state.turn += 1;

        state.direction = state.pending_direction;
        let new_head = state.snake.get_next_head(state.direction);

        if !state.board.is_valid_position(&new_head) {
            return self.end_game(state, GameOverCause::WallCollision);
        }
        // Includes the tail, which has not moved out of the way yet
        if state.snake.occupies(&new_head) {
            return self.end_game(state, GameOverCause::SelfCollision);
        }

        // Only regular food grows the snake; bonus food just scores
        if state.food.is_some_and(|f| f.position == new_head) {
            state.snake.grow(new_head);
        } else {
            state.snake.move_to(new_head);
        }
        events.push(GameEvent::SnakeMoved {
            direction: state.direction,
            new_head,
        });

        let score_before = state.score;

        if state.food.is_some_and(|f| f.position == new_head) {
            state.score += self.rules.food_reward;
            events.push(GameEvent::FoodEaten {
                position: new_head,
                reward: self.rules.food_reward,
            });

            state.food = self.spawn_food(state, rng);
            if let Some(food) = state.food {
                events.push(GameEvent::FoodSpawned {
                    position: food.position,
                });
            }

            if let BonusPolicy::OnPickup { chance } = self.rules.bonus_policy
                && rng.gen_bool(chance)
            {
                // Replaces any bonus already on the board
                state.bonus_food = None;
                events.extend(self.spawn_bonus_food(state, rng));
            }

            let interval = self.rules.next_tick_interval(state.tick_interval);
            if interval != state.tick_interval {
                state.tick_interval = interval;
                events.push(GameEvent::SpeedChanged {
                    tick_interval: interval,
                });
            }
        } else if state.bonus_food.is_some_and(|b| b.position == new_head) {
            state.score += self.rules.bonus_reward;
            state.bonus_food = None;
            events.push(GameEvent::BonusFoodEaten {
                position: new_head,
                reward: self.rules.bonus_reward,
            });
            self.schedule_bonus_food(state, rng);
        }

        if state.score != score_before {
            events.push(GameEvent::ScoreChanged { score: state.score });
        }

        events
    }

    fn advance_clock(
        &self,
        state: &mut GameState,
        elapsed: Duration,
        rng: &mut dyn RngCore,
    ) -> Vec<GameEvent> {
        if state.phase != GamePhase::Running {
            return vec![];
        }

        let mut events = Vec::new();
        state.clock += elapsed;

        if let Some(bonus) = state.bonus_food
            && bonus.expires_at <= state.clock
        {
            state.bonus_food = None;
            events.push(GameEvent::BonusFoodExpired {
                position: bonus.position,
            });
            self.schedule_bonus_food(state, rng);
        }

        if let Some(spawn_at) = state.next_bonus_at
            && spawn_at <= state.clock
        {
            state.next_bonus_at = None;
            events.extend(self.spawn_bonus_food(state, rng));
        }

        events
    }
}

impl StandardEngine {
    fn start(&self, state: &mut GameState, rng: &mut dyn RngCore) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if state.phase != GamePhase::Ready {
            *state = self.initialize_game(rng);
            events.push(GameEvent::Reset);
        }

        state.phase = GamePhase::Running;
        self.schedule_bonus_food(state, rng);

        events.push(GameEvent::GameStarted);
        events.push(GameEvent::ScoreChanged { score: state.score });
        events
    }

    fn end_game(&self, state: &mut GameState, cause: GameOverCause) -> Vec<GameEvent> {
        state.phase = GamePhase::GameOver;
        state.next_bonus_at = None;
        vec![GameEvent::GameOver {
            cause,
            score: state.score,
        }]
    }

    /// Arm the spawn timer when bonus food is timer driven.
    fn schedule_bonus_food(&self, state: &mut GameState, rng: &mut dyn RngCore) {
        if let BonusPolicy::Scheduled {
            min_delay,
            max_delay,
        } = self.rules.bonus_policy
        {
            let delay = if min_delay == max_delay {
                min_delay
            } else {
                rng.gen_range(min_delay..=max_delay)
            };
            state.next_bonus_at = Some(state.clock + delay);
        }
    }

    fn spawn_bonus_food(&self, state: &mut GameState, rng: &mut dyn RngCore) -> Vec<GameEvent> {
        match self.find_free_cell(state, rng) {
            Some(position) => {
                let expires_at = state.clock + self.rules.bonus_lifetime;
                state.bonus_food = Some(BonusFood {
                    position,
                    expires_at,
                });
                vec![GameEvent::BonusFoodSpawned {
                    position,
                    expires_at,
                }]
            }
            None => vec![],
        }
    }

    fn spawn_food(&self, state: &GameState, rng: &mut dyn RngCore) -> Option<Food> {
        self.find_free_cell(state, rng)
            .map(|position| Food { position })
    }

    /// Random cell not covered by the snake or any food. `None` only when the
    /// board is full.
    fn find_free_cell(&self, state: &GameState, rng: &mut dyn RngCore) -> Option<Coordinate> {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let position = Coordinate {
                x: rng.gen_range(0..state.board.width),
                y: rng.gen_range(0..state.board.height),
            };
            if !state.is_occupied(&position) {
                return Some(position);
            }
        }

        state.free_cells().choose(rng).copied()
    }
}
