// Game runner - turns display frames into fixed-interval engine ticks

use rand::RngCore;
use std::time::Duration;
use tracing::{debug, info};

use super::{GameEngine, GameEvent, GamePhase, GameState, Input, StandardEngine};

type Observer = Box<dyn FnMut(&GameState, &[GameEvent])>;

/// Owns one session and drives it from a per-frame callback.
///
/// Frames may arrive at any rate; elapsed time is accumulated and the engine
/// ticks once per `tick_interval` that fits. Frame timestamps must be
/// monotonic (time since any fixed origin).
pub struct GameLoop<R: RngCore> {
    engine: StandardEngine,
    state: GameState,
    rng: R,
    last_frame: Option<Duration>,
    accumulator: Duration,
    observer: Option<Observer>,
}

impl<R: RngCore> GameLoop<R> {
    pub fn new(engine: StandardEngine, mut rng: R) -> Self {
        let state = engine.initialize_game(&mut rng);
        Self {
            engine,
            state,
            rng,
            last_frame: None,
            accumulator: Duration::ZERO,
            observer: None,
        }
    }

    /// Receive every non-empty batch of events along with the state that
    /// produced it.
    pub fn with_observer(mut self, observer: impl FnMut(&GameState, &[GameEvent]) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&mut self, input: Input) -> Vec<GameEvent> {
        let was_running = self.state.phase == GamePhase::Running;
        let events = self
            .engine
            .handle_input(&mut self.state, input, &mut self.rng);

        // Time spent outside Running never counts towards a tick
        if !was_running && self.state.phase == GamePhase::Running {
            self.last_frame = None;
            self.accumulator = Duration::ZERO;
        }

        self.notify(&events);
        events
    }

    /// Called once per display frame with the current timestamp.
    pub fn frame(&mut self, now: Duration) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Running {
            self.last_frame = None;
            return vec![];
        }

        let Some(last) = self.last_frame.replace(now) else {
            return vec![];
        };
        let delta = now.saturating_sub(last);

        let mut events = self
            .engine
            .advance_clock(&mut self.state, delta, &mut self.rng);

        self.accumulator += delta;
        while self.state.phase == GamePhase::Running
            && self.accumulator >= self.state.tick_interval
        {
            self.accumulator -= self.state.tick_interval;
            events.extend(self.engine.advance(&mut self.state, &mut self.rng));
        }

        if let Some(GameEvent::GameOver { cause, score }) = events.last() {
            info!(?cause, score, turn = self.state.turn, "Game over");
            self.accumulator = Duration::ZERO;
        }

        self.notify(&events);
        events
    }

    fn notify(&mut self, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        debug!(count = events.len(), turn = self.state.turn, "Game events");
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Coordinate, Direction, Rules};
    use rand::{SeedableRng, rngs::StdRng};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn running_loop(rules: Rules) -> GameLoop<StdRng> {
        let engine = StandardEngine::new(rules).unwrap();
        let mut game = GameLoop::new(engine, StdRng::seed_from_u64(7));
        game.input(Input::Start);
        game
    }

    #[test]
    fn test_first_frame_only_sets_time_base() {
        let mut game = running_loop(Rules::default());

        assert!(game.frame(ms(10_000)).is_empty());
        assert_eq!(game.state().turn, 0);
    }

    #[test]
    fn test_ticks_accumulate_across_frames() {
        let mut game = running_loop(Rules::default());

        game.frame(ms(0));
        game.frame(ms(100));
        assert_eq!(game.state().turn, 0);

        // 100 + 100 = 200ms: one 150ms tick, 50ms carried over
        game.frame(ms(200));
        assert_eq!(game.state().turn, 1);

        game.frame(ms(300));
        assert_eq!(game.state().turn, 2);
        assert_eq!(game.state().snake.get_head(), Coordinate::new(7, 5));
    }

    #[test]
    fn test_one_long_frame_runs_several_ticks() {
        let mut game = running_loop(Rules::default());

        game.frame(ms(0));
        game.frame(ms(450));

        assert_eq!(game.state().turn, 3);
    }

    #[test]
    fn test_pause_freezes_ticks_and_clock() {
        let mut game = running_loop(Rules::default());

        game.frame(ms(0));
        game.frame(ms(150));
        assert_eq!(game.state().turn, 1);

        game.input(Input::TogglePause);
        assert!(game.frame(ms(5_000)).is_empty());
        assert_eq!(game.state().turn, 1);

        game.input(Input::TogglePause);
        // Resuming re-establishes the time base instead of replaying the pause
        game.frame(ms(5_100));
        assert_eq!(game.state().turn, 1);
        assert_eq!(game.state().clock, ms(150));

        game.frame(ms(5_250));
        assert_eq!(game.state().turn, 2);
    }

    #[test]
    fn test_stops_ticking_after_game_over() {
        let rules = Rules {
            starting_snake: vec![Coordinate::new(19, 0)],
            starting_direction: Direction::Right,
            ..Rules::default()
        };
        let mut game = running_loop(rules);

        game.frame(ms(0));
        let events = game.frame(ms(1_500));

        assert!(game.state().is_game_over());
        assert_eq!(game.state().turn, 1);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_observer_sees_each_batch() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let engine = StandardEngine::new(Rules::default()).unwrap();
        let mut game = GameLoop::new(engine, StdRng::seed_from_u64(1)).with_observer(
            move |state, events| {
                sink.borrow_mut().push((state.turn, events.len()));
            },
        );

        game.input(Input::Start);
        game.frame(ms(0));
        game.frame(ms(150));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].0, 1);
    }
}
