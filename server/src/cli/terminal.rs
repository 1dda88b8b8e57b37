//! Raw-mode terminal front-end for the engine.
//!
//! The frame loop runs on the calling thread. Score service calls are
//! spawned onto the tokio runtime and report back over a channel that the
//! loop drains without blocking, so a slow or missing service never stalls a
//! game.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Color, Stylize},
    terminal,
};
use rand::{SeedableRng, rngs::StdRng};
use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};
use tokio::{runtime::Handle, sync::mpsc};

use crate::{
    engine::{Coordinate, GameEvent, GameLoop, GamePhase, GameState, Input, Rules, StandardEngine},
    high_score::{HighScoreStore, record_high_score},
    models::score::Score,
    score_client::ScoreClient,
};

const FRAME_DURATION: Duration = Duration::from_millis(16);
const LEADERBOARD_LINES: usize = 5;

pub struct PlayOptions {
    pub rules: Rules,
    pub player_name: String,
    /// `None` plays offline: nothing is submitted or fetched.
    pub client: Option<ScoreClient>,
}

/// What the screen shows besides the board itself.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scoreboard {
    pub best: u32,
    pub new_best: bool,
    pub leaderboard: Vec<Score>,
    pub submitted: Option<Score>,
    pub syncing: bool,
}

#[derive(Debug)]
enum NetworkUpdate {
    Leaderboard(Vec<Score>),
    Submitted(Option<Score>),
}

/// Restores the terminal even when the loop bails out with an error.
struct RawModeGuard;

impl RawModeGuard {
    fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// DOM-style key name for a terminal key, as understood by [`Input::from_key`].
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };
    Some(name)
}

/// Enter also starts the very first game.
pub fn input_for_key(code: KeyCode, phase: GamePhase) -> Option<Input> {
    let input = Input::from_key(&key_name(code)?)?;
    match (input, phase) {
        (Input::Restart, GamePhase::Ready) => Some(Input::Start),
        _ => Some(input),
    }
}

fn is_quit(key: &KeyEvent, phase: GamePhase) -> bool {
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
    // q exits a game in progress, and leaves the program from the title screen
    let q_on_title = phase == GamePhase::Ready && matches!(key.code, KeyCode::Char('q' | 'Q'));
    ctrl_c || q_on_title
}

fn cell_glyph(state: &GameState, cell: Coordinate) -> &'static str {
    if state.snake.get_head() == cell {
        "@@"
    } else if state.snake.occupies(&cell) {
        "[]"
    } else if state.bonus_food.is_some_and(|b| b.position == cell) {
        "$$"
    } else if state.food.is_some_and(|f| f.position == cell) {
        "()"
    } else {
        " ."
    }
}

fn status_line(state: &GameState, scoreboard: &Scoreboard) -> String {
    match state.phase {
        GamePhase::Ready => "Enter to start, q to quit".to_string(),
        GamePhase::Running => "WASD/arrows to move, p to pause, q to give up".to_string(),
        GamePhase::Paused => "Paused. p to resume".to_string(),
        GamePhase::GameOver => {
            let mut line = format!("Game over! Final score {}.", state.score);
            if scoreboard.new_best {
                line.push_str(" New high score!");
            }
            line.push_str(" Enter to play again, q for the title screen");
            line
        }
    }
}

/// The whole screen as plain text, one entry per terminal row.
pub fn render_lines(state: &GameState, scoreboard: &Scoreboard) -> Vec<String> {
    let width = state.board.width.max(0) as usize;
    let mut lines = Vec::with_capacity(state.board.height.max(0) as usize + 12);

    lines.push(format!(
        "SNAKE  score {:<6} best {:<6} speed {}ms",
        state.score,
        scoreboard.best.max(state.score),
        state.tick_interval.as_millis()
    ));

    let border = format!("+{}+", "-".repeat(width * 2));
    lines.push(border.clone());
    for y in 0..state.board.height {
        let row: String = (0..state.board.width)
            .map(|x| cell_glyph(state, Coordinate::new(x, y)))
            .collect();
        lines.push(format!("|{row}|"));
    }
    lines.push(border);

    lines.push(status_line(state, scoreboard));

    if matches!(state.phase, GamePhase::Ready | GamePhase::GameOver) {
        if let Some(submitted) = &scoreboard.submitted {
            lines.push(format!(
                "Submitted {} as {}",
                submitted.score, submitted.player_name
            ));
        }
        if scoreboard.syncing {
            lines.push("Contacting score service...".to_string());
        }
        if !scoreboard.leaderboard.is_empty() {
            lines.push("Top scores:".to_string());
            for (i, score) in scoreboard
                .leaderboard
                .iter()
                .take(LEADERBOARD_LINES)
                .enumerate()
            {
                lines.push(format!(
                    "{:>3}. {:<20} {:>6}",
                    i + 1,
                    score.player_name,
                    score.score
                ));
            }
        }
    }

    lines
}

fn draw(out: &mut impl Write, lines: &[String], status_row: usize) -> io::Result<()> {
    for (row, line) in lines.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, row as u16))?;
        if row == 0 {
            queue!(out, style::PrintStyledContent(line.as_str().bold()))?;
        } else if row == status_row {
            queue!(out, style::PrintStyledContent(line.as_str().with(Color::Yellow)))?;
        } else {
            queue!(out, style::Print(line))?;
        }
        queue!(out, terminal::Clear(terminal::ClearType::UntilNewLine))?;
    }
    queue!(out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    out.flush()
}

struct Session<'a> {
    handle: &'a Handle,
    options: PlayOptions,
    high_scores: &'a mut dyn HighScoreStore,
    scoreboard: Scoreboard,
    updates_tx: mpsc::UnboundedSender<NetworkUpdate>,
}

impl Session<'_> {
    fn refresh_leaderboard(&mut self) {
        let Some(client) = self.options.client.clone() else {
            return;
        };
        let tx = self.updates_tx.clone();
        self.scoreboard.syncing = true;
        self.handle.spawn(async move {
            let _ = tx.send(NetworkUpdate::Leaderboard(client.top_scores().await));
        });
    }

    fn finish_game(&mut self, score: u32) {
        self.scoreboard.new_best = match record_high_score(&mut *self.high_scores, score) {
            Ok(new_best) => new_best,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save high score");
                false
            }
        };
        self.scoreboard.best = self.scoreboard.best.max(score);
        self.scoreboard.submitted = None;

        let Some(client) = self.options.client.clone() else {
            return;
        };
        let tx = self.updates_tx.clone();
        let player_name = self.options.player_name.clone();
        self.scoreboard.syncing = true;
        self.handle.spawn(async move {
            let submitted = client.submit_score(i64::from(score), &player_name).await;
            let _ = tx.send(NetworkUpdate::Submitted(submitted));
            let _ = tx.send(NetworkUpdate::Leaderboard(client.top_scores().await));
        });
    }

    fn apply(&mut self, update: NetworkUpdate) {
        match update {
            NetworkUpdate::Leaderboard(scores) => {
                self.scoreboard.leaderboard = scores;
                self.scoreboard.syncing = false;
            }
            NetworkUpdate::Submitted(submitted) => self.scoreboard.submitted = submitted,
        }
    }

    fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::GameOver { score, .. } => self.finish_game(*score),
                GameEvent::GameStarted => {
                    self.scoreboard.new_best = false;
                    self.scoreboard.submitted = None;
                }
                _ => {}
            }
        }
    }
}

/// Play until the player quits from the title screen.
///
/// `handle` is used only to spawn score service calls; this function blocks
/// the calling thread and must not be called from inside the runtime.
#[tracing::instrument(skip_all, fields(player_name = %options.player_name))]
pub fn play(
    handle: &Handle,
    options: PlayOptions,
    high_scores: &mut dyn HighScoreStore,
) -> color_eyre::Result<()> {
    let engine = StandardEngine::new(options.rules.clone())?;
    let mut game = GameLoop::new(engine, StdRng::from_entropy());

    let (updates_tx, mut updates_rx) = mpsc::unbounded_channel();
    let best = high_scores.get()?;
    let mut session = Session {
        handle,
        options,
        high_scores,
        scoreboard: Scoreboard {
            best,
            ..Scoreboard::default()
        },
        updates_tx,
    };
    session.refresh_leaderboard();

    let mut out = stdout();
    let _guard = RawModeGuard::enter(&mut out)?;
    let origin = Instant::now();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit(&key, game.state().phase) {
                tracing::info!(score = game.state().score, "Player quit");
                return Ok(());
            }
            if let Some(input) = input_for_key(key.code, game.state().phase) {
                let events = game.input(input);
                session.observe(&events);
                if input == Input::Exit {
                    session.refresh_leaderboard();
                }
            }
        }

        let events = game.frame(origin.elapsed());
        session.observe(&events);

        while let Ok(update) = updates_rx.try_recv() {
            session.apply(update);
        }

        let lines = render_lines(game.state(), &session.scoreboard);
        // Title, top border, board rows, bottom border
        let status_row = game.state().board.height.max(0) as usize + 3;
        draw(&mut out, &lines, status_row)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }
}
