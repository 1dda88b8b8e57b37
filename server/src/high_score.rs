//! Local best-score persistence for the terminal client.
//!
//! The game only needs a single get/set pair, so storage sits behind
//! [`HighScoreStore`] and can be swapped for [`MemoryHighScoreStore`] in tests.

use color_eyre::eyre::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DATA_DIR: &str = "snake-arcade";
const HIGH_SCORE_FILE: &str = "high_score.toml";

pub trait HighScoreStore {
    fn get(&self) -> color_eyre::Result<u32>;
    fn set(&mut self, score: u32) -> color_eyre::Result<()>;
}

/// Persist `score` if it beats the stored best. Returns whether it did.
pub fn record_high_score(store: &mut dyn HighScoreStore, score: u32) -> color_eyre::Result<bool> {
    let best = store.get()?;
    if score <= best {
        return Ok(false);
    }

    store.set(score)?;
    tracing::info!(score, previous = best, "New high score");
    Ok(true)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryHighScoreStore {
    best: u32,
}

impl HighScoreStore for MemoryHighScoreStore {
    fn get(&self) -> color_eyre::Result<u32> {
        Ok(self.best)
    }

    fn set(&mut self, score: u32) -> color_eyre::Result<()> {
        self.best = score;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    #[serde(default)]
    best: u32,
}

/// Stores the best score in a small TOML file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.local/share/snake-arcade/high_score.toml` on Linux
    pub fn default_location() -> color_eyre::Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not find data directory"))?
            .join(DATA_DIR);
        Ok(Self::new(dir.join(HIGH_SCORE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn get(&self) -> color_eyre::Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let contents = std::fs::read_to_string(&self.path)
            .wrap_err_with(|| format!("Failed to read high score: {}", self.path.display()))?;
        let file: HighScoreFile = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse high score: {}", self.path.display()))?;

        Ok(file.best)
    }

    fn set(&mut self, score: u32) -> color_eyre::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .wrap_err_with(|| format!("Failed to create data directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(&HighScoreFile { best: score })
            .wrap_err("Failed to serialize high score")?;
        std::fs::write(&self.path, contents)
            .wrap_err_with(|| format!("Failed to write high score: {}", self.path.display()))?;

        Ok(())
    }
}
