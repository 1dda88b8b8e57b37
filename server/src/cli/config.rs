use color_eyre::eyre::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::score::DEFAULT_PLAYER_NAME;
use crate::score_client::DEFAULT_API_URL;

const CONFIG_DIR: &str = "snake-arcade";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "snake.log";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
}

impl CliConfig {
    /// Get the config directory path (~/.config/snake-arcade on Linux)
    pub fn config_dir() -> color_eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not find config directory"))?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    pub fn config_path() -> color_eyre::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Where the client writes logs when `RUST_LOG` is set
    pub fn log_path() -> color_eyre::Result<PathBuf> {
        let dir = dirs::data_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not find data directory"))?
            .join(CONFIG_DIR);
        Ok(dir.join(LOG_FILE))
    }

    /// Load config from the default location, falling back to defaults
    pub fn load() -> color_eyre::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> color_eyre::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> color_eyre::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> color_eyre::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).wrap_err_with(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).wrap_err("Failed to serialize config")?;

        std::fs::write(path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the score service base URL
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn player_name(&self) -> &str {
        self.player_name.as_deref().unwrap_or(DEFAULT_PLAYER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, CliConfig::default());
        assert_eq!(config.api_url(), "http://localhost:5000");
        assert_eq!(config.player_name(), "Anonymous");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = CliConfig {
            api_url: Some("https://scores.example.com".to_string()),
            player_name: Some("Ann".to_string()),
        };

        config.save_to(&path).unwrap();
        let loaded = CliConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.api_url(), "https://scores.example.com");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "player_name = \"Bo\"\n").unwrap();

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(config.player_name(), "Bo");
        assert_eq!(config.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "player_name = [").unwrap();

        assert!(CliConfig::load_from(&path).is_err());
    }
}
