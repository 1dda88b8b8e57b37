use color_eyre::eyre::{Context as _, eyre};

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres { database_url: String },
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres { .. } => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Score service settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub storage: Storage,
}

impl ServerConfig {
    pub fn from_env() -> color_eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> color_eyre::Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port.parse().wrap_err("Invalid PORT")?,
            None => DEFAULT_PORT,
        };

        let in_memory = lookup("SCORES_IN_MEMORY").is_some_and(|v| v == "true");
        let storage = if in_memory {
            Storage::Memory
        } else {
            let database_url = lookup("DATABASE_URL")
                .ok_or_else(|| eyre!("DATABASE_URL must be set (or SCORES_IN_MEMORY=true)"))?;
            Storage::Postgres { database_url }
        };

        Ok(Self { port, storage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_port_5000() {
        let config =
            ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/scores")]))
                .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(
            config.storage,
            Storage::Postgres {
                database_url: "postgres://localhost/scores".to_string()
            }
        );
    }

    #[test]
    fn test_in_memory_needs_no_database() {
        let config =
            ServerConfig::from_lookup(lookup(&[("SCORES_IN_MEMORY", "true"), ("PORT", "8080")]))
                .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, Storage::Memory);
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        assert!(ServerConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("SCORES_IN_MEMORY", "true"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }
}
