//! Process-wide observability setup shared by the binaries.

use color_eyre::eyre::Context as _;
use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SERVER_FILTER: &str = "arcade=info,tower_http=info";

/// Initialise Sentry when `SENTRY_DSN` is set. Keep the guard alive for the
/// life of the process.
pub fn setup_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

/// Hierarchical span output on stdout, filtered by `RUST_LOG`.
pub fn setup_tracing() -> color_eyre::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_SERVER_FILTER)),
        )
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true),
        )
        .try_init()
        .wrap_err("Failed to initialise tracing")?;

    Ok(())
}

/// The terminal owns stdout and stderr while a game is on screen, so the
/// client only logs when `RUST_LOG` is set, and then into `log_path`.
/// Without a log path (no data dir on this host) logging is skipped.
pub fn setup_client_tracing(log_path: Option<&Path>) -> color_eyre::Result<()> {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return Ok(());
    };
    let Some(log_path) = log_path else {
        eprintln!("RUST_LOG is set but there is no data directory to log into");
        return Ok(());
    };

    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .wrap_err_with(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .try_init()
        .wrap_err("Failed to initialise tracing")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_tracing_without_log_path() {
        assert!(setup_client_tracing(None).is_ok());
    }
}
