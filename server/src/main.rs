use arcade::{
    config::ServerConfig,
    routes::{routes, run_server},
    setup::{setup_sentry, setup_tracing},
    state::AppState,
};
use tracing::info;

fn main() -> color_eyre::Result<()> {
    // Sentry must be up before the runtime so panics on worker threads are captured
    let _sentry_guard = setup_sentry();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { run_application().await })
}

async fn run_application() -> color_eyre::Result<()> {
    color_eyre::install()?;
    setup_tracing()?;

    let config = ServerConfig::from_env()?;
    info!(port = config.port, storage = config.storage.as_str(), "Starting score service");

    let app_state = AppState::from_config(&config).await?;

    run_server(routes(app_state), config.port).await
}
