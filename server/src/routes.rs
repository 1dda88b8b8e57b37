use axum::routing::get;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub mod api;

pub fn routes(app_state: AppState) -> axum::Router {
    axum::Router::new()
        .route(
            "/api/scores",
            get(api::scores::list_scores).post(api::scores::create_score),
        )
        // Browser clients are served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Bind `0.0.0.0:{port}` and serve until the process is stopped.
pub async fn run_server(router: axum::Router, port: u16) -> color_eyre::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!(port, "Score service listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
