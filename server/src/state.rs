use color_eyre::eyre::eyre;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;

use crate::config::{ServerConfig, Storage};
use crate::models::score::{MemoryScoreStore, PgScoreStore, ScoreStore};

#[derive(Clone)]
pub struct AppState {
    pub scores: Arc<dyn ScoreStore>,
}

impl AppState {
    pub fn new(scores: Arc<dyn ScoreStore>) -> Self {
        Self { scores }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryScoreStore::new()))
    }

    pub async fn from_config(config: &ServerConfig) -> color_eyre::Result<Self> {
        match &config.storage {
            Storage::Postgres { database_url } => {
                let pool = setup_db_pool(database_url).await?;
                Ok(Self::new(Arc::new(PgScoreStore::new(pool))))
            }
            Storage::Memory => {
                tracing::warn!("Using in-memory score storage; scores are lost on restart");
                Ok(Self::in_memory())
            }
        }
    }
}

#[tracing::instrument(err, skip(database_url))]
pub async fn setup_db_pool(database_url: &str) -> color_eyre::Result<PgPool> {
    const MIGRATION_LOCK_ID: i64 = 0x5A_5A_5A_5A_5A_5A_5A;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_ID)
        .execute(&pool)
        .await?;

    sqlx::migrate!("../migrations").run(&pool).await?;

    let unlocked: Option<bool> = sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_ID)
        .fetch_one(&pool)
        .await?;

    match unlocked {
        Some(true) => tracing::info!("Migration lock unlocked"),
        Some(false) => tracing::info!("Failed to unlock migration lock"),
        None => return Err(eyre!("Failed to unlock migration lock")),
    }

    Ok(pool)
}
