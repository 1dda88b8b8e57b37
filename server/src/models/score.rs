use async_trait::async_trait;
use chrono::{DateTime, Utc};
use color_eyre::eyre::Context as _;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name stored when a submission has no usable player name.
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// How many entries the leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 10;

// Score record, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Score {
    #[serde(rename = "_id")]
    pub score_id: Uuid,
    pub score: i64,
    #[serde(rename = "playerName")]
    pub player_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// For creating a new score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScore {
    pub score: i64,
    pub player_name: String,
}

impl CreateScore {
    pub fn new(score: i64, player_name: Option<&str>) -> Self {
        Self {
            score,
            player_name: normalize_player_name(player_name),
        }
    }
}

/// Blank or missing names become [`DEFAULT_PLAYER_NAME`].
pub fn normalize_player_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_PLAYER_NAME.to_string(),
    }
}

/// Storage for the single score collection.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Highest scores first, at most `limit` of them.
    async fn top_scores(&self, limit: usize) -> color_eyre::Result<Vec<Score>>;

    async fn create_score(&self, data: CreateScore) -> color_eyre::Result<Score>;
}

#[derive(Debug, Clone)]
pub struct PgScoreStore {
    pool: PgPool,
}

impl PgScoreStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn top_scores(&self, limit: usize) -> color_eyre::Result<Vec<Score>> {
        let scores = sqlx::query_as::<_, Score>(
            r#"
            SELECT
                score_id,
                score,
                player_name,
                created_at
            FROM scores
            ORDER BY score DESC, created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .wrap_err("Failed to fetch scores from database")?;

        Ok(scores)
    }

    async fn create_score(&self, data: CreateScore) -> color_eyre::Result<Score> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO scores (
                score_id,
                score,
                player_name
            )
            VALUES ($1, $2, $3)
            RETURNING
                score_id,
                score,
                player_name,
                created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.score)
        .bind(&data.player_name)
        .fetch_one(&self.pool)
        .await
        .wrap_err("Failed to create score in database")?;

        Ok(score)
    }
}

/// Process-local store, used by tests and database-less runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: Arc<RwLock<Vec<Score>>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.scores.read().await.len()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn top_scores(&self, limit: usize) -> color_eyre::Result<Vec<Score>> {
        let mut scores = self.scores.read().await.clone();
        scores.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        scores.truncate(limit);
        Ok(scores)
    }

    async fn create_score(&self, data: CreateScore) -> color_eyre::Result<Score> {
        let score = Score {
            score_id: Uuid::new_v4(),
            score: data.score,
            player_name: data.player_name,
            created_at: Utc::now(),
        };
        self.scores.write().await.push(score.clone());
        Ok(score)
    }
}
