//! HTTP client for the score service
//!
//! Game front-ends use the lenient calls, which never fail: errors are logged
//! and reported as an empty leaderboard or a missing record. The `try_`
//! variants surface the error for callers that should fail loudly.

use color_eyre::eyre::{Context as _, eyre};
use reqwest::Client;
use serde::Serialize;

use crate::models::score::Score;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Serialize)]
struct SubmitScoreRequest<'a> {
    score: i64,
    #[serde(rename = "playerName")]
    player_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct ScoreClient {
    client: Client,
    base_url: String,
}

impl ScoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn scores_url(&self) -> String {
        format!("{}/api/scores", self.base_url)
    }

    /// Top scores, or an empty list if the service can't be reached.
    pub async fn top_scores(&self) -> Vec<Score> {
        match self.try_top_scores().await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching high scores");
                vec![]
            }
        }
    }

    /// Submit a score; `None` if the service rejected it or can't be reached.
    pub async fn submit_score(&self, score: i64, player_name: &str) -> Option<Score> {
        match self.try_submit_score(score, player_name).await {
            Ok(created) => Some(created),
            Err(e) => {
                tracing::warn!(score, error = %e, "Error submitting score");
                None
            }
        }
    }

    pub async fn try_top_scores(&self) -> color_eyre::Result<Vec<Score>> {
        let response = self
            .client
            .get(self.scores_url())
            .send()
            .await
            .wrap_err("Failed to fetch scores")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Failed to fetch scores: {} - {}", status, body));
        }

        response
            .json()
            .await
            .wrap_err("Failed to parse scores response")
    }

    pub async fn try_submit_score(
        &self,
        score: i64,
        player_name: &str,
    ) -> color_eyre::Result<Score> {
        let response = self
            .client
            .post(self.scores_url())
            .json(&SubmitScoreRequest { score, player_name })
            .send()
            .await
            .wrap_err("Failed to submit score")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Failed to submit score: {} - {}", status, body));
        }

        response
            .json()
            .await
            .wrap_err("Failed to parse submitted score")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{routes::routes, state::AppState};

    /// Serve the real router on an ephemeral port.
    async fn spawn_service() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes(AppState::in_memory());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ScoreClient::new("http://localhost:5000/");
        assert_eq!(client.scores_url(), "http://localhost:5000/api/scores");
    }

    #[tokio::test]
    async fn test_submit_and_fetch() {
        let client = ScoreClient::new(spawn_service().await);

        let created = client.submit_score(120, "Ann").await.unwrap();
        assert_eq!(created.score, 120);
        assert_eq!(created.player_name, "Ann");

        client.submit_score(40, "").await.unwrap();

        let scores = client.top_scores().await;
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], created);
        assert_eq!(scores[1].player_name, "Anonymous");
    }

    #[tokio::test]
    async fn test_unreachable_service_degrades() {
        // Nothing listens on the discard port
        let client = ScoreClient::new("http://127.0.0.1:9");

        assert!(client.top_scores().await.is_empty());
        assert!(client.submit_score(10, "Ann").await.is_none());
        assert!(client.try_top_scores().await.is_err());
    }
}
