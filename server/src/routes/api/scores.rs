use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use color_eyre::eyre::eyre;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    errors::{ErrorMessage, ServerError, ServerResult, WithStatus},
    models::score::{CreateScore, LEADERBOARD_SIZE},
    state::AppState,
};

/// Request body for submitting a score
#[derive(Debug, Deserialize)]
pub struct CreateScoreRequest {
    pub score: Option<Value>,
    #[serde(rename = "playerName")]
    pub player_name: Option<String>,
}

/// Whole numbers, given as JSON numbers or numeric strings.
fn parse_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    }
}

fn whole_number(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// GET /api/scores - Top scores, highest first
pub async fn list_scores(
    State(state): State<AppState>,
) -> ServerResult<impl IntoResponse, ErrorMessage> {
    let scores = state.scores.top_scores(LEADERBOARD_SIZE).await?;
    Ok(Json(scores))
}

/// POST /api/scores - Record a score
///
/// Scores are taken at face value; only the shape of the body is checked.
pub async fn create_score(
    State(state): State<AppState>,
    payload: Result<Json<CreateScoreRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse, ErrorMessage> {
    let Json(request) = payload.map_err(|rejection| {
        let message = rejection.body_text();
        ServerError(
            eyre!("Invalid score payload: {message}"),
            ErrorMessage::new(StatusCode::BAD_REQUEST, message),
        )
    })?;

    let raw_score = request
        .score
        .ok_or_else(|| eyre!("score is required"))
        .with_status(StatusCode::BAD_REQUEST)?;
    let score = parse_score(&raw_score)
        .ok_or_else(|| eyre!("score must be a whole number"))
        .with_status(StatusCode::BAD_REQUEST)?;

    let created = state
        .scores
        .create_score(CreateScore::new(score, request.player_name.as_deref()))
        .await?;

    tracing::info!(
        score_id = %created.score_id,
        score = created.score,
        player_name = %created.player_name,
        "Score recorded"
    );

    Ok((StatusCode::CREATED, Json(created)))
}
