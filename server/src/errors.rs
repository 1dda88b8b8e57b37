use std::fmt::{Debug, Display};

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[derive(Debug)]
pub struct ServerError<R: IntoResponse>(pub(crate) color_eyre::Report, pub(crate) R);

pub type ServerResult<S, F> = Result<S, ServerError<F>>;

impl<R: IntoResponse> Display for ServerError<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl<R: IntoResponse + Debug> IntoResponse for ServerError<R> {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = ?self, "Request Error");

        self.1.into_response()
    }
}

/// JSON error body: `{ "message": "..." }`
#[derive(Debug)]
pub struct ErrorMessage {
    pub status: StatusCode,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorMessage {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(serde_json::json!({ "message": self.message })),
        )
            .into_response()
    }
}

impl<E> From<E> for ServerError<ErrorMessage>
where
    E: Into<color_eyre::Report>,
{
    fn from(err: E) -> Self {
        let report = err.into();
        let message = report.to_string();
        ServerError(
            report,
            ErrorMessage::new(StatusCode::INTERNAL_SERVER_ERROR, message),
        )
    }
}

pub(crate) trait WithStatus<T> {
    fn with_status(self, status: StatusCode) -> Result<T, ServerError<ErrorMessage>>;
}

impl<T> WithStatus<T> for Result<T, color_eyre::Report> {
    fn with_status(self, status: StatusCode) -> Result<T, ServerError<ErrorMessage>> {
        match self {
            Ok(val) => Ok(val),
            Err(err) => {
                let message = err.to_string();
                Err(ServerError(err, ErrorMessage::new(status, message)))
            }
        }
    }
}
