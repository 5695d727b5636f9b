use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Model service error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unexpected model output: {0}")]
    Normalization(String),

    #[error("Malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable tag reported next to the message so callers can tell failure classes apart.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Validation(_) | Error::Body(_) => "validation",
            Error::Upstream(_) | Error::Reqwest(_) => "upstream",
            Error::Normalization(_) | Error::Json(_) => "normalization",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Body(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let kind = self.kind();
        let error_message = self.to_string();

        if status.is_server_error() {
            tracing::error!(kind, error = %error_message, "request failed");
        }

        let body = Json(json!({ "error": error_message, "kind": kind }));
        (status, body).into_response()
    }
}
