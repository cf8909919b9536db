use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("bad arguments: {0}")]
    BadArguments(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownTool(_) => StatusCode::NOT_FOUND,
            Self::BadArguments(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "tool call failed");
        }

        let body = json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
