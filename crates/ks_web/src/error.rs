use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ks_core::Error;
use serde_json::json;
use tracing::error;

/// Maps pipeline errors onto HTTP responses with a JSON body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::UnknownCity(_) => StatusCode::BAD_REQUEST,
            Error::EmptyDateRange { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("❌ Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
