use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

/// Terminal verdicts of the booking admission pipeline.
///
/// Every admission call resolves to either a confirmation or exactly one of
/// these; none of them leaves a lock held or a partial booking behind.
#[derive(Debug, thiserror::Error)]
pub enum RejectionReason {
    /// Malformed input. The caller must change the request before retrying.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown show id.
    #[error("show {0} not found")]
    ShowNotFound(i64),

    /// At least one requested seat already belongs to a confirmed booking.
    /// Retryable with different seats.
    #[error("seats unavailable: {}", .conflicting.join(", "))]
    SeatsUnavailable { conflicting: Vec<String> },

    /// Ledger failure. Retryable after a delay with the same seats.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RejectionReason {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ShowNotFound(_) => StatusCode::NOT_FOUND,
            Self::SeatsUnavailable { .. } => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RejectionReason {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Conflicting seats ride along so clients can tell "pick new seats"
        // apart from "retry the same ones later".
        let body = match &self {
            Self::SeatsUnavailable { conflicting } => json!({
                "success": false,
                "error": self.to_string(),
                "conflicting_seats": conflicting,
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
