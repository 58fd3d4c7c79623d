pub mod completions;
pub mod goals;
pub mod health;
pub mod summary;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::goals::GoalError;

/// Map a core error to an HTTP rejection.
///
/// QuotaExceeded is an expected outcome (409), not a server fault; only
/// storage failures are logged here.
pub(crate) fn error_response(err: GoalError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        GoalError::Validation(_) => StatusCode::BAD_REQUEST,
        GoalError::NotFound(_) => StatusCode::NOT_FOUND,
        GoalError::QuotaExceeded { .. } => StatusCode::CONFLICT,
        GoalError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(err = %err, "request failed on storage");
    }
    (status, Json(json!({ "error": err.to_string() })))
}
