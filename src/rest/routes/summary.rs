// rest/routes/summary.rs — Weekly reporting routes.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error_response;
use crate::AppContext;

pub async fn week_summary(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.summary_aggregator.week_summary().await {
        Ok(summary) => Ok(Json(json!({ "summary": summary }))),
        Err(e) => Err(error_response(e)),
    }
}

pub async fn pending_goals(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.summary_aggregator.pending_goals().await {
        Ok(goals) => Ok(Json(json!({ "pendingGoals": goals }))),
        Err(e) => Err(error_response(e)),
    }
}
