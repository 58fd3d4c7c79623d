// rest/routes/completions.rs — Quota-enforced completion route.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error_response;
use crate::AppContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompletionRequest {
    pub goal_id: String,
}

pub async fn register_completion(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<RegisterCompletionRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match ctx.accountant.register_completion(&body.goal_id).await {
        Ok(completion) => Ok((
            StatusCode::CREATED,
            Json(json!({ "goalCompletion": completion })),
        )),
        Err(e) => Err(error_response(e)),
    }
}
