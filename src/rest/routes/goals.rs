// rest/routes/goals.rs — Goal creation route.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error_response;
use crate::AppContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    pub desired_weekly_frequency: i64,
}

pub async fn create_goal(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match ctx
        .goal_registry
        .create_goal(&body.title, body.desired_weekly_frequency)
        .await
    {
        Ok(goal) => Ok((StatusCode::CREATED, Json(json!({ "goal": goal })))),
        Err(e) => Err(error_response(e)),
    }
}
