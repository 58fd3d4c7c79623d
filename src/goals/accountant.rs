//! The quota-enforced completion write path.

use std::sync::Arc;

use chrono::Utc;

use crate::storage::Storage;
use crate::week::week_containing;

use super::{GoalCompletion, GoalError};

#[derive(Clone)]
pub struct CompletionAccountant {
    storage: Arc<Storage>,
}

impl CompletionAccountant {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Register one completion for `goal_id`, dated now.
    ///
    /// The current-week count check and the insert happen in a single
    /// conditional statement at the storage layer, so two concurrent calls
    /// cannot both claim the last unit of quota — the loser's insert affects
    /// zero rows and surfaces here as [`GoalError::QuotaExceeded`]. Exactly
    /// one row is written on success, none on failure.
    pub async fn register_completion(&self, goal_id: &str) -> Result<GoalCompletion, GoalError> {
        let now = Utc::now();
        let week = week_containing(now);

        let goal = self
            .storage
            .get_goal(goal_id)
            .await?
            .ok_or_else(|| GoalError::NotFound(goal_id.to_string()))?;

        let inserted = self
            .storage
            .insert_completion_if_under_quota(
                goal_id,
                now,
                &week.start_rfc3339(),
                &week.end_rfc3339(),
            )
            .await?;

        match inserted {
            Some(row) => Ok(row.into()),
            None => Err(GoalError::QuotaExceeded {
                goal_id: goal.id,
                quota: goal.desired_weekly_frequency,
            }),
        }
    }

    /// Current-week completion count for one goal. Zero when no rows exist.
    pub async fn completions_this_week(&self, goal_id: &str) -> Result<i64, GoalError> {
        let week = week_containing(Utc::now());
        let count = self
            .storage
            .count_completions(goal_id, &week.start_rfc3339(), &week.end_rfc3339())
            .await?;
        Ok(count)
    }
}
