//! Goal creation. Validation only — no quota logic lives here.

use std::sync::Arc;

use crate::storage::Storage;

use super::{Goal, GoalError};

#[derive(Clone)]
pub struct GoalRegistry {
    storage: Arc<Storage>,
}

impl GoalRegistry {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Create a goal with the given title and weekly quota.
    ///
    /// The title must contain at least one non-whitespace character and the
    /// quota must be a positive integer; anything else is rejected with
    /// [`GoalError::Validation`] before touching storage.
    pub async fn create_goal(
        &self,
        title: &str,
        desired_weekly_frequency: i64,
    ) -> Result<Goal, GoalError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GoalError::Validation("title must not be empty".into()));
        }
        if desired_weekly_frequency < 1 {
            return Err(GoalError::Validation(
                "desired weekly frequency must be a positive integer".into(),
            ));
        }

        let row = self
            .storage
            .insert_goal(title, desired_weekly_frequency)
            .await?;
        Ok(row.into())
    }
}
