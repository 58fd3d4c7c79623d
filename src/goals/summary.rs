// SPDX-License-Identifier: MIT
//! Read-only weekly reporting.
//!
//! Aggregation uses outer-join semantics: a goal with no completions this
//! week still appears in the summary with a count of zero.

use std::sync::Arc;

use anyhow::Context as _;

use crate::storage::{CompletionDetailRow, Storage};
use crate::week::current_week;

use super::{CompletionRecord, DayCompletions, GoalError, GoalProgress, WeekSummary};

#[derive(Clone)]
pub struct SummaryAggregator {
    storage: Arc<Storage>,
}

impl SummaryAggregator {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Build the current-week report: totals, per-goal progress, and the
    /// per-day completion breakdown (newest day first).
    pub async fn week_summary(&self) -> Result<WeekSummary, GoalError> {
        let week = current_week();
        let (start, end) = (week.start_rfc3339(), week.end_rfc3339());

        let goals: Vec<GoalProgress> = self
            .storage
            .list_goals_with_week_counts(&start, &end)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let completed = goals.iter().map(|g| g.completion_count).sum();
        let total = goals.iter().map(|g| g.desired_weekly_frequency).sum();

        let completions = self.storage.list_completions_between(&start, &end).await?;
        let goals_per_day = group_by_day(completions)?;

        Ok(WeekSummary {
            completed,
            total,
            goals,
            goals_per_day,
        })
    }

    /// Every goal with its current-week count — what a client renders as
    /// "still completable this week". Same outer-join rows as the summary.
    pub async fn pending_goals(&self) -> Result<Vec<GoalProgress>, GoalError> {
        let week = current_week();
        let rows = self
            .storage
            .list_goals_with_week_counts(&week.start_rfc3339(), &week.end_rfc3339())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Group completions (already sorted newest first) into per-day buckets.
fn group_by_day(rows: Vec<CompletionDetailRow>) -> Result<Vec<DayCompletions>, GoalError> {
    let mut days: Vec<DayCompletions> = Vec::new();
    for row in rows {
        let date = calendar_day(&row.created_at)?;
        let record = CompletionRecord {
            id: row.id,
            goal_id: row.goal_id,
            title: row.title,
            completed_at: row.created_at,
        };
        match days.last_mut() {
            Some(day) if day.date == date => day.completions.push(record),
            _ => days.push(DayCompletions {
                date,
                completions: vec![record],
            }),
        }
    }
    Ok(days)
}

fn calendar_day(created_at: &str) -> Result<String, GoalError> {
    let ts = chrono::DateTime::parse_from_rfc3339(created_at)
        .with_context(|| format!("malformed completion timestamp: {created_at}"))?;
    Ok(ts.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: &str, created_at: &str) -> CompletionDetailRow {
        CompletionDetailRow {
            id: id.to_string(),
            goal_id: "g1".to_string(),
            title: "Read".to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn groups_consecutive_rows_by_calendar_day() {
        let rows = vec![
            detail("c3", "2024-09-11T08:00:00+00:00"),
            detail("c2", "2024-09-10T21:00:00+00:00"),
            detail("c1", "2024-09-10T07:30:00+00:00"),
        ];
        let days = group_by_day(rows).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-09-11");
        assert_eq!(days[0].completions.len(), 1);
        assert_eq!(days[1].date, "2024-09-10");
        assert_eq!(days[1].completions.len(), 2);
    }

    #[test]
    fn empty_week_yields_no_days() {
        assert!(group_by_day(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn malformed_timestamp_is_a_storage_error() {
        let err = group_by_day(vec![detail("c1", "not-a-timestamp")]).unwrap_err();
        assert!(matches!(err, GoalError::Storage(_)));
    }
}
