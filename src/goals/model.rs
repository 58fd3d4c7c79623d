//! API-facing goal and summary shapes.
//!
//! JSON field names are camelCase — the daemon serves browser clients that
//! consume these shapes directly.

use serde::{Deserialize, Serialize};

use crate::storage::{GoalCompletionRow, GoalRow, GoalWeekCountRow};

/// A user-defined habit with a weekly completion quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    /// Maximum completions allowed per calendar week. Always >= 1.
    pub desired_weekly_frequency: i64,
    pub created_at: String,
}

/// A timestamped record that a goal was satisfied once. Write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCompletion {
    pub id: String,
    pub goal_id: String,
    pub created_at: String,
}

/// One goal paired with its current-week completion count.
///
/// Goals with zero completions this week appear with `completion_count = 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub id: String,
    pub title: String,
    pub desired_weekly_frequency: i64,
    pub completion_count: i64,
}

/// A single completion inside the per-day breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub completed_at: String,
}

/// All completions of one calendar day within the current week.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCompletions {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub completions: Vec<CompletionRecord>,
}

/// The weekly report: totals, per-goal progress, and a per-day breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    /// Completions registered this week across all goals.
    pub completed: i64,
    /// Sum of desired weekly frequencies across all goals.
    pub total: i64,
    /// Every goal with its current-week count, creation order.
    pub goals: Vec<GoalProgress>,
    /// Current-week completions grouped by day, newest day first.
    pub goals_per_day: Vec<DayCompletions>,
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            desired_weekly_frequency: row.desired_weekly_frequency,
            created_at: row.created_at,
        }
    }
}

impl From<GoalCompletionRow> for GoalCompletion {
    fn from(row: GoalCompletionRow) -> Self {
        Self {
            id: row.id,
            goal_id: row.goal_id,
            created_at: row.created_at,
        }
    }
}

impl From<GoalWeekCountRow> for GoalProgress {
    fn from(row: GoalWeekCountRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            desired_weekly_frequency: row.desired_weekly_frequency,
            completion_count: row.completion_count,
        }
    }
}
