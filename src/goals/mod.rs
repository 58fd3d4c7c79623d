//! Weekly completion accounting.
//!
//! Three small services share the storage layer:
//!
//! - [`GoalRegistry`] — goal creation with input validation.
//! - [`CompletionAccountant`] — the quota-enforced completion write path.
//! - [`SummaryAggregator`] — read-only weekly reporting.
//!
//! None of them log or retry; every failure is returned to the caller as a
//! [`GoalError`] carrying enough context to map to a response code.

pub mod accountant;
pub mod model;
pub mod registry;
pub mod summary;

pub use accountant::CompletionAccountant;
pub use model::{
    CompletionRecord, DayCompletions, Goal, GoalCompletion, GoalProgress, WeekSummary,
};
pub use registry::GoalRegistry;
pub use summary::SummaryAggregator;

/// Errors returned by the goal services.
///
/// `QuotaExceeded` is an expected outcome of a correct request, not a
/// transient failure — callers handle it, nothing retries it.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("invalid goal: {0}")]
    Validation(String),
    #[error("goal not found: {0}")]
    NotFound(String),
    #[error("weekly quota reached for goal {goal_id}: {quota} completions per week")]
    QuotaExceeded { goal_id: String, quota: i64 },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
