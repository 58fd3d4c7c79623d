use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use uuid::Uuid;

/// Default timeout for individual SQLite queries.
/// Prevents hung queries from blocking the daemon indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
/// Returns an error if the operation takes longer than `QUERY_TIMEOUT`.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRow {
    pub id: String,
    pub title: String,
    /// Weekly quota. The schema enforces `> 0`.
    pub desired_weekly_frequency: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalCompletionRow {
    pub id: String,
    pub goal_id: String,
    /// RFC 3339 UTC. Sole week-membership key; never updated.
    pub created_at: String,
}

/// One goal joined with its completion count inside a time range.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalWeekCountRow {
    pub id: String,
    pub title: String,
    pub desired_weekly_frequency: i64,
    pub completion_count: i64,
}

/// One completion joined with its goal title, for per-day breakdowns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompletionDetailRow {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::new_with_slow_query(data_dir, 0).await
    }

    /// Create storage with slow-query logging enabled.
    ///
    /// `slow_query_ms` is the threshold in milliseconds — queries exceeding it
    /// are logged at WARN level. Set to 0 to disable slow-query logging.
    pub async fn new_with_slow_query(data_dir: &Path, slow_query_ms: u64) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        let db_path = data_dir.join("habitd.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("src/storage/migrations")
            .run(pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // ─── Goals ──────────────────────────────────────────────────────────────

    pub async fn insert_goal(&self, title: &str, desired_weekly_frequency: i64) -> Result<GoalRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO goals (id, title, desired_weekly_frequency, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(title)
        .bind(desired_weekly_frequency)
        .bind(&now)
        .execute(&self.pool)
        .await
        .context("insert goal")?;
        self.get_goal(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("goal not found after insert"))
    }

    pub async fn get_goal(&self, id: &str) -> Result<Option<GoalRow>> {
        Ok(sqlx::query_as("SELECT * FROM goals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // ─── Completions ────────────────────────────────────────────────────────

    /// Count completions for one goal with `created_at` in `[start, end)`.
    /// Returns 0 when no rows exist.
    pub async fn count_completions(&self, goal_id: &str, start: &str, end: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM goal_completions
              WHERE goal_id = ? AND created_at >= ? AND created_at < ?",
        )
        .bind(goal_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .context("count goal completions")?;
        Ok(count)
    }

    /// Insert a completion only while the goal's completion count in
    /// `[start, end)` is below its weekly quota.
    ///
    /// Count, comparison, and insert run as one statement, so concurrent
    /// callers racing for the last unit of quota cannot both succeed — SQLite
    /// serializes writers and the losing statement affects zero rows. Returns
    /// `None` when the quota was already exhausted (nothing written).
    pub async fn insert_completion_if_under_quota(
        &self,
        goal_id: &str,
        now: DateTime<Utc>,
        start: &str,
        end: &str,
    ) -> Result<Option<GoalCompletionRow>> {
        let id = Uuid::new_v4().to_string();
        let created_at = now.to_rfc3339();
        let result = with_timeout(async {
            Ok(sqlx::query(
                "INSERT INTO goal_completions (id, goal_id, created_at)
                 SELECT ?, ?, ?
                  WHERE (SELECT COUNT(*) FROM goal_completions
                          WHERE goal_id = ? AND created_at >= ? AND created_at < ?)
                      < (SELECT desired_weekly_frequency FROM goals WHERE id = ?)",
            )
            .bind(&id)
            .bind(goal_id)
            .bind(&created_at)
            .bind(goal_id)
            .bind(start)
            .bind(end)
            .bind(goal_id)
            .execute(&self.pool)
            .await
            .context("insert goal completion")?)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let row = self
            .get_completion(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("completion not found after insert"))?;
        Ok(Some(row))
    }

    /// Unconditional insert with an explicit timestamp. No quota check —
    /// callers that enforce the quota go through
    /// [`Storage::insert_completion_if_under_quota`] instead.
    pub async fn insert_completion(
        &self,
        goal_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<GoalCompletionRow> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO goal_completions (id, goal_id, created_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(goal_id)
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .context("insert goal completion")?;
        self.get_completion(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("completion not found after insert"))
    }

    pub async fn get_completion(&self, id: &str) -> Result<Option<GoalCompletionRow>> {
        Ok(sqlx::query_as("SELECT * FROM goal_completions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // ─── Aggregation ────────────────────────────────────────────────────────

    /// Every goal with its completion count inside `[start, end)`, creation
    /// order. LEFT JOIN — goals without completions appear with count 0.
    pub async fn list_goals_with_week_counts(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<GoalWeekCountRow>> {
        with_timeout(async {
            Ok(sqlx::query_as(
                "SELECT g.id, g.title, g.desired_weekly_frequency,
                        COUNT(c.id) AS completion_count
                   FROM goals g
                   LEFT JOIN goal_completions c
                     ON c.goal_id = g.id AND c.created_at >= ? AND c.created_at < ?
                  GROUP BY g.id
                  ORDER BY g.created_at ASC, g.id ASC",
            )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .context("list goals with week counts")?)
        })
        .await
    }

    /// All completions with `created_at` in `[start, end)` joined with their
    /// goal titles, newest first.
    pub async fn list_completions_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<CompletionDetailRow>> {
        with_timeout(async {
            Ok(sqlx::query_as(
                "SELECT c.id, c.goal_id, g.title, c.created_at
                   FROM goal_completions c
                   JOIN goals g ON g.id = c.goal_id
                  WHERE c.created_at >= ? AND c.created_at < ?
                  ORDER BY c.created_at DESC, c.id DESC",
            )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .context("list completions in range")?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::week_containing;
    use tempfile::TempDir;

    async fn make_storage() -> (Storage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).await.unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn count_is_zero_for_goal_without_completions() {
        let (storage, _dir) = make_storage().await;
        let goal = storage.insert_goal("Meditate", 5).await.unwrap();
        let week = week_containing(Utc::now());
        let count = storage
            .count_completions(&goal.id, &week.start_rfc3339(), &week.end_rfc3339())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn conditional_insert_stops_at_quota() {
        let (storage, _dir) = make_storage().await;
        let goal = storage.insert_goal("Run", 2).await.unwrap();
        let week = week_containing(Utc::now());
        let (start, end) = (week.start_rfc3339(), week.end_rfc3339());

        for _ in 0..2 {
            let inserted = storage
                .insert_completion_if_under_quota(&goal.id, Utc::now(), &start, &end)
                .await
                .unwrap();
            assert!(inserted.is_some());
        }

        let rejected = storage
            .insert_completion_if_under_quota(&goal.id, Utc::now(), &start, &end)
            .await
            .unwrap();
        assert!(rejected.is_none());
        assert_eq!(
            storage
                .count_completions(&goal.id, &start, &end)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn conditional_insert_ignores_other_weeks() {
        let (storage, _dir) = make_storage().await;
        let goal = storage.insert_goal("Write", 1).await.unwrap();
        let week = week_containing(Utc::now());

        // A completion from the previous week does not consume this week's quota.
        storage
            .insert_completion(&goal.id, week.start - chrono::Duration::days(3))
            .await
            .unwrap();

        let inserted = storage
            .insert_completion_if_under_quota(
                &goal.id,
                Utc::now(),
                &week.start_rfc3339(),
                &week.end_rfc3339(),
            )
            .await
            .unwrap();
        assert!(inserted.is_some());
    }

    #[tokio::test]
    async fn week_counts_use_outer_join_semantics() {
        let (storage, _dir) = make_storage().await;
        let done = storage.insert_goal("Read", 3).await.unwrap();
        let untouched = storage.insert_goal("Swim", 2).await.unwrap();
        storage
            .insert_completion(&done.id, Utc::now())
            .await
            .unwrap();

        let week = week_containing(Utc::now());
        let rows = storage
            .list_goals_with_week_counts(&week.start_rfc3339(), &week.end_rfc3339())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        let by_id = |id: &str| rows.iter().find(|r| r.id == id).unwrap();
        assert_eq!(by_id(&done.id).completion_count, 1);
        assert_eq!(by_id(&untouched.id).completion_count, 0);
    }
}
