// ABOUTME: Task storage layer using SQLite
// ABOUTME: Handles inserts, date-filtered queries, and deletes for tasks

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;

use crate::types::{Task, TaskCreateInput};

/// Storage format for deadlines. Lexicographic comparison of this form in SQL
/// matches calendar order, so date predicates can be plain `=` / `<=`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Task not found")]
    NotFound,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// SQLite-backed store for tasks. Wraps the process-wide connection pool;
/// constructed once at startup and passed to the menu loop.
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new task and return the stored record with its assigned id.
    pub async fn create_task(&self, input: TaskCreateInput) -> StorageResult<Task> {
        let deadline = input.deadline.format(DATE_FORMAT).to_string();

        let result = sqlx::query("INSERT INTO tasks (description, deadline) VALUES (?, ?)")
            .bind(&input.description)
            .bind(&deadline)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let id = result.last_insert_rowid();
        debug!("Created task {} due {}", id, deadline);

        Ok(Task {
            id,
            description: input.description,
            deadline: input.deadline,
        })
    }

    /// Tasks whose deadline is exactly `day`, in insertion order.
    pub async fn tasks_for_day(&self, day: NaiveDate) -> StorageResult<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT id, description, deadline FROM tasks WHERE deadline = ? ORDER BY id",
        )
        .bind(day.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_task).collect()
    }

    /// Every task, ascending by deadline; equal deadlines keep insertion order.
    pub async fn all_tasks(&self) -> StorageResult<Vec<Task>> {
        let rows =
            sqlx::query("SELECT id, description, deadline FROM tasks ORDER BY deadline, id")
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_task).collect()
    }

    /// Tasks due on or before `day` (missed or due today), in storage order.
    pub async fn tasks_due_by(&self, day: NaiveDate) -> StorageResult<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT id, description, deadline FROM tasks WHERE deadline <= ? ORDER BY id",
        )
        .bind(day.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_task).collect()
    }

    /// Delete a task by id. Callers must only pass ids obtained from an
    /// immediately preceding query; a missing row is reported as `NotFound`.
    pub async fn delete_task(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        debug!("Deleted task {}", id);
        Ok(())
    }
}

/// Convert a database row to a Task
fn row_to_task(row: &SqliteRow) -> StorageResult<Task> {
    let deadline_str: String = row.try_get("deadline")?;
    let deadline = NaiveDate::parse_from_str(&deadline_str, DATE_FORMAT)
        .map_err(|_| StorageError::Database(format!("Invalid deadline value: {}", deadline_str)))?;

    Ok(Task {
        id: row.try_get("id")?,
        description: row.try_get("description")?,
        deadline,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> TaskStore {
        let options = SqliteConnectOptions::from_str(":memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        TaskStore::new(pool)
    }

    fn day(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, DATE_FORMAT).unwrap()
    }

    async fn add(store: &TaskStore, description: &str, deadline: &str) -> Task {
        store
            .create_task(TaskCreateInput {
                description: description.to_string(),
                deadline: day(deadline),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list_all_round_trips() {
        let store = setup_test_db().await;

        add(&store, "Write report", "2024-01-10").await;

        let tasks = store.all_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Write report");
        assert_eq!(tasks[0].deadline, day("2024-01-10"));
    }

    #[tokio::test]
    async fn test_all_tasks_sorted_by_deadline_then_insertion() {
        let store = setup_test_db().await;

        add(&store, "Later", "2024-03-05").await;
        add(&store, "Earlier", "2024-01-02").await;
        add(&store, "Tied first", "2024-02-01").await;
        add(&store, "Tied second", "2024-02-01").await;

        let tasks = store.all_tasks().await.unwrap();
        let descriptions: Vec<&str> = tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Earlier", "Tied first", "Tied second", "Later"]
        );

        for pair in tasks.windows(2) {
            assert!(pair[0].deadline <= pair[1].deadline);
        }
    }

    #[tokio::test]
    async fn test_tasks_for_day_matches_exact_date_only() {
        let store = setup_test_db().await;

        add(&store, "Due that day", "2024-01-10").await;
        add(&store, "Day before", "2024-01-09").await;
        add(&store, "Day after", "2024-01-11").await;
        add(&store, "Also due that day", "2024-01-10").await;

        let tasks = store.tasks_for_day(day("2024-01-10")).await.unwrap();
        let descriptions: Vec<&str> = tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Due that day", "Also due that day"]);
    }

    #[tokio::test]
    async fn test_tasks_due_by_returns_exact_subset() {
        let store = setup_test_db().await;

        add(&store, "Long overdue", "2023-12-01").await;
        add(&store, "Due today", "2024-01-10").await;
        add(&store, "Due tomorrow", "2024-01-11").await;

        let tasks = store.tasks_due_by(day("2024-01-10")).await.unwrap();
        let descriptions: Vec<&str> = tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Long overdue", "Due today"]);

        for task in &tasks {
            assert!(task.deadline <= day("2024-01-10"));
        }
    }

    #[tokio::test]
    async fn test_delete_removes_only_selected_task() {
        let store = setup_test_db().await;

        add(&store, "Keep me", "2024-01-01").await;
        let doomed = add(&store, "Delete me", "2024-01-02").await;

        let candidates = store.tasks_due_by(day("2024-01-10")).await.unwrap();
        assert_eq!(candidates.len(), 2);

        store.delete_task(doomed.id).await.unwrap();

        let remaining = store.all_tasks().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].description, "Keep me");

        let candidates = store.tasks_due_by(day("2024-01-10")).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].description, "Keep me");
    }

    #[tokio::test]
    async fn test_delete_missing_task_is_not_found() {
        let store = setup_test_db().await;

        let result = store.delete_task(9999).await;
        match result {
            Err(StorageError::NotFound) => {}
            other => panic!("Expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_duplicate_description_and_deadline_allowed() {
        let store = setup_test_db().await;

        let first = add(&store, "Water plants", "2024-04-01").await;
        let second = add(&store, "Water plants", "2024-04-01").await;
        assert_ne!(first.id, second.id);

        let tasks = store.all_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_store_queries_return_empty() {
        let store = setup_test_db().await;

        assert!(store.all_tasks().await.unwrap().is_empty());
        assert!(store.tasks_for_day(day("2024-01-10")).await.unwrap().is_empty());
        assert!(store.tasks_due_by(day("2024-01-10")).await.unwrap().is_empty());
    }
}
