// ABOUTME: Database connection management for the todo CLI
// ABOUTME: Opens the SQLite pool, applies pragmas, and runs migrations

use std::path::Path;
use std::time::Duration;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::storage::{StorageError, StorageResult};

/// Open the database at `path`, creating the file and parent directory if
/// needed, and prepare the schema. The returned pool is the process-wide
/// store connection, held for the process lifetime.
pub async fn connect(path: impl AsRef<Path>) -> StorageResult<SqlitePool> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
    }

    let database_url = format!("sqlite:{}", path.display());

    if !sqlx::Sqlite::database_exists(&database_url)
        .await
        .map_err(StorageError::Sqlx)?
    {
        debug!("Creating database at: {}", database_url);
        sqlx::Sqlite::create_database(&database_url)
            .await
            .map_err(StorageError::Sqlx)?;
    }

    // Single-user tool: one connection, opened once at startup.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(StorageError::Migration)?;

    info!("Database connection established");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::storage::TaskStore;
    use crate::types::TaskCreateInput;

    #[tokio::test]
    async fn test_connect_creates_file_and_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.db");

        let pool = connect(&path).await.unwrap();
        let store = TaskStore::new(pool.clone());
        store
            .create_task(TaskCreateInput {
                description: "Persist me".to_string(),
                deadline: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            })
            .await
            .unwrap();
        pool.close().await;

        assert!(path.exists());

        let pool = connect(&path).await.unwrap();
        let store = TaskStore::new(pool);
        let tasks = store.all_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "Persist me");
        assert_eq!(
            tasks[0].deadline,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[tokio::test]
    async fn test_connect_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("todo.db");

        let pool = connect(&path).await.unwrap();
        pool.close().await;

        assert!(path.exists());
    }
}
