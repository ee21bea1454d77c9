// ABOUTME: Task data model and SQLite persistence for the todo CLI
// ABOUTME: Provides the task store plus connection and migration setup

pub mod db;
pub mod storage;
pub mod types;

pub use db::connect;
pub use storage::{StorageError, StorageResult, TaskStore};
pub use types::{Task, TaskCreateInput};
