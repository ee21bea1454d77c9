// ABOUTME: Task type definitions
// ABOUTME: Structures for stored tasks and task creation input

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single to-do item. `id` is assigned by the store on creation and never
/// changes; records are never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreateInput {
    pub description: String,
    pub deadline: NaiveDate,
}
