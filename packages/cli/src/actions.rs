// ABOUTME: Menu actions and output rendering for the todo CLI
// ABOUTME: Builds the task listings and validates user-supplied input

use chrono::{Days, NaiveDate};
use todo_tasks::{Task, TaskCreateInput, TaskStore};

use crate::menu::MenuError;

/// Expected form of user-entered deadlines.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Parse a user-entered deadline, rejecting anything that is not a valid
/// calendar date in `YYYY-MM-DD` form.
pub fn parse_deadline(text: &str) -> Result<NaiveDate, MenuError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DEADLINE_FORMAT).map_err(|_| {
        MenuError::Validation(format!(
            "'{}' is not a valid deadline (expected YYYY-MM-DD)",
            text
        ))
    })
}

/// Validate and store a new task.
pub async fn add_task(
    store: &TaskStore,
    description: &str,
    deadline_text: &str,
) -> Result<Task, MenuError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(MenuError::Validation(
            "Task description cannot be empty".to_string(),
        ));
    }

    let deadline = parse_deadline(deadline_text)?;

    let task = store
        .create_task(TaskCreateInput {
            description: description.to_string(),
            deadline,
        })
        .await?;

    Ok(task)
}

/// Header plus day listing for today.
pub async fn today_report(store: &TaskStore, today: NaiveDate) -> Result<String, MenuError> {
    let tasks = store.tasks_for_day(today).await?;

    let mut out = today.format("Today %d %b").to_string();
    out.push('\n');
    out.push_str(&render_day_listing(&tasks));
    Ok(out)
}

/// Day headers and listings for the next seven days starting today.
pub async fn week_report(store: &TaskStore, today: NaiveDate) -> Result<String, MenuError> {
    let mut out = String::new();
    for offset in 0..7 {
        let day = today + Days::new(offset);
        let tasks = store.tasks_for_day(day).await?;

        out.push_str(&day.format("%A %d %b").to_string());
        out.push('\n');
        out.push_str(&render_day_listing(&tasks));
    }
    Ok(out)
}

/// Every stored task, ordered by deadline.
pub async fn all_report(store: &TaskStore) -> Result<String, MenuError> {
    let tasks = store.all_tasks().await?;

    let mut out = String::from("All tasks:\n");
    out.push_str(&render_dated_listing(&tasks, "Nothing to do!"));
    Ok(out)
}

/// Tasks due today or earlier.
pub async fn missed_report(store: &TaskStore, today: NaiveDate) -> Result<String, MenuError> {
    let tasks = store.tasks_due_by(today).await?;

    let mut out = String::from("Missed tasks:\n");
    out.push_str(&render_dated_listing(&tasks, "Nothing is missed!"));
    Ok(out)
}

/// Resolve a 1-based index typed by the user against the delete-candidate
/// list. Anything non-numeric or out of bounds is an input error.
pub fn select_candidate<'a>(tasks: &'a [Task], index_text: &str) -> Result<&'a Task, MenuError> {
    let index_text = index_text.trim();
    let index: usize = index_text.parse().map_err(|_| {
        MenuError::Input(format!("'{}' is not a valid task number", index_text))
    })?;

    if index == 0 || index > tasks.len() {
        return Err(MenuError::Input(format!(
            "Task number {} is out of range (1-{})",
            index,
            tasks.len()
        )));
    }

    Ok(&tasks[index - 1])
}

/// Numbered descriptions only, one per line; used for Today and Week.
pub fn render_day_listing(tasks: &[Task]) -> String {
    let mut out = String::new();
    if tasks.is_empty() {
        out.push_str("Nothing to do!\n");
    } else {
        for (n, task) in tasks.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", n + 1, task.description));
        }
    }
    out.push('\n');
    out
}

/// Numbered `description. dd Mon` lines; used for All, Missed, and the
/// delete-candidate list.
pub fn render_dated_listing(tasks: &[Task], empty_message: &str) -> String {
    let mut out = String::new();
    if tasks.is_empty() {
        out.push_str(empty_message);
        out.push('\n');
    } else {
        for (n, task) in tasks.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}. {}\n",
                n + 1,
                task.description,
                task.deadline.format("%d %b")
            ));
        }
    }
    out.push('\n');
    out
}
