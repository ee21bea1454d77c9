// ABOUTME: Menu loop and selection dispatch for the todo CLI
// ABOUTME: Reads selections from stdin and routes them to task actions

use std::io::{self, BufRead};
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use colored::*;
use thiserror::Error;
use todo_tasks::{StorageError, TaskStore};

use crate::actions;

const MENU: &str = "1) Today's tasks\n2) Week's tasks\n3) All tasks\n4) Missed tasks\n5) Add task\n6) Delete task\n0) Exit";

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Input error: {0}")]
    Input(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl MenuError {
    /// Recoverable errors are reported and the menu loop continues; anything
    /// else propagates out and terminates the process.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MenuError::Validation(_) | MenuError::Input(_))
    }
}

/// One menu choice. The dispatch is a fixed mapping from selection to action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Exit,
    Today,
    Week,
    All,
    Missed,
    Add,
    Delete,
}

impl FromStr for Selection {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, MenuError> {
        match s.trim() {
            "0" => Ok(Selection::Exit),
            "1" => Ok(Selection::Today),
            "2" => Ok(Selection::Week),
            "3" => Ok(Selection::All),
            "4" => Ok(Selection::Missed),
            "5" => Ok(Selection::Add),
            "6" => Ok(Selection::Delete),
            other => Err(MenuError::Input(format!(
                "'{}' is not a menu option (expected 0-6)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// The interactive loop: print the menu, read a selection, dispatch, repeat
/// until the user selects Exit (or stdin closes).
pub async fn run(store: &TaskStore) -> Result<(), MenuError> {
    loop {
        println!("{}", MENU);

        let Some(line) = read_input()? else {
            println!("Bye!");
            return Ok(());
        };
        println!();

        match dispatch(store, &line).await {
            Ok(LoopState::Running) => {}
            Ok(LoopState::Terminated) => {
                println!("Bye!");
                return Ok(());
            }
            Err(err) if err.is_recoverable() => {
                eprintln!("{}", err.to_string().red());
                println!();
            }
            Err(err) => return Err(err),
        }
    }
}

/// Perform the action for one input line and report the resulting loop state.
pub async fn dispatch(store: &TaskStore, line: &str) -> Result<LoopState, MenuError> {
    let selection: Selection = line.parse()?;
    let today = Local::now().date_naive();

    match selection {
        Selection::Exit => return Ok(LoopState::Terminated),
        Selection::Today => print!("{}", actions::today_report(store, today).await?),
        Selection::Week => print!("{}", actions::week_report(store, today).await?),
        Selection::All => print!("{}", actions::all_report(store).await?),
        Selection::Missed => print!("{}", actions::missed_report(store, today).await?),
        Selection::Add => add_flow(store).await?,
        Selection::Delete => delete_flow(store, today).await?,
    }

    Ok(LoopState::Running)
}

async fn add_flow(store: &TaskStore) -> Result<(), MenuError> {
    let description = prompt("Enter task")?;
    let deadline = prompt("Enter deadline")?;

    actions::add_task(store, &description, &deadline).await?;

    println!("{}", "The task has been added!".green());
    println!();
    Ok(())
}

async fn delete_flow(store: &TaskStore, today: NaiveDate) -> Result<(), MenuError> {
    let candidates = store.tasks_due_by(today).await?;
    if candidates.is_empty() {
        println!("{}", "Nothing to delete".yellow());
        println!();
        return Ok(());
    }

    println!("Choose the number of the task you want to delete:");
    print!("{}", actions::render_dated_listing(&candidates, "Nothing to delete"));

    let index = read_input()?
        .ok_or_else(|| MenuError::Input("Unexpected end of input".to_string()))?;
    let task = actions::select_candidate(&candidates, &index)?;

    store.delete_task(task.id).await?;

    println!("{}", "The task has been deleted!".green());
    println!();
    Ok(())
}

/// Read one trimmed line from stdin. `None` means stdin has closed.
fn read_input() -> Result<Option<String>, MenuError> {
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt(text: &str) -> Result<String, MenuError> {
    println!("{}", text);
    read_input()?.ok_or_else(|| MenuError::Input("Unexpected end of input".to_string()))
}
