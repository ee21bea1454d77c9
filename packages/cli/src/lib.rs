// ABOUTME: Interactive menu loop and actions for the todo CLI
// ABOUTME: Maps menu selections to task store queries and console output

pub mod actions;
pub mod menu;

pub use menu::{run, LoopState, MenuError, Selection};
