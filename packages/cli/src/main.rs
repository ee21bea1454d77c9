use std::process;

use clap::Parser;
use colored::*;
use todo_tasks::{connect, TaskStore};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Interactive to-do list manager backed by a local SQLite database")]
#[command(version)]
struct Cli {
    /// Base name of the database file (stored as <DATABASE>.db)
    #[arg(long, default_value = "todo")]
    database: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Menu output owns stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect(format!("{}.db", cli.database)).await?;
    let store = TaskStore::new(pool);

    todo_cli::run(&store).await?;

    Ok(())
}
