use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task tracker CLI.
/// Storage defaults to ~/.workplan/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "wp", version, about = "Task tracker with workload validation")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
