//! # wp - Task Tracker CLI
//!
//! A single-user task tracker with date-range validation and workload
//! scheduling checks.
//!
//! ## Key Features
//!
//! - **Tasks with date ranges**: every task carries a start/end date pair in
//!   `YYYY-MM-DD` form plus categorical metadata (requester, assignee,
//!   status, project).
//! - **Workloads**: effort sub-intervals nested within a task's date range,
//!   checked for containment and pairwise overlap (touching endpoints count
//!   as overlap).
//! - **Validation-gated writes**: a record with validation errors is
//!   reported and never saved.
//! - **Local File Storage**: one JSON file; absent or corrupt storage is
//!   treated as an empty collection.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! wp add "Implement user authentication" --desc "OAuth flow" \
//!     --start 2024-01-10 --end 2024-01-31 --workload 2024-01-10:2024-01-14
//!
//! # List tasks
//! wp list
//!
//! # Validate everything in the store
//! wp check
//! ```
//!
//! Data is stored locally in `~/.workplan/tasks.json`; pass `--db` to use a
//! different file.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod store;
pub mod task;
pub mod validate;

use cli::Cli;
use cmd::*;
use store::Store;

fn main() {
    let cli = Cli::parse();

    // Commands that never touch the store.
    match &cli.command {
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        Commands::Options => {
            cmd_options();
            return;
        }
        _ => {}
    }

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".workplan");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create workplan directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("tasks.json")
    });

    let mut store = Store::load(&db_path);

    match cli.command {
        Commands::Completions { .. } => unreachable!("handled above"),
        Commands::Options => unreachable!("handled above"),

        Commands::Add {
            name, desc, start, end, requested_by, assigned_to, status, project, workloads,
        } => cmd_add(
            &mut store, &db_path, name, desc, start, end, requested_by, assigned_to, status,
            project, workloads,
        ),

        Commands::List { project, status, assigned_to } =>
            cmd_list(&store, project, status, assigned_to),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Update {
            id, name, desc, start, end, requested_by, assigned_to, status, project,
        } => cmd_update(
            &mut store, &db_path, id, name, desc, start, end, requested_by, assigned_to, status,
            project,
        ),

        Commands::Delete { id } => cmd_delete(&mut store, &db_path, id),

        Commands::Clear { yes } => cmd_clear(&mut store, &db_path, yes),

        Commands::Workload { id, action } => cmd_workload(&mut store, &db_path, id, action),

        Commands::Check { id, json } => cmd_check(&store, id, json),
    }
}
