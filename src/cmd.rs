//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and their handlers, from
//! task CRUD through workload editing to the validation report commands.
//! Every mutating command runs the validator first and refuses to save a
//! record with a non-empty report.

use std::path::Path;

use chrono::Local;
use clap::builder::PossibleValuesParser;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::fields::*;
use crate::store::Store;
use crate::task::{normalise_workloads, Task, WorkloadDraft};
use crate::validate::{is_valid_date_token, parse_date_token, validate_task, TaskReport};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Task name.
        name: String,
        /// Task description.
        #[arg(long)]
        desc: Option<String>,
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
        /// Who requested the task.
        #[arg(long, value_parser = PossibleValuesParser::new(REQUESTED_BY_OPTIONS.iter().copied()), default_value = REQUESTED_BY_OPTIONS[0])]
        requested_by: String,
        /// Who the task is assigned to.
        #[arg(long, value_parser = PossibleValuesParser::new(ASSIGNED_TO_OPTIONS.iter().copied()), default_value = ASSIGNED_TO_OPTIONS[0])]
        assigned_to: String,
        /// Task status.
        #[arg(long, value_parser = PossibleValuesParser::new(STATUS_OPTIONS.iter().copied()), default_value = STATUS_OPTIONS[0])]
        status: String,
        /// Project the task belongs to.
        #[arg(long, value_parser = PossibleValuesParser::new(PROJECT_OPTIONS.iter().copied()), default_value = PROJECT_OPTIONS[0])]
        project: String,
        /// Workload interval as START:END (both YYYY-MM-DD). May be repeated.
        #[arg(long = "workload")]
        workloads: Vec<String>,
    },

    /// List tasks sorted by start date.
    List {
        /// Filter by project.
        #[arg(long)]
        project: Option<String>,
        /// Filter by status.
        #[arg(long)]
        status: Option<String>,
        /// Filter by assignee.
        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// View a single task by ID or name.
    View {
        /// Task ID or name to view.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task ID or name to update.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(REQUESTED_BY_OPTIONS.iter().copied()))]
        requested_by: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(ASSIGNED_TO_OPTIONS.iter().copied()))]
        assigned_to: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(STATUS_OPTIONS.iter().copied()))]
        status: Option<String>,
        #[arg(long, value_parser = PossibleValuesParser::new(PROJECT_OPTIONS.iter().copied()))]
        project: Option<String>,
    },

    /// Delete a task (and its workloads) by ID or name.
    Delete {
        /// Task ID or name to delete.
        id: String,
    },

    /// Delete every task.
    Clear {
        /// Actually delete; without this flag only the count is shown.
        #[arg(long)]
        yes: bool,
    },

    /// Edit the workload list of a task.
    Workload {
        /// Task ID or name the workload belongs to.
        id: String,
        #[command(subcommand)]
        action: WorkloadAction,
    },

    /// Validate stored tasks and print their error reports.
    Check {
        /// Task ID or name; omit to check every task.
        id: Option<String>,
        /// Emit reports as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the categorical field options.
    Options,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum WorkloadAction {
    /// Add a workload entry. Dates default to the task's start date, or
    /// today when the task has no valid start date.
    Add {
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
    },
    /// Update a workload entry's dates.
    Update {
        /// Workload ID within the task.
        workload_id: u64,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Remove a workload entry.
    Remove {
        /// Workload ID within the task.
        workload_id: u64,
    },
}

/// Today as a calendar-day token.
fn today_token() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Parse a `START:END` workload argument.
fn parse_workload_arg(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((start, end)) => Ok((start.to_string(), end.to_string())),
        None => Err(format!("Invalid workload '{}'. Use START:END.", raw)),
    }
}

/// Print a validation report to stderr, one line per error slot.
fn print_report(report: &TaskReport) {
    let rows = [
        ("taskName", &report.task_name),
        ("description", &report.description),
        ("startDate", &report.start_date),
        ("endDate", &report.end_date),
        ("dateRange", &report.date_range),
        ("requestedBy", &report.requested_by),
        ("assignedTo", &report.assigned_to),
        ("status", &report.status),
        ("project", &report.project),
    ];
    for (key, slot) in rows {
        if let Some(msg) = slot {
            eprintln!("  {:<12} {}", key, msg);
        }
    }
    if let Some(workloads) = &report.workloads {
        for (i, we) in workloads.iter().enumerate() {
            if we.is_empty() {
                continue;
            }
            eprintln!("  workload[{}]:", i);
            let rows = [
                ("startDate", &we.start_date),
                ("endDate", &we.end_date),
                ("range", &we.range),
                ("within", &we.within),
                ("overlap", &we.overlap),
            ];
            for (key, slot) in rows {
                if let Some(msg) = slot {
                    eprintln!("    {:<10} {}", key, msg);
                }
            }
        }
    }
}

/// Validate a task and save the store, or print the report and exit without
/// saving.
fn validate_and_save(store: &Store, path: &Path, task_id: u64, done: &str) {
    let task = store.get(task_id).expect("task exists");
    let report = validate_task(task);
    if !report.is_empty() {
        eprintln!("Task {} has validation errors; not saved:", task_id);
        print_report(&report);
        std::process::exit(1);
    }
    if let Err(e) = store.save(path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!("{} task {}", done, task_id);
}

fn resolve_or_exit(store: &Store, identifier: &str) -> u64 {
    match store.resolve(identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error resolving task: {}", e);
            std::process::exit(1);
        }
    }
}

/// Add a new task to the store.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &mut Store,
    path: &Path,
    name: String,
    desc: Option<String>,
    start: Option<String>,
    end: Option<String>,
    requested_by: String,
    assigned_to: String,
    status: String,
    project: String,
    workloads: Vec<String>,
) {
    let drafts: Vec<WorkloadDraft> = workloads
        .iter()
        .map(|raw| match parse_workload_arg(raw) {
            Ok((start, end)) => WorkloadDraft {
                id: None,
                start_date: Some(start),
                end_date: Some(end),
            },
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        })
        .collect();

    let id = store.next_id();
    let mut task = Task::new(id);
    task.task_name = name;
    task.description = desc.unwrap_or_default();
    task.start_date = start.unwrap_or_default();
    task.end_date = end.unwrap_or_default();
    task.requested_by = requested_by;
    task.assigned_to = assigned_to;
    task.status = status;
    task.project = project;
    task.workloads = normalise_workloads(drafts);

    store.tasks.push(task);
    validate_and_save(store, path, id, "Added");
}

/// List tasks with optional filtering, sorted by start date ascending.
pub fn cmd_list(
    store: &Store,
    project: Option<String>,
    status: Option<String>,
    assigned_to: Option<String>,
) {
    let mut filtered: Vec<&Task> = store
        .tasks
        .iter()
        .filter(|t| {
            if let Some(ref p) = project {
                if &t.project != p {
                    return false;
                }
            }
            if let Some(ref s) = status {
                if &t.status != s {
                    return false;
                }
            }
            if let Some(ref a) = assigned_to {
                if &t.assigned_to != a {
                    return false;
                }
            }
            true
        })
        .collect();

    // Tasks without a parseable start date sort first.
    filtered.sort_by_key(|t| {
        (
            parse_date_token(&t.start_date).unwrap_or(chrono::NaiveDate::MIN),
            t.id,
        )
    });

    println!(
        "{:<5} {:<24} {:<14} {:<12} {:<11} {:<24} {}",
        "ID", "Task", "Project", "Assigned", "Status", "Dates", "Workloads"
    );
    for t in filtered {
        println!(
            "{:<5} {:<24} {:<14} {:<12} {:<11} {:<24} {}",
            t.id,
            truncate(&t.task_name, 24),
            truncate(&t.project, 14),
            truncate(&t.assigned_to, 12),
            truncate(&t.status, 11),
            format_span(&t.start_date, &t.end_date),
            t.workloads.len()
        );
    }
}

/// View detailed information about a specific task.
pub fn cmd_view(store: &Store, id: String) {
    let task_id = resolve_or_exit(store, &id);
    let Some(task) = store.get(task_id) else {
        eprintln!("Task {} not found.", task_id);
        std::process::exit(1);
    };
    println!("ID:           {}", task.id);
    println!("Task:         {}", task.task_name);
    println!("Project:      {}", task.project);
    println!("Requested By: {}", task.requested_by);
    println!("Assigned To:  {}", task.assigned_to);
    println!("Status:       {}", task.status);
    println!("Dates:        {}", format_span(&task.start_date, &task.end_date));
    println!("Description:\n{}\n", task.description);
    if task.workloads.is_empty() {
        println!("Workloads: -");
    } else {
        println!("Workloads:");
        for w in &task.workloads {
            println!("  #{:<4} {}", w.id, format_span(&w.start_date, &w.end_date));
        }
    }
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    store: &mut Store,
    path: &Path,
    id: String,
    name: Option<String>,
    desc: Option<String>,
    start: Option<String>,
    end: Option<String>,
    requested_by: Option<String>,
    assigned_to: Option<String>,
    status: Option<String>,
    project: Option<String>,
) {
    let task_id = resolve_or_exit(store, &id);
    let Some(task) = store.get_mut(task_id) else {
        eprintln!("Task {} not found.", task_id);
        std::process::exit(1);
    };
    if let Some(v) = name {
        task.task_name = v;
    }
    if let Some(v) = desc {
        task.description = v;
    }
    if let Some(v) = start {
        task.start_date = v;
    }
    if let Some(v) = end {
        task.end_date = v;
    }
    if let Some(v) = requested_by {
        task.requested_by = v;
    }
    if let Some(v) = assigned_to {
        task.assigned_to = v;
    }
    if let Some(v) = status {
        task.status = v;
    }
    if let Some(v) = project {
        task.project = v;
    }
    task.normalise();
    validate_and_save(store, path, task_id, "Updated");
}

/// Delete a task by ID or name. Its workloads go with it.
pub fn cmd_delete(store: &mut Store, path: &Path, id: String) {
    let task_id = resolve_or_exit(store, &id);
    if !store.remove(task_id) {
        eprintln!("Task {} not found.", task_id);
        std::process::exit(1);
    }
    if let Err(e) = store.save(path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!("Deleted task {}", task_id);
}

/// Delete every task, guarded behind --yes.
pub fn cmd_clear(store: &mut Store, path: &Path, yes: bool) {
    let count = store.tasks.len();
    if !yes {
        println!("Would delete {} task(s). Re-run with --yes to confirm.", count);
        return;
    }
    store.tasks.clear();
    if let Err(e) = store.save(path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!("Cleared {} task(s).", count);
}

/// Edit the workload list of a task.
pub fn cmd_workload(store: &mut Store, path: &Path, id: String, action: WorkloadAction) {
    let task_id = resolve_or_exit(store, &id);
    let Some(task) = store.get_mut(task_id) else {
        eprintln!("Task {} not found.", task_id);
        std::process::exit(1);
    };
    match action {
        WorkloadAction::Add { start, end } => {
            let fallback = if is_valid_date_token(&task.start_date) {
                task.start_date.clone()
            } else {
                today_token()
            };
            let mut drafts: Vec<WorkloadDraft> =
                task.workloads.iter().map(WorkloadDraft::from).collect();
            drafts.push(WorkloadDraft {
                id: None,
                start_date: Some(start.unwrap_or_else(|| fallback.clone())),
                end_date: Some(end.unwrap_or(fallback)),
            });
            task.workloads = normalise_workloads(drafts);
        }
        WorkloadAction::Update {
            workload_id,
            start,
            end,
        } => {
            let Some(w) = task.workloads.iter_mut().find(|w| w.id == workload_id) else {
                eprintln!("Workload {} not found on task {}.", workload_id, task_id);
                std::process::exit(1);
            };
            if let Some(v) = start {
                w.start_date = v;
            }
            if let Some(v) = end {
                w.end_date = v;
            }
        }
        WorkloadAction::Remove { workload_id } => {
            let before = task.workloads.len();
            task.workloads.retain(|w| w.id != workload_id);
            if task.workloads.len() == before {
                eprintln!("Workload {} not found on task {}.", workload_id, task_id);
                std::process::exit(1);
            }
        }
    }
    task.normalise();
    validate_and_save(store, path, task_id, "Updated");
}

/// Validate one or all stored tasks and print the reports.
/// Exits non-zero when any report is non-empty.
pub fn cmd_check(store: &Store, id: Option<String>, json: bool) {
    let targets: Vec<&Task> = match id {
        Some(identifier) => {
            let task_id = resolve_or_exit(store, &identifier);
            vec![store.get(task_id).expect("resolved id exists")]
        }
        None => store.tasks.iter().collect(),
    };

    let reports: Vec<(&Task, TaskReport)> =
        targets.into_iter().map(|t| (t, validate_task(t))).collect();
    let any_errors = reports.iter().any(|(_, r)| !r.is_empty());

    if json {
        let out: Vec<serde_json::Value> = reports
            .iter()
            .map(|(t, r)| serde_json::json!({ "id": t.id, "errors": r }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
    } else {
        for (t, report) in &reports {
            if report.is_empty() {
                println!("Task {} '{}': OK", t.id, t.task_name);
            } else {
                println!("Task {} '{}':", t.id, t.task_name);
                print_report(report);
            }
        }
    }
    if any_errors {
        std::process::exit(1);
    }
}

/// List the categorical field options.
pub fn cmd_options() {
    println!("{:<14} {}", "Requested By:", REQUESTED_BY_OPTIONS.join(" | "));
    println!("{:<14} {}", "Assigned To:", ASSIGNED_TO_OPTIONS.join(" | "));
    println!("{:<14} {}", "Status:", STATUS_OPTIONS.join(" | "));
    println!("{:<14} {}", "Project:", PROJECT_OPTIONS.join(" | "));
}

/// Generate shell completion scripts for the given shell.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Render a date pair as "start -> end", substituting "-" for blanks.
fn format_span(start: &str, end: &str) -> String {
    let start = if start.is_empty() { "-" } else { start };
    let end = if end.is_empty() { "-" } else { end };
    format!("{} -> {}", start, end)
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
