//! Categorical field vocabularies for task metadata.
//!
//! These lists populate the CLI choices for the four select-style fields and
//! supply their defaults (the first entry of each list). The validator does
//! not depend on their contents, only on the selected value being non-empty.

/// Who asked for the task.
pub const REQUESTED_BY_OPTIONS: &[&str] = &["Manager A", "Manager B", "Manager C"];

/// Who the task is assigned to.
pub const ASSIGNED_TO_OPTIONS: &[&str] =
    &["Resource A", "Resource B", "Resource C", "Resource D"];

/// Task completion status.
pub const STATUS_OPTIONS: &[&str] = &["Not Started", "In Progress", "Blocked", "Done"];

/// Project the task belongs to.
pub const PROJECT_OPTIONS: &[&str] = &["Project Alpha", "Project Beta", "Project Gamma"];
