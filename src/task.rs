//! Task data structures and workload normalisation.
//!
//! This module defines the core `Task` struct representing a single work item
//! with its date range, categorical metadata, and nested workload entries,
//! plus the normalisation step that turns loosely-shaped workload input into
//! the canonical form the validator and the store operate on.

use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A work item spanning a date range, with categorical metadata and a list
/// of workload sub-intervals owned exclusively by this task.
///
/// Dates are kept as `YYYY-MM-DD` tokens rather than parsed values so that
/// malformed input stays representable and can be reported by the validator
/// instead of failing at the parse boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub task_name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub requested_by: String,
    pub assigned_to: String,
    pub status: String,
    pub project: String,
    #[serde(default)]
    pub workloads: Vec<Workload>,
}

/// An effort sub-interval within its parent task's date range.
///
/// The id is unique within the owning task's workload list, not globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    pub id: u64,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// Loosely-shaped workload input: every field optional.
///
/// Partial or legacy-shaped entries deserialize into this and are brought
/// into canonical form by [`normalise_workloads`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadDraft {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl From<&Workload> for WorkloadDraft {
    fn from(w: &Workload) -> Self {
        WorkloadDraft {
            id: Some(w.id),
            start_date: Some(w.start_date.clone()),
            end_date: Some(w.end_date.clone()),
        }
    }
}

impl Task {
    /// Create a task with the given id and the default field values:
    /// free-text fields empty, each categorical field set to the first entry
    /// of its option list, no workloads.
    pub fn new(id: u64) -> Self {
        Task {
            id,
            task_name: String::new(),
            description: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            requested_by: REQUESTED_BY_OPTIONS[0].to_string(),
            assigned_to: ASSIGNED_TO_OPTIONS[0].to_string(),
            status: STATUS_OPTIONS[0].to_string(),
            project: PROJECT_OPTIONS[0].to_string(),
            workloads: Vec::new(),
        }
    }

    /// Re-normalise this task's workload list in place.
    pub fn normalise(&mut self) {
        let drafts: Vec<WorkloadDraft> = self.workloads.iter().map(WorkloadDraft::from).collect();
        self.workloads = normalise_workloads(drafts);
    }
}

/// Bring a list of workload drafts into canonical form.
///
/// Entries without an id are assigned one from a monotonic counter starting
/// past the highest id already present in the list; missing dates default to
/// the empty string. Order is preserved and nothing is ever rejected.
pub fn normalise_workloads(drafts: Vec<WorkloadDraft>) -> Vec<Workload> {
    let mut next = drafts
        .iter()
        .filter_map(|d| d.id)
        .max()
        .map_or(1, |m| m + 1);
    drafts
        .into_iter()
        .map(|d| {
            let id = match d.id {
                Some(id) => id,
                None => {
                    let id = next;
                    next += 1;
                    id
                }
            };
            Workload {
                id,
                start_date: d.start_date.unwrap_or_default(),
                end_date: d.end_date.unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: Option<u64>, start: Option<&str>, end: Option<&str>) -> WorkloadDraft {
        WorkloadDraft {
            id,
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn normalise_empty_input_yields_empty_list() {
        assert!(normalise_workloads(Vec::new()).is_empty());
    }

    #[test]
    fn normalise_fills_missing_ids_and_dates() {
        let out = normalise_workloads(vec![
            draft(Some(7), Some("2024-01-01"), None),
            draft(None, None, Some("2024-01-05")),
            draft(None, None, None),
        ]);
        assert_eq!(out[0], Workload { id: 7, start_date: "2024-01-01".into(), end_date: "".into() });
        // Generated ids start past the highest existing id and stay distinct.
        assert_eq!(out[1].id, 8);
        assert_eq!(out[2].id, 9);
        assert_eq!(out[1].start_date, "");
        assert_eq!(out[1].end_date, "2024-01-05");
    }

    #[test]
    fn normalise_preserves_order_and_existing_entries() {
        let out = normalise_workloads(vec![
            draft(Some(3), Some("2024-02-01"), Some("2024-02-02")),
            draft(Some(1), Some("2024-02-03"), Some("2024-02-04")),
        ]);
        assert_eq!(out.iter().map(|w| w.id).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn absent_workloads_field_deserialises_to_empty_list() {
        let json = r#"{
            "id": 1, "taskName": "t", "description": "d",
            "startDate": "2024-01-01", "endDate": "2024-01-02",
            "requestedBy": "Manager A", "assignedTo": "Resource A",
            "status": "Not Started", "project": "Project Alpha"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.workloads.is_empty());
    }

    #[test]
    fn partial_workload_entries_normalise_through_drafts() {
        let drafts: Vec<WorkloadDraft> =
            serde_json::from_str(r#"[{"startDate": "2024-03-01"}, {"id": 5}]"#).unwrap();
        let out = normalise_workloads(drafts);
        assert_eq!(out[0].id, 6);
        assert_eq!(out[0].start_date, "2024-03-01");
        assert_eq!(out[0].end_date, "");
        assert_eq!(out[1].id, 5);
    }
}
