//! Validation engine for tasks and their workload intervals.
//!
//! This module is the consistency core of the tracker: it classifies
//! calendar-day tokens, checks task-level required fields and date ordering,
//! checks each workload's own range and containment within the parent task's
//! span, and detects pairwise overlaps between a task's workloads. Problems
//! are reported, never thrown: the only failure mode is a non-empty
//! [`TaskReport`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::{Task, Workload};

/// Parse a calendar-day token of the exact shape `YYYY-MM-DD`.
///
/// Returns `Some` only when the string is ten ASCII characters with dashes
/// at positions 4 and 7, digits everywhere else, and names a real calendar
/// date (so `2024-02-30` is rejected). The shape check matters: chrono alone
/// would accept unpadded forms like `2024-2-3`.
pub fn parse_date_token(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    if !b
        .iter()
        .enumerate()
        .all(|(i, &c)| i == 4 || i == 7 || c.is_ascii_digit())
    {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Whether a string is a well-formed calendar-day token.
pub fn is_valid_date_token(s: &str) -> bool {
    parse_date_token(s).is_some()
}

/// Per-task error report.
///
/// Each populated slot holds a human-readable message; `workloads` is present
/// only when at least one workload has an error, and is parallel to the
/// task's workload list (clean indices carry an empty [`WorkloadReport`]).
/// An empty report means the record is acceptable for storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workloads: Option<Vec<WorkloadReport>>,
}

/// Per-workload error report, one slot per error kind.
///
/// Both containment violations share the single `within` slot; when a
/// workload starts before and ends after the task range, the end-side check
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap: Option<String>,
}

impl TaskReport {
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.date_range.is_none()
            && self.requested_by.is_none()
            && self.assigned_to.is_none()
            && self.status.is_none()
            && self.project.is_none()
            && self.workloads.is_none()
    }
}

impl WorkloadReport {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.range.is_none()
            && self.within.is_none()
            && self.overlap.is_none()
    }
}

/// Validate a task and its workload list, producing a full error report.
///
/// Pure and deterministic: same input, same report. A malformed date
/// short-circuits only the checks that need a valid date (range,
/// containment, overlap) while still producing its own message.
pub fn validate_task(task: &Task) -> TaskReport {
    let mut report = TaskReport::default();

    if task.task_name.trim().is_empty() {
        report.task_name = Some("Task Name is required.".into());
    }
    if task.description.trim().is_empty() {
        report.description = Some("Description is required.".into());
    }

    let task_start = parse_date_token(&task.start_date);
    let task_end = parse_date_token(&task.end_date);
    if task_start.is_none() {
        report.start_date = Some("Valid Start Date is required.".into());
    }
    if task_end.is_none() {
        report.end_date = Some("Valid End Date is required.".into());
    }
    if let (Some(start), Some(end)) = (task_start, task_end) {
        if start > end {
            report.date_range = Some("Task Start Date must be <= End Date.".into());
        }
    }

    if task.requested_by.is_empty() {
        report.requested_by = Some("Requested By is required.".into());
    }
    if task.assigned_to.is_empty() {
        report.assigned_to = Some("Assigned To is required.".into());
    }
    if task.status.is_empty() {
        report.status = Some("Status is required.".into());
    }
    if task.project.is_empty() {
        report.project = Some("Project is required.".into());
    }

    let mut workload_reports: Vec<WorkloadReport> = Vec::with_capacity(task.workloads.len());
    for w in &task.workloads {
        let mut we = WorkloadReport::default();
        let start = parse_date_token(&w.start_date);
        let end = parse_date_token(&w.end_date);
        if start.is_none() {
            we.start_date = Some("Valid Start Date required.".into());
        }
        if end.is_none() {
            we.end_date = Some("Valid End Date required.".into());
        }
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                we.range = Some("Workload Start Date must be <= End Date.".into());
            } else {
                // Containment is only judged against task dates that are
                // themselves valid.
                if let Some(task_start) = task_start {
                    if start < task_start {
                        we.within = Some("Workload must be within Task date range.".into());
                    }
                }
                if let Some(task_end) = task_end {
                    if end > task_end {
                        we.within = Some("Workload must be within Task date range.".into());
                    }
                }
            }
        }
        workload_reports.push(we);
    }

    mark_overlaps(&task.workloads, &mut workload_reports);

    if workload_reports.iter().any(|we| !we.is_empty()) {
        report.workloads = Some(workload_reports);
    }

    report
}

/// Detect pairwise overlaps among the internally valid workloads and mark
/// both members of each overlapping pair.
///
/// Closed-interval policy: intervals sharing an endpoint overlap. Workloads
/// with malformed or reversed dates are excluded here; they already carry
/// their own errors.
fn mark_overlaps(workloads: &[Workload], reports: &mut [WorkloadReport]) {
    let mut spans: Vec<(usize, NaiveDate, NaiveDate)> = workloads
        .iter()
        .enumerate()
        .filter_map(|(i, w)| {
            let start = parse_date_token(&w.start_date)?;
            let end = parse_date_token(&w.end_date)?;
            (start <= end).then_some((i, start, end))
        })
        .collect();
    // Stable sort: ties keep list order.
    spans.sort_by_key(|&(_, start, _)| start);

    // Adjacent pairs in start-sorted order suffice: an overlap between
    // non-adjacent intervals implies one with an interval between them.
    for pair in spans.windows(2) {
        let (prev_idx, _, prev_end) = pair[0];
        let (cur_idx, cur_start, _) = pair[1];
        if cur_start <= prev_end {
            reports[prev_idx].overlap = Some("Overlaps another workload.".into());
            reports[cur_idx].overlap = Some("Overlaps another workload.".into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workload(id: u64, start: &str, end: &str) -> Workload {
        Workload {
            id,
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    fn valid_task() -> Task {
        let mut t = Task::new(1);
        t.task_name = "Ship release".into();
        t.description = "Cut and publish the release.".into();
        t.start_date = "2024-01-01".into();
        t.end_date = "2024-01-31".into();
        t
    }

    #[test]
    fn date_token_classification() {
        assert!(is_valid_date_token("2024-01-31"));
        assert!(is_valid_date_token("2024-02-29")); // leap year
        assert!(!is_valid_date_token("2023-02-29"));
        assert!(!is_valid_date_token("2024-02-30"));
        assert!(!is_valid_date_token("2024-13-01"));
        assert!(!is_valid_date_token("2024-00-10"));
        assert!(!is_valid_date_token(""));
        assert!(!is_valid_date_token("2024-1-03")); // unpadded
        assert!(!is_valid_date_token("24-01-03"));
        assert!(!is_valid_date_token("2024/01/03"));
        assert!(!is_valid_date_token(" 2024-01-03"));
        assert!(!is_valid_date_token("2024-01-03 "));
        assert!(!is_valid_date_token("2024-01-0a"));
    }

    #[test]
    fn tokens_compare_by_calendar_order() {
        let a = parse_date_token("2024-09-30").unwrap();
        let b = parse_date_token("2024-10-01").unwrap();
        assert!(a < b);
    }

    #[test]
    fn fully_valid_task_yields_empty_report() {
        let mut t = valid_task();
        t.workloads = vec![
            workload(1, "2024-01-02", "2024-01-05"),
            workload(2, "2024-01-06", "2024-01-10"),
        ];
        let report = validate_task(&t);
        assert!(report.is_empty(), "unexpected errors: {report:?}");
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let mut t = valid_task();
        t.task_name = "   ".into();
        t.description = String::new();
        t.requested_by = String::new();
        t.assigned_to = String::new();
        t.status = String::new();
        t.project = String::new();
        let report = validate_task(&t);
        assert_eq!(report.task_name.as_deref(), Some("Task Name is required."));
        assert_eq!(report.description.as_deref(), Some("Description is required."));
        assert_eq!(report.requested_by.as_deref(), Some("Requested By is required."));
        assert_eq!(report.assigned_to.as_deref(), Some("Assigned To is required."));
        assert_eq!(report.status.as_deref(), Some("Status is required."));
        assert_eq!(report.project.as_deref(), Some("Project is required."));
    }

    #[test]
    fn missing_and_malformed_task_dates_are_reported() {
        let mut t = valid_task();
        t.start_date = String::new();
        t.end_date = "2024-02-30".into();
        let report = validate_task(&t);
        assert_eq!(report.start_date.as_deref(), Some("Valid Start Date is required."));
        assert_eq!(report.end_date.as_deref(), Some("Valid End Date is required."));
        // A malformed date never produces a false range result.
        assert!(report.date_range.is_none());
    }

    #[test]
    fn reversed_task_dates_yield_single_range_error() {
        let mut t = valid_task();
        t.start_date = "2024-02-10".into();
        t.end_date = "2024-02-01".into();
        let report = validate_task(&t);
        assert!(report.start_date.is_none());
        assert!(report.end_date.is_none());
        assert_eq!(
            report.date_range.as_deref(),
            Some("Task Start Date must be <= End Date.")
        );
    }

    #[test]
    fn categorical_values_are_not_checked_for_membership() {
        let mut t = valid_task();
        t.status = "Some Future Status".into();
        assert!(validate_task(&t).is_empty());
    }

    #[test]
    fn workload_reversed_range_is_reported() {
        let mut t = valid_task();
        t.workloads = vec![workload(1, "2024-01-20", "2024-01-10")];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        let we = &ws[0];
        assert_eq!(
            we.range.as_deref(),
            Some("Workload Start Date must be <= End Date.")
        );
        // Containment is not judged for an internally inconsistent range.
        assert!(we.within.is_none());
    }

    #[test]
    fn workload_outside_task_range_is_reported() {
        let mut t = valid_task();
        t.start_date = "2024-01-10".into();
        t.end_date = "2024-01-20".into();
        t.workloads = vec![workload(1, "2024-01-05", "2024-01-12")];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        let we = &ws[0];
        assert_eq!(
            we.within.as_deref(),
            Some("Workload must be within Task date range.")
        );
    }

    #[test]
    fn workload_past_task_end_is_reported() {
        let mut t = valid_task();
        t.workloads = vec![workload(1, "2024-01-20", "2024-02-05")];
        let report = validate_task(&t);
        assert!(report.workloads.unwrap()[0].within.is_some());
    }

    #[test]
    fn containment_skipped_against_invalid_task_date() {
        let mut t = valid_task();
        t.start_date = "not-a-date".into();
        t.workloads = vec![workload(1, "2023-12-01", "2024-01-05")];
        let report = validate_task(&t);
        // Only the valid task end participates; the workload ends inside it,
        // so no workload errors at all.
        assert!(report.workloads.is_none());
        assert!(report.start_date.is_some());
    }

    #[test]
    fn workload_date_errors_short_circuit_derived_checks() {
        let mut t = valid_task();
        t.workloads = vec![
            workload(1, "2024-02-30", ""),
            workload(2, "2024-01-02", "2024-01-05"),
        ];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        assert_eq!(ws[0].start_date.as_deref(), Some("Valid Start Date required."));
        assert_eq!(ws[0].end_date.as_deref(), Some("Valid End Date required."));
        assert!(ws[0].range.is_none());
        assert!(ws[0].within.is_none());
        assert!(ws[0].overlap.is_none());
        // The malformed entry is excluded from overlap consideration.
        assert!(ws[1].is_empty());
    }

    #[test]
    fn touching_workloads_overlap_under_closed_intervals() {
        let mut t = valid_task();
        t.workloads = vec![
            workload(1, "2024-01-01", "2024-01-05"),
            workload(2, "2024-01-05", "2024-01-10"),
        ];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        assert_eq!(ws[0].overlap.as_deref(), Some("Overlaps another workload."));
        assert_eq!(ws[1].overlap.as_deref(), Some("Overlaps another workload."));
    }

    #[test]
    fn disjoint_workloads_do_not_overlap() {
        let mut t = valid_task();
        t.workloads = vec![
            workload(1, "2024-01-01", "2024-01-04"),
            workload(2, "2024-01-05", "2024-01-10"),
        ];
        assert!(validate_task(&t).is_empty());
    }

    #[test]
    fn overlap_marks_original_indices_regardless_of_list_order() {
        let mut t = valid_task();
        t.workloads = vec![
            workload(1, "2024-01-10", "2024-01-15"),
            workload(2, "2024-01-20", "2024-01-25"),
            workload(3, "2024-01-03", "2024-01-12"),
        ];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        assert!(ws[0].overlap.is_some());
        assert!(ws[1].overlap.is_none());
        assert!(ws[2].overlap.is_some());
    }

    #[test]
    fn chained_overlaps_mark_every_member() {
        let mut t = valid_task();
        t.workloads = vec![
            workload(1, "2024-01-01", "2024-01-10"),
            workload(2, "2024-01-08", "2024-01-14"),
            workload(3, "2024-01-14", "2024-01-20"),
        ];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        assert!(ws.iter().all(|we| we.overlap.is_some()));
    }

    #[test]
    fn overlap_does_not_clobber_other_workload_errors() {
        let mut t = valid_task();
        // First workload leaks past the task end and overlaps the second.
        t.workloads = vec![
            workload(1, "2024-01-25", "2024-02-05"),
            workload(2, "2024-01-20", "2024-01-28"),
        ];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        assert!(ws[0].within.is_some());
        assert!(ws[0].overlap.is_some());
        assert!(ws[1].overlap.is_some());
    }

    #[test]
    fn workloads_slot_is_parallel_with_empty_entries_for_clean_indices() {
        let mut t = valid_task();
        t.workloads = vec![
            workload(1, "2024-01-02", "2024-01-05"),
            workload(2, "bogus", "2024-01-10"),
        ];
        let report = validate_task(&t);
        let ws = report.workloads.unwrap();
        assert_eq!(ws.len(), 2);
        assert!(ws[0].is_empty());
        assert!(!ws[1].is_empty());
    }

    #[test]
    fn workloads_slot_absent_when_all_workloads_are_clean() {
        let mut t = valid_task();
        t.workloads = vec![workload(1, "2024-01-02", "2024-01-05")];
        assert!(validate_task(&t).workloads.is_none());
    }

    #[test]
    fn validation_is_idempotent() {
        let mut t = valid_task();
        t.start_date = "2024-01-10".into();
        t.workloads = vec![
            workload(1, "2024-01-05", "2024-01-12"),
            workload(2, "2024-01-11", "2024-01-13"),
        ];
        assert_eq!(validate_task(&t), validate_task(&t));
    }

    #[test]
    fn report_serialises_with_contract_keys_and_skips_empty_slots() {
        let mut t = valid_task();
        t.task_name = String::new();
        t.start_date = "2024-01-10".into();
        t.workloads = vec![workload(1, "2024-01-05", "2024-01-12")];
        let report = validate_task(&t);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("taskName").is_some());
        assert!(json.get("description").is_none());
        assert_eq!(
            json["workloads"][0]["within"],
            "Workload must be within Task date range."
        );
        // An empty report serialises to an empty object.
        assert_eq!(serde_json::to_string(&validate_task(&valid_task())).unwrap(), "{}");
    }
}
