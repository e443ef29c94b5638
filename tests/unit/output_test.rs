//! Tests for structured output

use std::path::PathBuf;

use findtask::export::{ExportReport, ItemError, Outcome, WrittenTask};
use findtask::models::TaskId;
use findtask::output::{ExportResult, NextIdResult, TaskListResult};

use crate::common::TestStore;

#[test]
fn test_export_result_json_is_flat() {
    let report = ExportReport {
        requested: 2,
        created: 1,
        errors: vec![ItemError {
            index: 1,
            id: Some(TaskId::new(6)),
            rule: "R2".to_string(),
            path: Some(PathBuf::from("backlog/tasks/TASK-6-x.md")),
            message: "cannot write".to_string(),
        }],
        written: vec![WrittenTask {
            index: 0,
            id: TaskId::new(5),
            path: PathBuf::from("backlog/tasks/TASK-5-x.md"),
        }],
        base_id: Some(TaskId::new(5)),
        cancelled: false,
    };
    let result = ExportResult {
        outcome: report.outcome(),
        directory: "backlog/tasks".to_string(),
        report,
    };

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["outcome"], "partial");
    assert_eq!(json["directory"], "backlog/tasks");
    assert_eq!(json["requested"], 2);
    assert_eq!(json["created"], 1);
    assert_eq!(json["base_id"], "TASK-5");
    assert_eq!(json["written"][0]["id"], "TASK-5");
    assert_eq!(json["errors"][0]["id"], "TASK-6");
    assert_eq!(json["errors"][0]["index"], 1);
}

#[test]
fn test_empty_export_result_json() {
    let report = ExportReport::default();
    assert_eq!(report.outcome(), Outcome::Nothing);
    let result = ExportResult {
        outcome: report.outcome(),
        directory: String::new(),
        report,
    };

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["outcome"], "nothing");
    assert!(json["base_id"].is_null());
}

#[test]
fn test_next_id_result_json() {
    let result = NextIdResult {
        next_id: "TASK-8".to_string(),
        scanned: 3,
        unreadable: 1,
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["next_id"], "TASK-8");
    assert_eq!(json["unreadable"], 1);
}

#[test]
fn test_task_list_result_from_listing() {
    let repo = TestStore::new();
    repo.add_task("completed", 4);
    repo.add_task("tasks", 2);
    repo.add_file("tasks", "broken.md", "no header");

    let result = TaskListResult::from(repo.store().list(None));

    assert_eq!(result.total, 2);
    assert_eq!(result.tasks[0].id, "TASK-2");
    assert_eq!(result.tasks[0].partition, "tasks");
    assert_eq!(result.tasks[1].id, "TASK-4");
    assert_eq!(result.tasks[1].status, "Done");
    assert_eq!(result.skipped.len(), 1);
    assert!(result.skipped[0].contains("broken.md"));
}

#[test]
fn test_task_list_result_single_partition() {
    let repo = TestStore::new();
    repo.add_task("completed", 4);
    repo.add_task("tasks", 2);

    let result = TaskListResult::from(repo.store().list(Some("completed")));
    assert_eq!(result.total, 1);
    assert_eq!(result.tasks[0].id, "TASK-4");
    assert_eq!(result.tasks[0].priority, "");
}
