//! Tests for artifact header parsing

use findtask::error::ParseError;
use findtask::frontmatter::{extract_id, header_lines, parse_header};
use findtask::models::{Priority, TaskId, TaskStatus};

use crate::common::{null_deref, synthesizer};

// =============================================================================
// HEADER REGION
// =============================================================================

#[test]
fn test_header_lines_between_sentinels() {
    let lines = header_lines("---\na: 1\nb: 2\n---\nbody\n---\n").unwrap();
    assert_eq!(lines, vec!["a: 1", "b: 2"]);
}

#[test]
fn test_header_lines_missing_header() {
    assert_eq!(header_lines("# Title\n\ntext\n"), Err(ParseError::MissingHeader));
    assert_eq!(header_lines(""), Err(ParseError::MissingHeader));
}

#[test]
fn test_header_lines_unterminated() {
    assert_eq!(header_lines("---\nid: TASK-1\n"), Err(ParseError::Unterminated));
}

// =============================================================================
// ID EXTRACTION
// =============================================================================

#[test]
fn test_extract_id() {
    assert_eq!(extract_id("---\nid: TASK-42\n---\n"), Ok(TaskId::new(42)));
}

#[test]
fn test_extract_id_missing() {
    assert_eq!(extract_id("---\ntitle: x\n---\n"), Err(ParseError::MissingId));
}

#[test]
fn test_extract_id_non_numeric() {
    assert_eq!(
        extract_id("---\nid: TASK-4x\n---\n"),
        Err(ParseError::InvalidId("TASK-4x".to_string()))
    );
}

#[test]
fn test_extract_id_first_valid_line_wins() {
    assert_eq!(extract_id("---\nid: draft\nid: TASK-3\nid: TASK-9\n---\n"), Ok(TaskId::new(3)));
}

#[test]
fn test_extract_id_ignores_indented_id() {
    assert_eq!(extract_id("---\nmeta:\n  id: TASK-5\n---\n"), Err(ParseError::MissingId));
}

#[test]
fn test_extract_id_ignores_body() {
    assert_eq!(
        extract_id("---\ntitle: x\n---\nid: TASK-8\n"),
        Err(ParseError::MissingId)
    );
}

// =============================================================================
// FULL HEADER
// =============================================================================

#[test]
fn test_parse_header_fields() {
    let content = "---\n\
                   id: TASK-7\n\
                   title: Fix RULE in Foo.java at line 3\n\
                   status: In Progress\n\
                   priority: medium\n\
                   type: bug\n\
                   assignee: \"\"\n\
                   labels:\n  - spotbugs\n  - \"style\"\n\
                   created: 2026-01-02\n\
                   ---\n";
    let header = parse_header(content).unwrap();

    assert_eq!(header.id, TaskId::new(7));
    assert_eq!(header.title, "Fix RULE in Foo.java at line 3");
    assert_eq!(header.status, "In Progress");
    assert_eq!(header.known_status(), Some(TaskStatus::InProgress));
    assert_eq!(header.priority, Some(Priority::Medium));
    assert_eq!(header.task_type, "bug");
    assert_eq!(header.assignee, "");
    assert_eq!(header.labels, vec!["spotbugs", "style"]);
    assert_eq!(header.created, "2026-01-02");
}

#[test]
fn test_parse_header_unknown_keys_and_custom_status() {
    let content = "---\nid: TASK-1\nstatus: Blocked\nmilestone: v2\nlabels: []\n---\n";
    let header = parse_header(content).unwrap();

    assert_eq!(header.status, "Blocked");
    assert_eq!(header.known_status(), None);
    assert!(header.labels.is_empty());
    assert_eq!(header.priority, None);
}

#[test]
fn test_parse_header_round_trips_synthesized_artifact() {
    let finding = null_deref();
    let file = synthesizer().synthesize(&finding, TaskId::new(31));
    let header = parse_header(&file.content).unwrap();

    assert_eq!(header.id, TaskId::new(31));
    assert_eq!(header.title, "Fix NP_NULL_ON_SOME_PATH in Foo.java at line 42");
    assert_eq!(header.known_status(), Some(TaskStatus::ToDo));
    assert_eq!(header.priority, Some(Priority::High));
    assert_eq!(header.labels, vec!["spotbugs", "correctness"]);
    assert_eq!(header.created, "2026-10-16");
}

#[test]
fn test_parse_error_messages() {
    assert!(ParseError::MissingHeader.to_string().contains("missing opening sentinel"));
    assert!(ParseError::InvalidId("x".into()).to_string().contains("invalid id"));
}
