//! Task artifact header parsing
//!
//! Headers are a small `key: value` subset of YAML between two `---` lines:
//!
//! ```text
//! ---
//! id: TASK-7
//! title: Fix NP_NULL_ON_SOME_PATH in Foo.java at line 42
//! labels:
//!   - spotbugs
//!   - correctness
//! ---
//! ```
//!
//! Only the block form of lists is understood. Lines before the opening
//! sentinel are ignored.

use crate::error::ParseError;
use crate::models::task::TASK_ID_PREFIX;
use crate::models::{TaskHeader, TaskId};
use crate::paths::HEADER_SENTINEL;

const ID_KEY: &str = "id:";

/// Lines strictly between the first two sentinel lines
pub fn header_lines(content: &str) -> Result<Vec<&str>, ParseError> {
    let mut lines = content.lines();

    if !lines.by_ref().any(is_sentinel) {
        return Err(ParseError::MissingHeader);
    }

    let mut header = Vec::new();
    for line in lines {
        if is_sentinel(line) {
            return Ok(header);
        }
        header.push(line);
    }
    Err(ParseError::Unterminated)
}

/// Extract only the task id from an artifact
///
/// The first `id:` line carrying a valid `TASK-<n>` value wins.
pub fn extract_id(content: &str) -> Result<TaskId, ParseError> {
    let header = header_lines(content)?;
    let mut first_invalid = None;

    for line in header {
        let Some(value) = line.strip_prefix(ID_KEY) else {
            continue;
        };
        match parse_id_value(value) {
            Some(id) => return Ok(id),
            None => {
                first_invalid.get_or_insert_with(|| value.trim().to_string());
            },
        }
    }

    Err(first_invalid.map_or(ParseError::MissingId, ParseError::InvalidId))
}

/// Parse the full header of an artifact
pub fn parse_header(content: &str) -> Result<TaskHeader, ParseError> {
    let id = extract_id(content)?;
    let mut header = TaskHeader::new(id);
    let mut in_labels = false;

    for line in header_lines(content)? {
        if in_labels {
            if let Some(item) = list_item(line) {
                header.labels.push(unquote(item).to_string());
                continue;
            }
            in_labels = false;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        // Indented keys belong to nested maps we do not model
        if key.starts_with(char::is_whitespace) {
            continue;
        }
        let value = unquote(value.trim());

        match key.trim() {
            "title" => header.title = value.to_string(),
            "status" => header.status = value.to_string(),
            "priority" => header.priority = value.parse().ok(),
            "type" => header.task_type = value.to_string(),
            "assignee" => header.assignee = value.to_string(),
            "created" => header.created = value.to_string(),
            "labels" => in_labels = value.is_empty(),
            _ => {},
        }
    }

    Ok(header)
}

fn is_sentinel(line: &str) -> bool {
    line.trim() == HEADER_SENTINEL
}

fn parse_id_value(value: &str) -> Option<TaskId> {
    value
        .trim()
        .strip_prefix(TASK_ID_PREFIX)
        .and_then(|digits| digits.parse::<u32>().ok())
        .map(TaskId::new)
}

fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.len() == line.len() {
        return None;
    }
    trimmed.strip_prefix('-').map(str::trim)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
