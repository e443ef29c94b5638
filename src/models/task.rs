//! Task model
//!
//! A task artifact is a markdown file with a `key: value` header. These types
//! describe the header; the body is free-form text owned by the task board.

use serde::{Deserialize, Serialize};

/// Prefix of every task identifier
pub const TASK_ID_PREFIX: &str = "TASK-";

/// Numeric task identifier, rendered as `TASK-<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TaskId(u32);

impl TaskId {
    /// Wrap a raw number
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The numeric part of the identifier
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{TASK_ID_PREFIX}{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(TASK_ID_PREFIX)
            .ok_or_else(|| format!("Invalid task id: {s}. Expected {TASK_ID_PREFIX}<number>"))?;
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| format!("Invalid task id: {s}. Suffix is not a number"))
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TaskId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task priority bucket derived from a finding's severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Severity 1
    High,
    /// Severity 2
    Medium,
    /// Anything else
    #[default]
    Low,
}

impl Priority {
    /// Map a severity ordinal (1 = most severe) onto a bucket
    #[must_use]
    pub const fn from_severity(severity: i32) -> Self {
        match severity {
            1 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" | "med" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Invalid priority: {s}. Use: high, medium, low")),
        }
    }
}

/// Task status as understood by the task board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    ToDo,
    /// Being worked on
    InProgress,
    /// Finished
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToDo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "to do" | "todo" => Ok(Self::ToDo),
            "in progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(format!("Invalid status: {s}. Use: To Do, In Progress, Done")),
        }
    }
}

/// Parsed header of a task artifact
///
/// Only `id` is mandatory. Fields written by other tools that this crate does
/// not know about are ignored when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskHeader {
    /// Task identifier
    pub id: TaskId,
    /// One-line title
    pub title: String,
    /// Raw status text (boards may use custom columns)
    pub status: String,
    /// Priority bucket, when present and recognized
    pub priority: Option<Priority>,
    /// Task type, e.g. `bug`
    pub task_type: String,
    /// Assignee, empty when unassigned
    pub assignee: String,
    /// Labels in file order
    pub labels: Vec<String>,
    /// Creation date as written
    pub created: String,
}

impl TaskHeader {
    /// Header with only the id set
    #[must_use]
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            title: String::new(),
            status: String::new(),
            priority: None,
            task_type: String::new(),
            assignee: String::new(),
            labels: Vec::new(),
            created: String::new(),
        }
    }

    /// Status parsed into the known set, if it is one of them
    #[must_use]
    pub fn known_status(&self) -> Option<TaskStatus> {
        self.status.parse().ok()
    }
}
