//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::export::{ExportReport, Outcome};
use crate::storage::TaskListing;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Result of an export command
#[derive(Debug, Serialize)]
pub struct ExportResult {
    /// How the batch went
    pub outcome: Outcome,
    /// Directory new tasks were written to
    pub directory: String,
    /// Batch report
    #[serde(flatten)]
    pub report: ExportReport,
}

impl ExportResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        let report = &self.report;
        match self.outcome {
            Outcome::Nothing => {
                println!("No findings selected. Nothing to export.");
                return;
            },
            Outcome::Success => println!(
                "{} {} task file(s) in {}",
                "Created".green().bold(),
                report.created,
                self.directory
            ),
            Outcome::Partial => println!(
                "{} {} of {} task file(s) in {}",
                "Created".yellow().bold(),
                report.created,
                report.requested,
                self.directory
            ),
            Outcome::Failed => println!("{} no task files were created", "Failed:".red().bold()),
        }

        for task in &report.written {
            println!("  {}  {}", task.id.to_string().bold(), task.path.display());
        }
        for err in &report.errors {
            let id = err.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            println!("  {} #{} {} ({}): {}", "error".red(), err.index + 1, id, err.rule, err.message);
        }
        if report.cancelled {
            println!("Export was cancelled before all findings were written.");
        }
    }
}

/// Result of a next-id query
#[derive(Debug, Serialize)]
pub struct NextIdResult {
    /// Next free id, e.g. `TASK-8`
    pub next_id: String,
    /// Artifacts scanned
    pub scanned: usize,
    /// Artifacts that could not be read or parsed
    pub unreadable: usize,
}

impl NextIdResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!("{}", self.next_id);
                if self.unreadable > 0 {
                    println!(
                        "({} of {} file(s) had no readable id)",
                        self.unreadable, self.scanned
                    );
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// One row of a task listing
#[derive(Debug, Serialize)]
pub struct TaskInfo {
    /// Task id
    pub id: String,
    /// Title
    pub title: String,
    /// Status text
    pub status: String,
    /// Priority bucket, empty when missing
    pub priority: String,
    /// Labels
    pub labels: Vec<String>,
    /// Partition the file lives in
    pub partition: String,
    /// File path
    pub path: String,
}

/// Result of a list command
#[derive(Debug, Serialize)]
pub struct TaskListResult {
    /// Number of tasks
    pub total: usize,
    /// Tasks ordered by id
    pub tasks: Vec<TaskInfo>,
    /// Files skipped because their header could not be parsed
    pub skipped: Vec<String>,
}

impl From<TaskListing> for TaskListResult {
    fn from(listing: TaskListing) -> Self {
        let tasks: Vec<TaskInfo> = listing
            .tasks
            .into_iter()
            .map(|t| TaskInfo {
                id: t.header.id.to_string(),
                title: t.header.title,
                status: t.header.status,
                priority: t.header.priority.map(|p| p.to_string()).unwrap_or_default(),
                labels: t.header.labels,
                partition: t.partition,
                path: t.path.display().to_string(),
            })
            .collect();
        Self {
            total: tasks.len(),
            tasks,
            skipped: listing.skipped.iter().map(ToString::to_string).collect(),
        }
    }
}

impl TaskListResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        if self.tasks.is_empty() {
            println!("No tasks found.");
        } else {
            println!("Tasks ({}):\n", self.total);
            for t in &self.tasks {
                let priority = match t.priority.as_str() {
                    "high" => t.priority.red().to_string(),
                    "medium" => t.priority.yellow().to_string(),
                    _ => t.priority.clone(),
                };
                println!("  {} [{}] {} ({})", t.id.bold(), priority, t.title, t.partition);
            }
        }
        if !self.skipped.is_empty() {
            println!("\nSkipped {} file(s):", self.skipped.len());
            for s in &self.skipped {
                println!("  {s}");
            }
        }
    }
}

/// Result of sending a prompt to the assistant
#[derive(Debug, Serialize)]
pub struct FixResult {
    /// Whether the assistant is installed and reachable
    pub available: bool,
    /// Whether the prompt was accepted
    pub sent: bool,
    /// Rule of the finding
    pub rule: String,
}

impl FixResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                if self.sent {
                    println!("{} prompt for {} to the assistant", "Sent".green(), self.rule);
                } else if self.available {
                    println!("{} the assistant did not accept the prompt", "Failed:".red());
                } else {
                    println!("Assistant is not available. Configure [assistant] command.");
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}
