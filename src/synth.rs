//! Task artifact synthesis
//!
//! Turns one finding plus an allocated id into a filename and file content.
//! Synthesis is pure: the creation date and tool profile are fixed when the
//! [`Synthesizer`] is built, so the same inputs always give the same bytes.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Finding, Priority, TaskId, TaskStatus};
use crate::paths::{ARTIFACT_EXTENSION, HEADER_SENTINEL};

/// Longest filename, excluding the extension
pub const MAX_BASENAME_LEN: usize = 77;

/// Placeholder for findings with no known source file
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Task type written to every artifact
pub const TASK_TYPE: &str = "bug";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9_-]").expect("static pattern is valid"));

/// Replace every character outside `[A-Za-z0-9_-]` with `-`
#[must_use]
pub fn sanitize(s: &str) -> String {
    UNSAFE_CHARS.replace_all(s, "-").into_owned()
}

/// The analyzer the findings come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolProfile {
    /// Short name used in filenames and as a label
    pub name: String,
    /// Name as shown in prose
    pub display_name: String,
    /// Documentation link put in the references section
    pub docs_url: String,
}

impl Default for ToolProfile {
    fn default() -> Self {
        Self {
            name: "spotbugs".to_string(),
            display_name: "SpotBugs".to_string(),
            docs_url: "https://spotbugs.readthedocs.io/".to_string(),
        }
    }
}

/// A synthesized artifact, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFile {
    /// Id the artifact was built for
    pub id: TaskId,
    /// Filename including extension
    pub filename: String,
    /// Full file content
    pub content: String,
}

/// Builds task artifacts for one tool on one date
#[derive(Debug, Clone)]
pub struct Synthesizer {
    tool: ToolProfile,
    created: NaiveDate,
}

impl Synthesizer {
    /// Create a synthesizer stamping artifacts with `created`
    #[must_use]
    pub const fn new(tool: ToolProfile, created: NaiveDate) -> Self {
        Self { tool, created }
    }

    /// Create a synthesizer stamping artifacts with today's local date
    #[must_use]
    pub fn today(tool: ToolProfile) -> Self {
        Self::new(tool, chrono::Local::now().date_naive())
    }

    /// Tool profile in use
    #[must_use]
    pub const fn tool(&self) -> &ToolProfile {
        &self.tool
    }

    /// Date written to the `created` field
    #[must_use]
    pub const fn created(&self) -> NaiveDate {
        self.created
    }

    /// Build the filename and content for `finding` under `id`
    #[must_use]
    pub fn synthesize(&self, finding: &Finding, id: TaskId) -> TaskFile {
        TaskFile {
            id,
            filename: self.filename(finding, id),
            content: self.content(finding, id),
        }
    }

    /// Filename for `finding` under `id`
    ///
    /// `TASK-<n>-<tool>-<rule>-<file stem>-l<line>`, cut to
    /// [`MAX_BASENAME_LEN`] characters, plus the extension.
    #[must_use]
    pub fn filename(&self, finding: &Finding, id: TaskId) -> String {
        let stem = finding.location.stem().unwrap_or(UNKNOWN_LOCATION);
        let mut base = format!(
            "{id}-{}-{}-{}-l{}",
            sanitize(&self.tool.name),
            sanitize(&finding.rule),
            sanitize(stem),
            finding.location.line
        );
        // Everything above is ASCII after sanitizing
        base.truncate(MAX_BASENAME_LEN);
        format!("{base}.{ARTIFACT_EXTENSION}")
    }

    /// Labels for `finding`: the tool, then the lower-cased category
    #[must_use]
    pub fn labels(&self, finding: &Finding) -> Vec<String> {
        let mut labels = vec![self.tool.name.clone()];
        let category = finding.category.to_lowercase();
        if !category.is_empty() && !labels.contains(&category) {
            labels.push(category);
        }
        labels
    }

    /// Full artifact content for `finding` under `id`
    #[must_use]
    pub fn content(&self, finding: &Finding, id: TaskId) -> String {
        let rule = &finding.rule;
        let line = finding.location.line;
        let mut out = String::new();

        // Header. Values are kept on one line so the header always re-parses.
        let _ = writeln!(out, "{HEADER_SENTINEL}");
        let _ = writeln!(out, "id: {id}");
        let _ = writeln!(
            out,
            "title: Fix {} in {} at line {line}",
            single_line(rule),
            single_line(&finding.location.file)
        );
        let _ = writeln!(out, "status: {}", TaskStatus::ToDo);
        let _ = writeln!(out, "priority: {}", Priority::from_severity(finding.severity));
        let _ = writeln!(out, "type: {TASK_TYPE}");
        let _ = writeln!(out, "assignee: \"\"");
        let _ = writeln!(out, "labels:");
        for label in self.labels(finding) {
            let _ = writeln!(out, "  - {}", single_line(&label));
        }
        let _ = writeln!(out, "created: {}", self.created.format("%Y-%m-%d"));
        let _ = writeln!(out, "{HEADER_SENTINEL}");
        out.push('\n');

        // Body
        let _ = writeln!(out, "# Fix `{rule}`: {}", finding.message);
        out.push('\n');
        let _ = writeln!(out, "## Description");
        out.push('\n');
        let _ = writeln!(out, "- **Rule:** `{rule}`");
        let _ = writeln!(out, "- **Category:** {}", finding.category_description());
        let _ = writeln!(out, "- **File:** `{}`", finding.location.path);
        let _ = writeln!(out, "- **Line:** {line}");
        let _ = writeln!(out, "- **Priority:** {}", finding.severity_label());
        out.push('\n');
        let _ = writeln!(out, "## Acceptance Criteria");
        out.push('\n');
        let _ = writeln!(out, "- [ ] The `{rule}` issue is resolved");
        let _ = writeln!(
            out,
            "- [ ] No new {} warnings are introduced",
            self.tool.display_name
        );
        let _ = writeln!(out, "- [ ] Existing tests continue to pass");
        out.push('\n');
        let _ = writeln!(out, "## References");
        out.push('\n');
        let _ = writeln!(
            out,
            "- [{} documentation for {rule}]({})",
            self.tool.display_name, self.tool.docs_url
        );

        out
    }
}

/// Collapse line breaks so a value cannot spill out of its header line
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
