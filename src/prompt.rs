//! Assistant prompt construction
//!
//! Describes one finding in markdown and, when the source file can be found
//! under one of the configured source roots, appends the surrounding code.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Finding;

/// Lines of context shown before and after the finding
pub const CONTEXT_LINES: usize = 10;

/// Builds prompts for the assistant bridge
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    source_roots: Vec<PathBuf>,
    tool_name: String,
}

impl PromptBuilder {
    /// Builder resolving source paths against `source_roots`, in order
    #[must_use]
    pub fn new(tool_name: impl Into<String>, source_roots: Vec<PathBuf>) -> Self {
        Self {
            source_roots,
            tool_name: tool_name.into(),
        }
    }

    /// Prompt text for `finding`
    #[must_use]
    pub fn build(&self, finding: &Finding) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Fix the following {} issue in my code.\n", self.tool_name);

        let short = finding.short_description.as_deref().unwrap_or(&finding.rule);
        let _ = writeln!(out, "**Bug:** {short} (`{}`)", finding.rule);
        let _ = writeln!(out, "**Issue:** {}", finding.message);
        let _ = writeln!(out, "**Category:** {}", finding.category_description());
        let _ = writeln!(out, "**Priority:** {}", finding.severity_label());

        let source = self.locate(finding);
        if let Some(path) = &source {
            let _ = writeln!(out, "**File:** `{}`", path.display());
        } else if !finding.location.path.is_empty() {
            let _ = writeln!(out, "**File:** `{}`", finding.location.path);
        }

        let range = finding.line_range();
        if let Some((start, end)) = range {
            if start == end {
                let _ = writeln!(out, "**Line:** {start}");
            } else {
                let _ = writeln!(out, "**Line:** {start}-{end}");
            }
        }
        if let Some(method) = &finding.method {
            let _ = writeln!(out, "**Method:** `{method}`");
        }
        if let Some(field) = &finding.field {
            let _ = writeln!(out, "**Field:** `{field}`");
        }

        if let (Some(path), Some((start, end))) = (&source, range) {
            if let Some(snippet) = read_context(path, start, end) {
                let _ = write!(
                    out,
                    "\n**Code context:**\n```{}\n{snippet}\n```\n",
                    fence_language(path)
                );
            }
        }

        out.push_str(
            "\nPlease suggest a fix for this issue. Explain what the problem is and provide the corrected code.\n",
        );
        out
    }

    fn locate(&self, finding: &Finding) -> Option<PathBuf> {
        if finding.location.path.is_empty() {
            return None;
        }
        self.source_roots
            .iter()
            .map(|root| root.join(&finding.location.path))
            .find(|candidate| candidate.is_file())
    }
}

/// Lines `start - CONTEXT_LINES ..= end + CONTEXT_LINES` (1-based, clamped)
fn read_context(path: &Path, start: u32, end: u32) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return None;
    }

    let start = usize::try_from(start).ok()?.saturating_sub(1);
    let end = usize::try_from(end).ok()?.saturating_sub(1);
    if start >= lines.len() {
        return None;
    }
    let first = start.saturating_sub(CONTEXT_LINES);
    let last = end.saturating_add(CONTEXT_LINES).min(lines.len() - 1);
    Some(lines[first..=last].join("\n"))
}

fn fence_language(path: &Path) -> &str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("kt" | "kts") => "kotlin",
        Some(ext) => ext,
        None => "",
    }
}
