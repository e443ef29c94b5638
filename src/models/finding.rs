//! Finding model
//!
//! A finding is one diagnostic reported by a static analyzer. Findings are
//! supplied from outside (usually a JSON export) and never mutated here.

use serde::{Deserialize, Serialize};

/// Where in the source tree a finding was reported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLocation {
    /// Source path relative to the source root (e.g. `com/acme/Foo.java`)
    pub path: String,
    /// Bare file name (e.g. `Foo.java`)
    pub file: String,
    /// First line of the finding, 0 when unknown
    pub line: u32,
}

impl SourceLocation {
    /// Create a location from its parts
    #[must_use]
    pub fn new(path: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            file: file.into(),
            line,
        }
    }

    /// File name without its extension, or `None` when the file is unknown
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        if self.file.is_empty() {
            return None;
        }
        match self.file.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => Some(stem),
            _ => Some(&self.file),
        }
    }
}

/// A single analyzer finding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    /// Rule (bug pattern) identifier, e.g. `NP_NULL_ON_SOME_PATH`
    pub rule: String,
    /// Category code, e.g. `CORRECTNESS`
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Severity ordinal, 1 = most severe
    pub severity: i32,
    /// Analyzer's own label for the severity, kept verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_label: Option<String>,
    /// Long form of the category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_description: Option<String>,
    /// Short description of the rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Primary source location
    pub location: SourceLocation,
    /// Last line of the finding, when it spans several lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    /// Method the finding is attached to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Field the finding is attached to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Finding {
    /// Create a finding with the required fields; everything else is unknown
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        category: impl Into<String>,
        message: impl Into<String>,
        severity: i32,
        location: SourceLocation,
    ) -> Self {
        Self {
            rule: rule.into(),
            category: category.into(),
            message: message.into(),
            severity,
            location,
            ..Self::default()
        }
    }

    /// Severity label, falling back to the analyzer's standard wording
    #[must_use]
    pub fn severity_label(&self) -> &str {
        self.severity_label
            .as_deref()
            .unwrap_or_else(|| default_severity_label(self.severity))
    }

    /// Category description, falling back to the built-in table
    #[must_use]
    pub fn category_description(&self) -> &str {
        self.category_description
            .as_deref()
            .unwrap_or_else(|| category_description(&self.category))
    }

    /// Line range covered by this finding, `None` when the line is unknown
    #[must_use]
    pub fn line_range(&self) -> Option<(u32, u32)> {
        let start = self.location.line;
        if start == 0 {
            return None;
        }
        let end = self.end_line.filter(|&end| end >= start).unwrap_or(start);
        Some((start, end))
    }
}

/// Sort findings by source path, line, then rule
///
/// The sort is stable, so findings at the same spot keep their input order.
pub fn sort_by_location(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        (&a.location.path, a.location.line, &a.rule).cmp(&(&b.location.path, b.location.line, &b.rule))
    });
}

/// Standard label for a severity ordinal
#[must_use]
pub const fn default_severity_label(severity: i32) -> &'static str {
    match severity {
        1 => "High",
        2 => "Medium",
        3 => "Low",
        4 => "Experimental",
        _ => "Ignore",
    }
}

/// Long description for a known category code; unknown codes are returned as-is
#[must_use]
pub fn category_description(category: &str) -> &str {
    match category {
        "BAD_PRACTICE" => "Bad practice",
        "CORRECTNESS" => "Correctness",
        "EXPERIMENTAL" => "Experimental",
        "I18N" => "Internationalization",
        "MALICIOUS_CODE" => "Malicious code vulnerability",
        "MT_CORRECTNESS" => "Multithreaded correctness",
        "NOISE" => "Bogus random noise",
        "PERFORMANCE" => "Performance",
        "SECURITY" => "Security",
        "STYLE" => "Dodgy code",
        other => other,
    }
}
