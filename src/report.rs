// src/report.rs

//! Issue reporting and exit status
//!
//! The text report prints one block per issue, in the order the checks
//! produced them, followed by a one-line summary:
//!
//! ```text
//! [!] No HEALTHCHECK found
//!   → Severity: low
//!   → Fix:
//!     HEALTHCHECK --interval=30s CMD curl -f http://localhost/ || exit 1
//!
//! [✓] Check complete: 1 issues found
//! ```

use crate::checks::{Issue, IssueKind};
use crate::dockerfile::Dockerfile;
use colored::{Color, Colorize};
use serde::Serialize;

/// Process exit status of a lint run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Checks ran and found nothing
    Clean,
    /// The Dockerfile or configuration could not be loaded
    Error,
    /// Checks ran and found at least one issue
    IssuesFound,
}

impl ExitStatus {
    /// Status for a completed run; any issue, including info, counts
    pub fn from_issues(issues: &[Issue]) -> Self {
        if issues.is_empty() {
            Self::Clean
        } else {
            Self::IssuesFound
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::Error => 1,
            Self::IssuesFound => 2,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// Issue counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub info: usize,
    pub warning: usize,
    pub security: usize,
}

impl Summary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Summary {
            total: issues.len(),
            ..Default::default()
        };

        for issue in issues {
            match issue.kind() {
                IssueKind::Info => summary.info += 1,
                IssueKind::Warning => summary.warning += 1,
                IssueKind::Security => summary.security += 1,
            }
        }

        summary
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    path: String,
    base_image: &'a str,
    issues: &'a [Issue],
    summary: Summary,
}

/// Line printed before any check runs, followed by a blank line
pub fn header(dockerfile: &Dockerfile) -> String {
    format!("[INFO] Checking Dockerfile: {}\n\n", dockerfile.path().display())
}

/// Render issues as the human-readable text report
pub fn render_text(issues: &[Issue], color: bool) -> String {
    let mut out = String::new();
    let arrow = paint("→", Color::Blue, color);

    for issue in issues {
        let marker = match issue.kind() {
            IssueKind::Warning => paint("[!]", Color::Yellow, color),
            IssueKind::Security => paint("[SECURITY]", Color::Red, color),
            IssueKind::Info => paint("[+]", Color::Green, color),
        };

        out.push('\n');
        out.push_str(&format!("{} {}", marker, issue.message()));
        if let Some(line) = issue.line() {
            out.push_str(&format!(" (line {})", line));
        }
        out.push('\n');

        if let Some(severity) = issue.severity() {
            out.push_str(&format!("  {} Severity: {}\n", arrow, severity));
        }
        if let Some(impact) = issue.impact() {
            out.push_str(&format!("  {} Impact: {}\n", arrow, impact));
        }
        if let Some(fix) = issue.fix() {
            out.push_str(&format!("  {} Fix:\n", arrow));
            for line in fix.lines() {
                out.push_str(&format!("    {}\n", paint(line, Color::Cyan, color)));
            }
        }
        if !issue.references().is_empty() {
            out.push_str(&format!("  {} References:\n", arrow));
            for reference in issue.references() {
                out.push_str(&format!("    - {}\n", reference));
            }
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "[{}] Check complete: {} issues found\n",
        paint("✓", Color::Green, color),
        issues.len()
    ));

    out
}

/// Render the run as a JSON document
pub fn render_json(dockerfile: &Dockerfile, issues: &[Issue]) -> serde_json::Result<String> {
    let report = JsonReport {
        path: dockerfile.path().display().to_string(),
        base_image: dockerfile.base_image(),
        issues,
        summary: Summary::from_issues(issues),
    };

    serde_json::to_string_pretty(&report)
}

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}
