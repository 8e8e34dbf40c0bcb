// src/checks/mod.rs

//! Dockerfile checks
//!
//! Each check group is an independent function over a parsed
//! [`Dockerfile`] that returns zero or more [`Issue`]s:
//! - Base image: report the image, flag large images and floating tags
//! - Best practices: `.dockerignore`, `ADD`, healthcheck, user, cache cleanup
//! - Layer sizes: large or fast-growing layers from the image history
//! - Security: root execution, remote `ADD`, exposed ports, build args
//!
//! [`Linter`] runs the enabled groups in that fixed order and concatenates
//! their findings. No check can fail the run.

mod base_image;
mod best_practices;
mod layer_size;
mod security;

pub use base_image::{bare_image_name, check_base_image, has_unpinned_tag, large_image_alternative};
pub use best_practices::check_best_practices;
pub use layer_size::{
    check_layer_sizes, multistage_suggestion, parse_layer_sizes, DockerHistory, LayerHistory,
};
pub use security::run_security_checks;

use crate::config::LintConfig;
use crate::dockerfile::Dockerfile;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Category of a finding, which decides its report marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Info,
    Warning,
    Security,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Security => "security",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity label attached to a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single finding
///
/// Built with the consuming `with_*` methods and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    kind: IssueKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    impact: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    references: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

impl Issue {
    /// Create an issue of the given kind with no metadata
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fix: None,
            severity: None,
            impact: None,
            references: Vec::new(),
            line: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(IssueKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(IssueKind::Warning, message)
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(IssueKind::Security, message)
    }

    /// Attach a fix suggestion (may span several lines)
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    /// Append a documentation link
    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }

    /// Attach the source line the finding refers to, if known
    pub fn at_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fix(&self) -> Option<&str> {
        self.fix.as_deref()
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub fn impact(&self) -> Option<&str> {
        self.impact.as_deref()
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

/// Runs the enabled check groups against a Dockerfile
pub struct Linter {
    config: LintConfig,
    context_dir: PathBuf,
    history: Box<dyn LayerHistory>,
    image: Option<String>,
}

impl Linter {
    /// Create a linter using the configured image history command
    ///
    /// `context_dir` is the build context, normally the directory holding
    /// the Dockerfile; it is where `.dockerignore` is looked up.
    pub fn new(config: LintConfig, context_dir: &Path) -> Self {
        let history = Box::new(DockerHistory::new(&config.layers.history_command));
        Self {
            config,
            context_dir: context_dir.to_path_buf(),
            history,
            image: None,
        }
    }

    /// Replace the image history source
    pub fn with_history(mut self, history: Box<dyn LayerHistory>) -> Self {
        self.history = history;
        self
    }

    /// Inspect this image's history instead of the base image
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Enable or disable the security check group
    pub fn with_security(mut self, enabled: bool) -> Self {
        self.config.checks.security = enabled;
        self
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Run all enabled checks, in order: base image, best practices,
    /// layer sizes, security
    pub fn run(&self, dockerfile: &Dockerfile) -> Vec<Issue> {
        let checks = &self.config.checks;
        let mut issues = Vec::new();

        if checks.base_image {
            let found = check_base_image(dockerfile);
            debug!("Base image checks: {} issues", found.len());
            issues.extend(found);
        }

        if checks.best_practices {
            let found = check_best_practices(dockerfile, &self.context_dir);
            debug!("Best practice checks: {} issues", found.len());
            issues.extend(found);
        }

        if checks.layer_sizes {
            let image = self.image.as_deref().unwrap_or(dockerfile.base_image());
            let found = check_layer_sizes(
                dockerfile,
                image,
                self.history.as_ref(),
                &self.config.layers,
            );
            debug!("Layer size checks: {} issues", found.len());
            issues.extend(found);
        }

        if checks.security {
            let found = run_security_checks(dockerfile);
            debug!("Security checks: {} issues", found.len());
            issues.extend(found);
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dockerfile::parse_dockerfile;

    /// History source that is never available
    struct NoHistory;

    impl LayerHistory for NoHistory {
        fn is_available(&self) -> bool {
            false
        }

        fn history(&self, _image: &str) -> Option<String> {
            None
        }
    }

    fn linter(config: LintConfig) -> (tempfile::TempDir, Linter) {
        let dir = tempfile::tempdir().unwrap();
        let linter = Linter::new(config, dir.path()).with_history(Box::new(NoHistory));
        (dir, linter)
    }

    #[test]
    fn test_issue_builder() {
        let issue = Issue::warning("Something")
            .with_fix("Do this\nThen that")
            .with_severity(Severity::High)
            .with_impact("Bad things")
            .with_reference("https://example.com/a")
            .with_reference("https://example.com/b")
            .at_line(Some(7));

        assert_eq!(issue.kind(), IssueKind::Warning);
        assert_eq!(issue.message(), "Something");
        assert_eq!(issue.fix(), Some("Do this\nThen that"));
        assert_eq!(issue.severity(), Some(Severity::High));
        assert_eq!(issue.impact(), Some("Bad things"));
        assert_eq!(issue.references().len(), 2);
        assert_eq!(issue.line(), Some(7));
    }

    #[test]
    fn test_issue_serializes_without_empty_fields() {
        let json = serde_json::to_value(Issue::security("Root user")).unwrap();
        assert_eq!(json["kind"], "security");
        assert_eq!(json["message"], "Root user");
        assert!(json.get("fix").is_none());
        assert!(json.get("references").is_none());
    }

    #[test]
    fn test_security_checks_are_opt_in() {
        let df = parse_dockerfile("FROM alpine:3.19\nEXPOSE 80\n", Path::new("Dockerfile"));

        let (_dir, default_linter) = linter(LintConfig::default());
        let issues = default_linter.run(&df);
        assert!(issues.iter().all(|i| i.kind() != IssueKind::Security));

        let (_dir, secure_linter) = linter(LintConfig::default());
        let issues = secure_linter.with_security(true).run(&df);
        assert!(issues.iter().any(|i| i.kind() == IssueKind::Security));
    }

    #[test]
    fn test_check_order() {
        let df = parse_dockerfile("FROM ubuntu\nRUN apt-get install -y curl\n", Path::new("Dockerfile"));
        let (_dir, linter) = linter(LintConfig::default());
        let issues = linter.with_security(true).run(&df);

        // Base image info comes first, security findings last
        assert_eq!(issues[0].kind(), IssueKind::Info);
        let first_security = issues
            .iter()
            .position(|i| i.kind() == IssueKind::Security)
            .unwrap();
        assert!(issues[first_security..]
            .iter()
            .all(|i| i.kind() == IssueKind::Security));
    }

    #[test]
    fn test_all_groups_disabled() {
        let mut config = LintConfig::default();
        config.checks.base_image = false;
        config.checks.best_practices = false;
        config.checks.layer_sizes = false;

        let df = parse_dockerfile("FROM ubuntu\n", Path::new("Dockerfile"));
        let (_dir, linter) = linter(config);
        assert!(linter.run(&df).is_empty());
    }
}
