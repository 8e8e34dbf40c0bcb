// src/checks/best_practices.rs

//! General Dockerfile best-practice checks

use super::base_image::{has_unpinned_tag, unpinned_tag_issue};
use super::{Issue, Severity};
use crate::dockerfile::Dockerfile;
use std::path::Path;
use tracing::debug;

/// A package manager install command and the cleanups that must share its layer
struct CleanupRule {
    manager: &'static str,
    installs: &'static [&'static str],
    cleanups: &'static [&'static str],
    fix: &'static str,
}

static CLEANUP_RULES: &[CleanupRule] = &[
    CleanupRule {
        manager: "apt",
        installs: &["apt-get install", "apt install"],
        cleanups: &["apt-get clean", "rm -rf /var/lib/apt/lists/*"],
        fix: "RUN apt-get update && apt-get install -y <packages> \\\n    && rm -rf /var/lib/apt/lists/*",
    },
    CleanupRule {
        manager: "yum",
        installs: &["yum install"],
        cleanups: &["yum clean all"],
        fix: "RUN yum install -y <packages> && yum clean all",
    },
    CleanupRule {
        manager: "apk",
        installs: &["apk add"],
        cleanups: &["--no-cache", "rm -rf /var/cache/apk/*"],
        fix: "RUN apk add --no-cache <packages>",
    },
];

/// Run best-practice checks
///
/// `context_dir` is searched for a `.dockerignore` when the whole build
/// context is copied.
pub fn check_best_practices(dockerfile: &Dockerfile, context_dir: &Path) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(copy) = dockerfile.first_wildcard_copy() {
        issues.push(
            Issue::warning("COPY . . used; consider using specific paths")
                .with_fix("Copy only what the build needs, e.g., 'COPY package.json src/ ./'")
                .with_severity(Severity::Low)
                .with_impact("Copying the whole context invalidates the layer cache on any file change")
                .at_line(Some(copy.line_number())),
        );

        let dockerignore = context_dir.join(".dockerignore");
        if !dockerignore.exists() {
            debug!("No .dockerignore at {}", dockerignore.display());
            issues.push(
                Issue::warning("No `.dockerignore` found")
                    .with_fix("Create a .dockerignore next to the Dockerfile listing .git, build output and secrets")
                    .with_severity(Severity::Medium)
                    .with_impact("Unneeded or sensitive files end up in the build context and the image")
                    .with_reference("https://docs.docker.com/build/concepts/context/#dockerignore-files"),
            );
        }
    }

    if let Some(add) = dockerfile.first_instruction("ADD") {
        issues.push(
            Issue::warning("Using ADD instead of COPY; ADD adds unneeded complexity and risk")
                .with_fix("Use COPY for local files; fetch remote files with curl or wget in a RUN")
                .with_severity(Severity::Low)
                .with_reference(
                    "https://docs.docker.com/develop/develop-images/dockerfile_best-practices/#add-or-copy",
                )
                .at_line(Some(add.line_number())),
        );
    }

    if !dockerfile.has_healthcheck() {
        issues.push(
            Issue::warning("No HEALTHCHECK found")
                .with_fix("HEALTHCHECK --interval=30s CMD curl -f http://localhost/ || exit 1")
                .with_severity(Severity::Low)
                .with_reference("https://docs.docker.com/reference/dockerfile/#healthcheck"),
        );
    }

    if !dockerfile.has_user() {
        issues.push(
            Issue::warning("USER not specified; running as root")
                .with_fix("RUN addgroup -S app && adduser -S app -G app\nUSER app")
                .with_severity(Severity::Medium),
        );
    }

    issues.extend(check_package_cleanup(dockerfile));

    let image = dockerfile.base_image();
    if has_unpinned_tag(image) {
        issues.push(unpinned_tag_issue(image));
    }

    issues
}

/// Flag every `RUN` that installs packages without cleaning up in the same layer
///
/// Cleanup in a later `RUN` does not count: the earlier layer already holds
/// the cache. Detection is plain substring matching.
fn check_package_cleanup(dockerfile: &Dockerfile) -> Vec<Issue> {
    let mut issues = Vec::new();

    for run in dockerfile.instructions_by_command("RUN") {
        let args = run.arguments();

        for rule in CLEANUP_RULES {
            let installs = rule.installs.iter().any(|cmd| args.contains(cmd));
            let cleans = rule.cleanups.iter().any(|cmd| args.contains(cmd));

            if installs && !cleans {
                issues.push(
                    Issue::warning(format!(
                        "Package installation without cleanup ({}); adds unnecessary size",
                        rule.manager
                    ))
                    .with_fix(rule.fix)
                    .with_severity(Severity::Medium)
                    .with_impact("Package manager caches stay in the layer and inflate the image")
                    .at_line(Some(run.line_number())),
                );
            }
        }
    }

    issues
}
