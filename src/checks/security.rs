// src/checks/security.rs

//! Security checks, enabled with `--security`

use super::{Issue, Severity};
use crate::dockerfile::Dockerfile;

const CIS_DOCKER: &str = "https://www.cisecurity.org/benchmark/docker";

/// Run all security checks
pub fn run_security_checks(dockerfile: &Dockerfile) -> Vec<Issue> {
    let mut issues = Vec::new();

    // Root either explicitly or because USER is never set
    if dockerfile.uses_root_user() || !dockerfile.has_user() {
        let line = dockerfile.first_instruction("USER").map(|i| i.line_number());
        issues.push(
            Issue::security("Container runs as root; create a non-root user")
                .with_fix("RUN addgroup -S app && adduser -S app -G app\nUSER app")
                .with_severity(Severity::High)
                .with_impact("A compromised process gets root inside the container and an easier path to the host")
                .with_reference(
                    "https://docs.docker.com/develop/develop-images/dockerfile_best-practices/#user",
                )
                .at_line(line),
        );
    }

    if let Some(add) = dockerfile.first_add_with_url() {
        issues.push(
            Issue::security("Using ADD with URL; risky, use curl or wget instead")
                .with_fix("RUN curl -fsSLo /tmp/file <url> && echo '<sha256>  /tmp/file' | sha256sum -c -")
                .with_severity(Severity::Medium)
                .with_impact("Remote content is fetched without integrity verification")
                .at_line(Some(add.line_number())),
        );
    }

    let ports = dockerfile.exposed_ports();
    if !ports.is_empty() {
        let line = dockerfile.first_instruction("EXPOSE").map(|i| i.line_number());
        issues.push(
            Issue::security("EXPOSE ports found; verify each port is necessary")
                .with_fix(format!(
                    "Exposed ports: {}\nRemove any port the service does not listen on",
                    ports.join(", ")
                ))
                .with_severity(Severity::Low)
                .with_impact("Every exposed port widens the network attack surface")
                .at_line(line),
        );
    }

    if !dockerfile.has_copy_chown() && dockerfile.has_non_root_user() {
        let line = dockerfile.first_instruction("COPY").map(|i| i.line_number());
        issues.push(
            Issue::security("COPY without --chown flag; may cause permission issues for non-root user")
                .with_fix("COPY --chown=<user>:<group> <src> <dest>")
                .with_severity(Severity::Low)
                .at_line(line),
        );
    }

    if !dockerfile.has_non_root_user() {
        issues.push(
            Issue::security("No non-root USER specified; add 'USER nonroot' or similar")
                .with_severity(Severity::High)
                .with_reference(CIS_DOCKER),
        );
    }

    if !dockerfile.has_healthcheck() {
        issues.push(
            Issue::security("No HEALTHCHECK; add one to ensure container health monitoring")
                .with_severity(Severity::Low)
                .with_reference(CIS_DOCKER),
        );
    }

    if let Some(arg) = dockerfile.arg_before_first_from() {
        issues.push(
            Issue::security("ARG used before FROM; these values persist in image history")
                .with_fix("Pass secrets with RUN --mount=type=secret instead of build arguments")
                .with_severity(Severity::Medium)
                .with_impact("Build argument values can be read back from the image history and build cache")
                .at_line(Some(arg.line_number())),
        );
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::IssueKind;
    use crate::dockerfile::parse_dockerfile;
    use std::path::Path;

    fn check(content: &str) -> Vec<Issue> {
        run_security_checks(&parse_dockerfile(content, Path::new("Dockerfile")))
    }

    fn messages(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.message()).collect()
    }

    #[test]
    fn test_hardened_dockerfile() {
        let issues = check(
            "FROM alpine:3.19\nRUN adduser -D app\nCOPY --chown=app:app . /app\nUSER app\nHEALTHCHECK CMD true\n",
        );
        assert!(issues.is_empty(), "unexpected issues: {:?}", messages(&issues));
    }

    #[test]
    fn test_implicit_root() {
        let issues = check("FROM alpine:3.19\nHEALTHCHECK CMD true\n");
        assert_eq!(
            messages(&issues),
            vec![
                "Container runs as root; create a non-root user",
                "No non-root USER specified; add 'USER nonroot' or similar",
            ]
        );
        assert!(issues.iter().all(|i| i.kind() == IssueKind::Security));
        assert_eq!(issues[0].line(), None);
    }

    #[test]
    fn test_explicit_root() {
        let issues = check("FROM alpine:3.19\nUSER root\nHEALTHCHECK CMD true\n");
        assert_eq!(issues[0].message(), "Container runs as root; create a non-root user");
        assert_eq!(issues[0].line(), Some(2));
    }

    #[test]
    fn test_copy_without_chown() {
        let issues = check("FROM alpine:3.19\nCOPY . /app\nUSER appuser\nHEALTHCHECK CMD true\n");
        assert_eq!(
            messages(&issues),
            vec!["COPY without --chown flag; may cause permission issues for non-root user"]
        );
        assert_eq!(issues[0].line(), Some(2));
    }

    #[test]
    fn test_copy_with_chown() {
        let issues = check(
            "FROM alpine:3.19\nCOPY --chown=appuser:appuser . .\nUSER appuser\nHEALTHCHECK CMD true\n",
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_chown_not_required_without_non_root_user() {
        let issues = check("FROM alpine:3.19\nCOPY . .\nUSER root\nHEALTHCHECK CMD true\n");
        assert!(!messages(&issues).iter().any(|m| m.contains("--chown")));
    }

    #[test]
    fn test_add_with_url() {
        let issues = check(
            "FROM alpine:3.19\nADD https://example.com/app.tgz /opt/\nUSER app\nCOPY --chown=app . .\nHEALTHCHECK CMD true\n",
        );
        assert_eq!(messages(&issues), vec!["Using ADD with URL; risky, use curl or wget instead"]);
        assert_eq!(issues[0].line(), Some(2));
    }

    #[test]
    fn test_exposed_ports_listed_in_fix() {
        let issues = check(
            "FROM alpine:3.19\nEXPOSE 80 443\nEXPOSE 9090\nUSER app\nCOPY --chown=app . .\nHEALTHCHECK CMD true\n",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].fix(),
            Some("Exposed ports: 80, 443, 9090\nRemove any port the service does not listen on")
        );
        assert_eq!(issues[0].line(), Some(2));
    }

    #[test]
    fn test_missing_healthcheck() {
        let issues = check("FROM alpine:3.19\nUSER app\nCOPY --chown=app . .\n");
        assert_eq!(
            messages(&issues),
            vec!["No HEALTHCHECK; add one to ensure container health monitoring"]
        );
    }

    #[test]
    fn test_arg_before_from() {
        let issues = check(
            "ARG TOKEN\nFROM alpine:3.19\nUSER app\nCOPY --chown=app . .\nHEALTHCHECK CMD true\n",
        );
        assert_eq!(
            messages(&issues),
            vec!["ARG used before FROM; these values persist in image history"]
        );
        assert_eq!(issues[0].line(), Some(1));
    }

    #[test]
    fn test_arg_after_from_is_fine() {
        let issues = check(
            "FROM alpine:3.19\nARG VERSION\nUSER app\nCOPY --chown=app . .\nHEALTHCHECK CMD true\n",
        );
        assert!(issues.is_empty());
    }
}
