// src/checks/base_image.rs

//! Base image checks

use super::{Issue, Severity};
use crate::dockerfile::Dockerfile;

/// Known large base images and a slimmer image to suggest instead
static LARGE_BASE_IMAGES: &[(&str, &str)] = &[
    ("node", "node:alpine"),
    ("python", "python:alpine"),
    ("ruby", "ruby:alpine"),
    ("openjdk", "eclipse-temurin:21-jre-alpine"),
    ("php", "php:alpine"),
    ("nginx", "nginx:alpine"),
    ("ubuntu", "alpine"),
    ("debian", "debian:stable-slim"),
    ("centos", "rockylinux:9-minimal"),
    ("fedora", "fedora-minimal"),
];

/// Report the base image and flag large images and floating tags
pub fn check_base_image(dockerfile: &Dockerfile) -> Vec<Issue> {
    let image = dockerfile.base_image();
    let from_line = dockerfile.first_instruction("FROM").map(|i| i.line_number());

    let mut issues = vec![
        Issue::info(format!("Base image: {}", image))
            .with_severity(Severity::Info)
            .with_impact("Base image choice affects the final image size and security posture")
            .with_reference("https://docs.docker.com/develop/develop-images/baseimages/")
            .at_line(from_line),
    ];

    if let Some((name, alternative)) = large_image_alternative(image) {
        issues.push(
            Issue::warning(format!(
                "Using large base image ({}); consider a smaller alternative like alpine",
                name
            ))
            .with_fix(format!(
                "Replace '{}' with '{}' in your FROM instruction",
                image, alternative
            ))
            .with_severity(Severity::Medium)
            .with_impact("Larger base images increase the final image size and potential attack surface")
            .with_reference(
                "https://docs.docker.com/develop/develop-images/dockerfile_best-practices/#use-multi-stage-builds",
            )
            .with_reference("https://hub.docker.com/_/alpine")
            .at_line(from_line),
        );
    }

    if has_unpinned_tag(image) {
        issues.push(unpinned_tag_issue(image).at_line(from_line));
    }

    issues
}

/// Image name without registry, repository path, tag or digest
///
/// `registry.example.com:5000/library/node:18@sha256:...` becomes `node`.
pub fn bare_image_name(image: &str) -> &str {
    let without_digest = image.split('@').next().unwrap_or(image);
    let last_segment = without_digest.rsplit('/').next().unwrap_or(without_digest);
    last_segment.split(':').next().unwrap_or(last_segment)
}

/// Whether the reference uses `:latest` or carries no tag at all
///
/// A colon anywhere in the reference counts as a tag.
pub fn has_unpinned_tag(image: &str) -> bool {
    image.ends_with(":latest") || !image.contains(':')
}

/// Match the image against the large-image table
///
/// Returns the matched table entry and its suggested replacement.
pub fn large_image_alternative(image: &str) -> Option<(&'static str, &'static str)> {
    let name = bare_image_name(image);
    LARGE_BASE_IMAGES
        .iter()
        .find(|(large, _)| name.starts_with(large))
        .copied()
}

/// Warning for a `:latest` or missing tag, shared with the best-practice checks
pub(crate) fn unpinned_tag_issue(image: &str) -> Issue {
    let repository = image.strip_suffix(":latest").unwrap_or(image);

    Issue::warning("Using ':latest' tag or no tag specified; this is non-reproducible")
        .with_fix(format!(
            "Specify a fixed version tag for your base image, e.g., '{}:1.2.3'",
            repository
        ))
        .with_severity(Severity::High)
        .with_impact("Non-reproducible builds can lead to unexpected behavior and security issues")
        .with_reference("https://docs.docker.com/develop/dev-best-practices/#use-specific-tags")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::IssueKind;
    use crate::dockerfile::parse_dockerfile;
    use std::path::Path;

    fn check(content: &str) -> Vec<Issue> {
        check_base_image(&parse_dockerfile(content, Path::new("Dockerfile")))
    }

    #[test]
    fn test_bare_image_name() {
        assert_eq!(bare_image_name("node"), "node");
        assert_eq!(bare_image_name("node:18-alpine"), "node");
        assert_eq!(bare_image_name("library/python:3.12"), "python");
        assert_eq!(bare_image_name("registry.local:5000/team/ubuntu:22.04"), "ubuntu");
        assert_eq!(bare_image_name("debian@sha256:abcdef"), "debian");
    }

    #[test]
    fn test_has_unpinned_tag() {
        assert!(has_unpinned_tag("ubuntu"));
        assert!(has_unpinned_tag("ubuntu:latest"));
        assert!(!has_unpinned_tag("ubuntu:22.04"));
        assert!(!has_unpinned_tag("alpine@sha256:abc"));
    }

    #[test]
    fn test_large_image_alternative() {
        assert_eq!(large_image_alternative("node:18"), Some(("node", "node:alpine")));
        assert_eq!(large_image_alternative("docker.io/library/python"), Some(("python", "python:alpine")));
        assert_eq!(large_image_alternative("alpine:3.19"), None);
        assert_eq!(large_image_alternative("gcr.io/distroless/static"), None);
    }

    #[test]
    fn test_untagged_large_image() {
        let issues = check("FROM ubuntu\n");
        assert_eq!(issues.len(), 3);

        assert_eq!(issues[0].kind(), IssueKind::Info);
        assert_eq!(issues[0].message(), "Base image: ubuntu");
        assert_eq!(issues[0].line(), Some(1));

        assert!(issues[1].message().contains("large base image (ubuntu)"));
        assert_eq!(issues[1].severity(), Some(Severity::Medium));
        assert_eq!(
            issues[1].fix(),
            Some("Replace 'ubuntu' with 'alpine' in your FROM instruction")
        );

        assert!(issues[2].message().contains("':latest' tag or no tag"));
        assert_eq!(issues[2].severity(), Some(Severity::High));
        assert_eq!(
            issues[2].fix(),
            Some("Specify a fixed version tag for your base image, e.g., 'ubuntu:1.2.3'")
        );
    }

    #[test]
    fn test_latest_tag() {
        let issues = check("FROM alpine:latest\n");
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[1].fix(),
            Some("Specify a fixed version tag for your base image, e.g., 'alpine:1.2.3'")
        );
    }

    #[test]
    fn test_pinned_small_image_is_info_only() {
        let issues = check("FROM alpine:3.19\nRUN true\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind(), IssueKind::Info);
    }

    #[test]
    fn test_stage_alias_is_ignored() {
        let issues = check("FROM node:18 AS build\nFROM alpine\n");
        assert_eq!(issues[0].message(), "Base image: node:18");
        // node is large, the tag is pinned, and the second stage is not inspected
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_missing_from_reports_empty_image() {
        let issues = check("RUN echo hi\n");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind(), IssueKind::Info);
        assert_eq!(issues[0].message(), "Base image: ");
        assert_eq!(issues[0].line(), None);
        assert!(issues[1].message().contains("':latest' tag or no tag"));
    }
}
