// src/checks/layer_size.rs

//! Layer size analysis from image history
//!
//! Layer sizes come from an external container CLI (`docker history` by
//! default). The CLI is reached through the [`LayerHistory`] trait so the
//! size rules can run against canned output.

use super::{Issue, Severity};
use crate::config::LayersSection;
use crate::dockerfile::Dockerfile;
use std::process::Command;
use tracing::{debug, trace};

/// Source of per-layer size data for an image
pub trait LayerHistory {
    /// Check whether the history tool can be used at all
    fn is_available(&self) -> bool;

    /// Raw history output for `image`: one byte count per line, in layer order
    ///
    /// Returns `None` if the tool failed; that is treated as "no data".
    fn history(&self, image: &str) -> Option<String>;
}

/// [`LayerHistory`] backed by a docker-compatible CLI
#[derive(Debug, Clone)]
pub struct DockerHistory {
    command: String,
}

impl DockerHistory {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl LayerHistory for DockerHistory {
    fn is_available(&self) -> bool {
        if which::which(&self.command).is_err() {
            debug!("{} not found in PATH", self.command);
            return false;
        }

        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn history(&self, image: &str) -> Option<String> {
        debug!("Querying layer history for {} via {}", image, self.command);

        let output = match Command::new(&self.command)
            .args(["history", "--human=false", "--format", "{{.Size}}", image])
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!("Failed to run {} history: {}", self.command, e);
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                "{} history failed: {}",
                self.command,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse history output into `(layer index, bytes)` pairs
///
/// The index is the line position in the output. Lines that are not a
/// plain byte count are skipped but still occupy an index.
pub fn parse_layer_sizes(output: &str) -> Vec<(usize, u64)> {
    output
        .trim()
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line.trim().parse::<u64>() {
            Ok(size) => Some((idx, size)),
            Err(_) => {
                trace!("Skipping malformed layer size {:?} at index {}", line, idx);
                None
            }
        })
        .collect()
}

/// Flag large layers and sudden growth between layers
///
/// Runs only when the history tool is available. Layer 0 (the base) is
/// never flagged. A layer is flagged when it exceeds `max_layer_bytes`, and
/// separately when it outgrows the previous layer by both `growth_factor`
/// and `min_growth_bytes`.
pub fn check_layer_sizes(
    dockerfile: &Dockerfile,
    image: &str,
    history: &dyn LayerHistory,
    limits: &LayersSection,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !dockerfile.has_instruction("FROM") || image.is_empty() {
        return issues;
    }

    if !history.is_available() {
        debug!("Image history tool unavailable, skipping layer size checks");
        return issues;
    }

    let Some(output) = history.history(image) else {
        return issues;
    };

    let suggestion = multistage_suggestion(dockerfile.base_image());
    let mut prev_size: u64 = 0;

    for (idx, size) in parse_layer_sizes(&output) {
        if idx > 0 {
            if size > limits.max_layer_bytes {
                issues.push(
                    Issue::warning(format!(
                        "Layer {} adds {}MB; consider using multistage builds",
                        idx,
                        size / 1_000_000
                    ))
                    .with_fix(suggestion)
                    .with_severity(Severity::Medium)
                    .with_impact("Large layers slow down pulls and deployments")
                    .with_reference("https://docs.docker.com/build/building/multi-stage/"),
                );
            }

            let growth = size.saturating_sub(prev_size);
            if prev_size > 0
                && size as f64 > prev_size as f64 * limits.growth_factor
                && growth > limits.min_growth_bytes
            {
                issues.push(
                    Issue::warning(format!(
                        "Layer {} grows by {}MB; check for unneeded files",
                        idx,
                        growth / 1_000_000
                    ))
                    .with_fix(suggestion)
                    .with_severity(Severity::Low)
                    .with_impact("Build artifacts and caches left in a layer are shipped with the image"),
                );
            }
        }

        prev_size = size;
    }

    issues
}

/// Multi-stage build pattern for the base image's ecosystem
pub fn multistage_suggestion(base_image: &str) -> &'static str {
    let name = super::bare_image_name(base_image);

    if name.starts_with("node") {
        "Use multistage build: FROM node:slim AS build + FROM node:alpine"
    } else if name.starts_with("python") {
        "Use multistage build: FROM python:slim AS build + FROM python:alpine"
    } else if name.starts_with("openjdk") {
        "Use multistage build: FROM openjdk:slim AS build + FROM eclipse-temurin:slim"
    } else if name.starts_with("golang") {
        "Use multistage build: FROM golang:alpine AS build + FROM alpine"
    } else {
        "Consider using a multistage build to reduce image size"
    }
}
