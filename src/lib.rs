// src/lib.rs

//! slimcheck: Dockerfile linter
//!
//! Parses a Dockerfile into a flat instruction list and checks it against
//! heuristics for image size, build hygiene and security.
//!
//! # Architecture
//!
//! - `dockerfile`: line scanner producing [`Dockerfile`] plus read-only queries
//! - `checks`: independent check groups producing [`Issue`]s, run by [`Linter`]
//! - `report`: text/JSON rendering and [`ExitStatus`]
//! - `config`: optional TOML tuning of check groups and thresholds
//!
//! The only external collaborator is the container CLI used for layer
//! history, reached through [`LayerHistory`].

pub mod checks;
pub mod config;
pub mod dockerfile;
mod error;
pub mod report;

pub use checks::{DockerHistory, Issue, IssueKind, LayerHistory, Linter, Severity};
pub use config::LintConfig;
pub use dockerfile::{parse_dockerfile, parse_dockerfile_file, Dockerfile, Instruction};
pub use error::{Error, Result};
pub use report::{ExitStatus, Summary};
