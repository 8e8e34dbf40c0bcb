// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use slimcheck::LayerHistory;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a Dockerfile into a fresh build context.
///
/// Returns (TempDir, dockerfile_path) - keep the TempDir alive to prevent cleanup.
pub fn write_dockerfile(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("Dockerfile");
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Path to one of the sample Dockerfiles under `demos/`.
pub fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

/// History source that reports the tool as missing.
pub struct NoHistory;

impl LayerHistory for NoHistory {
    fn is_available(&self) -> bool {
        false
    }

    fn history(&self, _image: &str) -> Option<String> {
        None
    }
}

/// History source returning fixed `docker history` output.
pub struct FixedHistory(pub &'static str);

impl LayerHistory for FixedHistory {
    fn is_available(&self) -> bool {
        true
    }

    fn history(&self, _image: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}
