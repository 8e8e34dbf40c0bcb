// src/dockerfile/mod.rs

//! Dockerfile model
//!
//! A Dockerfile is parsed into a flat, ordered list of [`Instruction`]s.
//! There is no grammar beyond "command, then arguments": no variable
//! expansion, no heredocs, and no build-stage graph. Multi-stage builds are
//! kept as one instruction list, and only the first `FROM` is remembered as
//! the base image.
//!
//! # Example
//!
//! ```
//! use slimcheck::dockerfile::parse_dockerfile;
//! use std::path::Path;
//!
//! let df = parse_dockerfile(
//!     "FROM node:18 AS build\nRUN npm ci\nFROM alpine\n",
//!     Path::new("Dockerfile"),
//! );
//!
//! assert_eq!(df.instructions().len(), 3);
//! assert_eq!(df.base_image(), "node:18");
//! ```

pub mod parser;
mod query;

pub use parser::{parse_dockerfile, parse_dockerfile_file};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// One parsed directive, after continuation lines have been joined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    command: String,
    arguments: String,
    line_number: usize,
    raw_text: String,
}

impl Instruction {
    /// Create an instruction; the command is normalized to uppercase
    pub fn new(command: &str, arguments: &str, line_number: usize, raw_text: &str) -> Self {
        Self {
            command: command.to_uppercase(),
            arguments: arguments.to_string(),
            line_number,
            raw_text: raw_text.to_string(),
        }
    }

    /// Uppercase instruction keyword (`FROM`, `RUN`, ...)
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Everything after the keyword, possibly empty
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Line on which the instruction was completed (1-based)
    ///
    /// For instructions spanning several physical lines this is the last
    /// one, not the line where the instruction started.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Source text with continuations joined by single spaces
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Check the keyword, ignoring case
    pub fn is(&self, command: &str) -> bool {
        self.command.eq_ignore_ascii_case(command)
    }
}

/// A parsed Dockerfile
#[derive(Debug, Clone, Serialize)]
pub struct Dockerfile {
    path: PathBuf,
    instructions: Vec<Instruction>,
    base_image: String,
}

impl Dockerfile {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            instructions: Vec::new(),
            base_image: String::new(),
        }
    }

    /// Append an instruction, recording the base image on the first `FROM`
    pub(crate) fn push(&mut self, instruction: Instruction) {
        if instruction.is("FROM") && self.base_image.is_empty() {
            self.base_image = base_image_from_args(instruction.arguments());
        }
        self.instructions.push(instruction);
    }

    /// Path the Dockerfile was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All instructions in source order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Image reference of the first build stage, or `""` without a `FROM`
    pub fn base_image(&self) -> &str {
        &self.base_image
    }
}

/// Extract the image reference from `FROM` arguments
///
/// `FROM node:18 AS build` yields `node:18`; the stage alias is ignored.
fn base_image_from_args(arguments: &str) -> String {
    let fields: Vec<&str> = arguments.split_whitespace().collect();

    if let Some(pos) = fields.iter().position(|f| f.eq_ignore_ascii_case("AS"))
        && pos > 0
    {
        return fields[0].to_string();
    }

    fields.first().map(|s| s.to_string()).unwrap_or_default()
}
