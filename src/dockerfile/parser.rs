// src/dockerfile/parser.rs

//! Line-oriented Dockerfile parser

use super::{Dockerfile, Instruction};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, trace};

/// Parse Dockerfile text
///
/// Never fails: anything that is not blank or a comment becomes an
/// instruction, even if the keyword is unknown or the arguments are empty.
pub fn parse_dockerfile(content: &str, path: &Path) -> Dockerfile {
    let mut dockerfile = Dockerfile::new(path);
    let mut pending: Vec<&str> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;
        let trimmed = line.trim();

        // A blank line ends a pending continuation
        if trimmed.is_empty() {
            if !pending.is_empty() {
                finish_instruction(&mut dockerfile, &mut pending, line_number);
            }
            continue;
        }

        // Comments are dropped, including inside a continuation
        if trimmed.starts_with('#') {
            continue;
        }

        if let Some(stripped) = trimmed.strip_suffix('\\') {
            let stripped = stripped.trim_end();
            if !stripped.is_empty() {
                pending.push(stripped);
            }
            continue;
        }

        pending.push(trimmed);
        finish_instruction(&mut dockerfile, &mut pending, line_number);
    }

    if !pending.is_empty() {
        debug!("Dropping unterminated line continuation at end of file");
    }

    debug!(
        "Parsed {} instructions from {} (base image: '{}')",
        dockerfile.instructions().len(),
        path.display(),
        dockerfile.base_image()
    );

    dockerfile
}

/// Join the buffered physical lines into one instruction
fn finish_instruction(dockerfile: &mut Dockerfile, pending: &mut Vec<&str>, line_number: usize) {
    let logical = pending.join(" ");
    pending.clear();

    let instruction = parse_instruction(&logical, line_number);
    trace!(
        "Line {}: {} {}",
        line_number,
        instruction.command(),
        instruction.arguments()
    );
    dockerfile.push(instruction);
}

/// Read and parse a Dockerfile from disk
///
/// Content that is not valid UTF-8 is a [`Error::ParseError`]; any other
/// read failure is an [`Error::IoError`].
pub fn parse_dockerfile_file(path: &Path) -> Result<Dockerfile> {
    if !path.exists() {
        return Err(Error::NotFoundError(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            Error::ParseError(e.to_string())
        } else {
            Error::IoError(format!("Failed to read {}: {}", path.display(), e))
        }
    })?;

    Ok(parse_dockerfile(&content, path))
}

/// Split a logical line into keyword and arguments
fn parse_instruction(logical: &str, line_number: usize) -> Instruction {
    let (command, arguments) = match logical.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (logical, ""),
    };

    Instruction::new(command, arguments, line_number, logical)
}
