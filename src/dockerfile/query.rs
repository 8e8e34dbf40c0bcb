// src/dockerfile/query.rs

//! Read-only queries over a parsed Dockerfile
//!
//! These are deliberately shallow string heuristics. They look at raw
//! argument text and never interpret shell syntax.

use super::{Dockerfile, Instruction};
use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://").unwrap());

/// User names that mean "run as root"
const ROOT_USERS: &[&str] = &["root", "0"];

impl Dockerfile {
    /// Check if any instruction uses the given keyword (case-insensitive)
    pub fn has_instruction(&self, command: &str) -> bool {
        self.instructions.iter().any(|inst| inst.is(command))
    }

    /// All instructions with the given keyword, in source order
    pub fn instructions_by_command(&self, command: &str) -> Vec<&Instruction> {
        self.instructions
            .iter()
            .filter(|inst| inst.is(command))
            .collect()
    }

    /// First instruction with the given keyword
    pub fn first_instruction(&self, command: &str) -> Option<&Instruction> {
        self.instructions.iter().find(|inst| inst.is(command))
    }

    /// Check for a `HEALTHCHECK` instruction
    pub fn has_healthcheck(&self) -> bool {
        self.has_instruction("HEALTHCHECK")
    }

    /// Check for any `USER` instruction
    pub fn has_user(&self) -> bool {
        self.has_instruction("USER")
    }

    /// Check if the first `USER` instruction is explicitly `root` or `0`
    pub fn uses_root_user(&self) -> bool {
        self.first_instruction("USER")
            .is_some_and(|inst| is_root_user(inst.arguments()))
    }

    /// Check for a `USER` instruction naming someone other than root
    pub fn has_non_root_user(&self) -> bool {
        self.instructions_by_command("USER")
            .iter()
            .any(|inst| !is_root_user(inst.arguments()))
    }

    /// Check for an `ADD` whose arguments contain an http(s) URL
    pub fn has_add_with_url(&self) -> bool {
        self.first_add_with_url().is_some()
    }

    /// First `ADD` fetching from an http(s) URL
    pub fn first_add_with_url(&self) -> Option<&Instruction> {
        self.instructions
            .iter()
            .find(|inst| inst.is("ADD") && URL_PATTERN.is_match(inst.arguments()))
    }

    /// Check for a `COPY` that copies into `.`, as in `COPY . .`
    pub fn has_wildcard_copy(&self) -> bool {
        self.first_wildcard_copy().is_some()
    }

    /// First `COPY` instruction with a lone `.` destination
    ///
    /// A leading `.` source alone does not match: `COPY . /app` is fine.
    pub fn first_wildcard_copy(&self) -> Option<&Instruction> {
        self.instructions.iter().find(|inst| {
            let args = inst.arguments();
            inst.is("COPY") && (args.contains(" . ") || args.ends_with(" ."))
        })
    }

    /// Check for any `COPY --chown=...`
    pub fn has_copy_chown(&self) -> bool {
        self.instructions_by_command("COPY").iter().any(|inst| {
            inst.arguments()
                .split_whitespace()
                .any(|token| token == "--chown" || token.starts_with("--chown="))
        })
    }

    /// First `ARG` that appears before any `FROM`
    pub fn arg_before_first_from(&self) -> Option<&Instruction> {
        self.instructions
            .iter()
            .take_while(|inst| !inst.is("FROM"))
            .find(|inst| inst.is("ARG"))
    }

    /// Ports declared by all `EXPOSE` instructions, unvalidated
    pub fn exposed_ports(&self) -> Vec<&str> {
        self.instructions_by_command("EXPOSE")
            .into_iter()
            .flat_map(|inst| inst.arguments().split_whitespace())
            .collect()
    }
}

fn is_root_user(user: &str) -> bool {
    ROOT_USERS.contains(&user.trim())
}
