// src/cli.rs
//! CLI definitions for slimcheck

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slimcheck")]
#[command(author, version)]
#[command(about = "Check a Dockerfile for image size, best practice and security issues", long_about = None)]
pub struct Cli {
    /// Path to the Dockerfile
    pub dockerfile: Option<PathBuf>,

    /// Enable additional security checks
    #[arg(long)]
    pub security: bool,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image whose layer history is inspected (default: the base image)
    #[arg(long)]
    pub image: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log check progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
