// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat};
use slimcheck::report::{self, ExitStatus};
use slimcheck::{parse_dockerfile_file, LintConfig, Linter};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

fn main() -> ExitCode {
    // clap exits with 2 on usage errors, which would read as "issues found"
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitStatus::Error.into()
            } else {
                ExitStatus::Clean.into()
            };
        }
    };

    // Logs go to stderr so stdout carries only the report
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(status) => status.into(),
        Err(e) => {
            println!("Error: {:#}", e);
            ExitStatus::Error.into()
        }
    }
}

fn run(cli: &Cli) -> Result<ExitStatus> {
    let Some(path) = cli.dockerfile.as_deref() else {
        println!("Error: No Dockerfile specified");
        println!("Usage: slimcheck ./Dockerfile [--security]");
        return Ok(ExitStatus::Error);
    };

    let config = match &cli.config {
        Some(config_path) => {
            debug!("Loading configuration from {}", config_path.display());
            LintConfig::load(config_path)?
        }
        None => LintConfig::default(),
    };

    let dockerfile = parse_dockerfile_file(path)?;

    let context_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut linter = Linter::new(config, context_dir).with_image(cli.image.clone());
    if cli.security {
        linter = linter.with_security(true);
    }

    let color = !cli.no_color && std::io::stdout().is_terminal();

    if cli.format == OutputFormat::Text {
        print!("{}", report::header(&dockerfile));
    }

    let issues = linter.run(&dockerfile);
    info!("{} issues found in {}", issues.len(), path.display());

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&issues, color)),
        OutputFormat::Json => println!(
            "{}",
            report::render_json(&dockerfile, &issues).context("Failed to serialize report")?
        ),
    }

    Ok(ExitStatus::from_issues(&issues))
}
