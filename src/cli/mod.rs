//! CLI command definitions and handlers

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::ai::{HttpCompletionClient, ResilientCaller};
use crate::config::Config;
use crate::models::{RunReport, Severity};
use crate::pipeline::Pipeline;
use crate::reporters::{self, OutputFormat};

/// Refactory - design smell detection with LLM refactoring suggestions
#[derive(Parser, Debug)]
#[command(name = "refactory")]
#[command(
    version,
    about = "Detect design smells and generate refactoring suggestions",
    long_about = "Refactory scans a codebase for design smells (God Class, Large Class, \
Long Method, Long Parameter List, Feature Envy) with fast static rules, then asks an \
LLM for concrete refactoring suggestions, batched to stay inside free-tier rate limits.",
    after_help = "\
Examples:
  refactory scan .                         Detect smells, no network
  refactory scan . --format json -o report.json
  refactory suggest . --max-suggestions 5  Full run with LLM suggestions
  refactory suggest . --severity high      Only suggest fixes for high-severity smells

Set REFACTORY_API_KEY (or GROQ_API_KEY) to enable `suggest`."
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect design smells with static rules only (no network)
    Scan {
        /// Path to repository (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Detect smells and request refactoring suggestions from the LLM
    Suggest {
        /// Path to repository (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// Maximum smells to request suggestions for (prioritized by severity)
        #[arg(long, default_value = "10")]
        max_suggestions: usize,

        /// Only request suggestions for smells at or above this severity
        #[arg(long, value_parser = ["high", "medium", "low"])]
        severity: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
pub struct CommonArgs {
    /// Subdirectory to scan (relative to the repo path)
    #[arg(long)]
    pub scan_path: Option<PathBuf>,

    /// Maximum files to scan (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_files: usize,

    /// Output format: text, json, markdown (or md)
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
    pub format: String,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            scan_path: None,
            max_files: 0,
            format: "text".to_string(),
            output: None,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    // Bare `refactory` scans the current directory
    let command = cli.command.unwrap_or(Commands::Scan {
        path: PathBuf::from("."),
        common: CommonArgs::default(),
    });

    match command {
        Commands::Scan { path, common } => {
            let pipeline = build_pipeline(&path, &common)?;
            let report = pipeline.detect()?.into_report();
            emit(&report, &common)
        }

        Commands::Suggest {
            path,
            common,
            max_suggestions,
            severity,
        } => {
            let config = Config::load(&path)?;
            let client = HttpCompletionClient::from_env(&config.llm)
                .context("suggest needs an API key; run `scan` for offline detection")?;
            let mut caller =
                ResilientCaller::new(client, config.llm.models.clone(), &config.retry);

            let mut pipeline =
                configure(Pipeline::new(&path, config), &common).with_max_suggestions(max_suggestions);
            if let Some(severity) = severity {
                pipeline = pipeline.with_min_severity(parse_severity(&severity)?);
            }

            let spinner = suggestion_spinner();
            let report = pipeline.suggest(&mut caller);
            spinner.finish_and_clear();
            emit(&report?, &common)
        }
    }
}

fn build_pipeline(path: &Path, common: &CommonArgs) -> Result<Pipeline> {
    let config = Config::load(path)?;
    Ok(configure(Pipeline::new(path, config), common))
}

fn configure(mut pipeline: Pipeline, common: &CommonArgs) -> Pipeline {
    if let Some(scan_path) = &common.scan_path {
        pipeline = pipeline.with_scan_path(scan_path.clone());
    }
    if common.max_files > 0 {
        pipeline = pipeline.with_max_files(common.max_files);
    }
    pipeline
}

fn parse_severity(s: &str) -> Result<Severity> {
    match s.to_lowercase().as_str() {
        "high" => Ok(Severity::High),
        "medium" => Ok(Severity::Medium),
        "low" => Ok(Severity::Low),
        other => bail!("unknown severity '{other}'"),
    }
}

fn suggestion_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("requesting refactoring suggestions...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    spinner
}

fn emit(report: &RunReport, common: &CommonArgs) -> Result<()> {
    let format = OutputFormat::from_str(&common.format)?;
    let rendered = reporters::report_with_format(report, format)?;

    match &common.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} Report written to {}",
                style("✓").green(),
                path.display()
            );
            info!(format = %format, path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("HIGH").unwrap(), Severity::High);
        assert_eq!(parse_severity("medium").unwrap(), Severity::Medium);
        assert!(parse_severity("fatal").is_err());
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::parse_from(["refactory", "scan"]);
        match cli.command {
            Some(Commands::Scan { path, common }) => {
                assert_eq!(path, PathBuf::from("."));
                assert_eq!(common.format, "text");
                assert_eq!(common.max_files, 0);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_bare_invocation_defaults_to_scan() {
        let cli = Cli::parse_from(["refactory"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_suggest_flags() {
        let cli = Cli::parse_from([
            "refactory",
            "suggest",
            "/repo",
            "--max-suggestions",
            "5",
            "--severity",
            "high",
            "--format",
            "json",
        ]);
        match cli.command {
            Some(Commands::Suggest {
                path,
                common,
                max_suggestions,
                severity,
            }) => {
                assert_eq!(path, PathBuf::from("/repo"));
                assert_eq!(max_suggestions, 5);
                assert_eq!(severity.as_deref(), Some("high"));
                assert_eq!(common.format, "json");
            }
            _ => panic!("expected suggest"),
        }
    }
}
