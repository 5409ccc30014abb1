//! Smart Study CLI
//!
//! Terminal front end for the processing workflow: stage presentation
//! files, choose an operation and submit it to the processing service.

mod render;
mod shell;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use smartstudy_core::{ExecutionOutcome, GatingPolicy, Workbench, WorkflowConfig, WorkflowEvent};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Clone)]
#[command(author, version, about = "Smart Study - PowerPoint conversion and study material generation")]
struct Args {
    /// Base URL of the processing service
    #[arg(long, global = true, env = "SMARTSTUDY_API_URL")]
    api_url: Option<String>,

    /// Refuse operations whose prerequisite was not produced in this session
    #[arg(long, global = true)]
    enforce_dependencies: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// List stages and their operations
    Catalog {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stage files and run a single operation
    Run {
        /// Operation to run (default, custom, terms, brainrot, audio, video)
        operation: String,
        /// Files or directories to stage before running
        paths: Vec<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session (default)
    Shell,
}

#[derive(Serialize)]
struct RunReport<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a ExecutionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &Args) -> Result<WorkflowConfig> {
    let mut config = WorkflowConfig::from_env().context("Invalid SMARTSTUDY_* environment")?;
    if let Some(url) = &args.api_url {
        config = config.with_base_url(url.clone());
    }
    if args.enforce_dependencies {
        config = config.with_gating(GatingPolicy::Enforce);
    }
    Ok(config)
}

/// Print the phase changes of the last execute call
pub(crate) fn drain_events(rx: &mut mpsc::Receiver<WorkflowEvent>) {
    while let Ok(event) = rx.try_recv() {
        if let Some(line) = render::event(&event) {
            println!("{}", line);
        }
    }
}

async fn run_once(
    bench: &Workbench,
    events: &mut mpsc::Receiver<WorkflowEvent>,
    operation: &str,
    paths: &[PathBuf],
    json: bool,
) -> Result<bool> {
    if !paths.is_empty() {
        let count = bench.stage_paths(paths).await?;
        if !json {
            println!("📎 Staged {} file(s)", count);
        }
    }

    let id = bench.select_value(operation)?;
    if !json {
        println!("⏳ Processing {}...", id);
    }
    let result = bench.execute().await;

    if json {
        let report = match &result {
            Ok(outcome) => RunReport {
                success: true,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => RunReport {
                success: false,
                outcome: None,
                error: Some(e.to_string()),
            },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(result.is_ok());
    }

    drain_events(events);
    match result {
        Ok(outcome) => {
            println!(
                "✅ {}",
                outcome
                    .message
                    .unwrap_or_else(|| format!("Completed {}", outcome.operation))
            );
            Ok(true)
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            Ok(false)
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    let config = resolve_config(&args)?;
    tracing::debug!(base_url = %config.base_url, gating = config.gating.as_str(), "Configuration resolved");

    let (tx, mut events) = mpsc::channel(64);
    let bench = Workbench::connect(config)?.with_event_channel(tx);

    match args.command {
        Some(CliCommand::Catalog { json }) => {
            if json {
                println!("{}", serde_json::to_string_pretty(bench.catalog().describe())?);
            } else {
                print!(
                    "{}",
                    render::catalog(bench.catalog(), &bench.availability(), None)
                );
            }
            Ok(true)
        }
        Some(CliCommand::Run {
            operation,
            paths,
            json,
        }) => run_once(&bench, &mut events, &operation, &paths, json).await,
        Some(CliCommand::Shell) | None => {
            shell::run(&bench, &mut events).await?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
