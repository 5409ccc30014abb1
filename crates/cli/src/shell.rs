//! # Interactive Shell
//!
//! Line-oriented stand-in for the converter page: stage files, pick an
//! operation, run it, read the error region.

use anyhow::Result;
use smartstudy_core::{Workbench, WorkflowEvent};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::{drain_events, render};

const HELP: &str = "\
Commands:
  add <path>...     Stage .pptx/.ppt files (directories are searched)
  files             List staged files
  clear             Remove all staged files
  catalog           List operations
  select <op>       Choose an operation (default, custom, terms, brainrot, audio, video)
  status            Show selection, state and last error
  run               Execute the selected operation
  help              Show this help
  quit              Leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Vec<PathBuf>),
    Files,
    Clear,
    Catalog,
    Select(String),
    Status,
    Run,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let args = split_args(line);
        let Some((command, rest)) = args.split_first() else {
            return Ok(None);
        };

        let parsed = match (command.as_str(), rest) {
            ("add", []) => return Err("Usage: add <path>...".to_string()),
            ("add", paths) => Self::Add(paths.iter().map(PathBuf::from).collect()),
            ("files" | "ls", []) => Self::Files,
            ("clear", []) => Self::Clear,
            ("catalog", []) => Self::Catalog,
            ("select", [op]) => Self::Select(op.clone()),
            ("select", _) => return Err("Usage: select <operation>".to_string()),
            ("status", []) => Self::Status,
            ("run" | "execute", []) => Self::Run,
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            (other, _) => return Err(format!("Unknown command: {} (try `help`)", other)),
        };
        Ok(Some(parsed))
    }
}

/// Whitespace split that keeps double-quoted segments together
fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

fn prompt() -> Result<()> {
    print!("smartstudy> ");
    std::io::stdout().flush()?;
    Ok(())
}

pub async fn run(bench: &Workbench, events: &mut mpsc::Receiver<WorkflowEvent>) -> Result<()> {
    println!("📚 Smart Study shell - service at {}", bench.config().base_url);
    println!("   Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        match ShellCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => dispatch(bench, events, command).await,
            Err(message) => eprintln!("{}", message),
        }
        prompt()?;
    }

    Ok(())
}

async fn dispatch(
    bench: &Workbench,
    events: &mut mpsc::Receiver<WorkflowEvent>,
    command: ShellCommand,
) {
    match command {
        ShellCommand::Add(paths) => match bench.stage_paths(&paths).await {
            Ok(count) => println!("📎 Staged {} file(s)", count),
            Err(e) => eprintln!("❌ {:#}", e),
        },
        ShellCommand::Files => print!("{}", render::files(&bench.status())),
        ShellCommand::Clear => {
            bench.clear_staging();
            println!("🧹 Staged files cleared");
        }
        ShellCommand::Catalog => print!(
            "{}",
            render::catalog(bench.catalog(), &bench.availability(), bench.selection())
        ),
        ShellCommand::Select(value) => match bench.select_value(&value) {
            Ok(id) => println!("✔ Selected {}", id),
            Err(e) => eprintln!("❌ {}", e),
        },
        ShellCommand::Status => print!("{}", render::status(&bench.status())),
        ShellCommand::Run => {
            if let Some(id) = bench.selection() {
                println!("⏳ Processing {}...", id);
            }
            let result = bench.execute().await;
            drain_events(events);
            match result {
                Ok(outcome) => println!(
                    "✅ {}",
                    outcome
                        .message
                        .unwrap_or_else(|| format!("Completed {}", outcome.operation))
                ),
                Err(e) => eprintln!("❌ {}", e),
            }
        }
        ShellCommand::Help => print!("{}", HELP),
        ShellCommand::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert_eq!(
            ShellCommand::parse("select terms").unwrap(),
            Some(ShellCommand::Select("terms".to_string()))
        );
        assert_eq!(ShellCommand::parse("run").unwrap(), Some(ShellCommand::Run));
        assert_eq!(ShellCommand::parse("exit").unwrap(), Some(ShellCommand::Quit));
        assert!(ShellCommand::parse("add").is_err());
        assert!(ShellCommand::parse("select a b").is_err());
        assert!(ShellCommand::parse("convert").is_err());
    }

    #[test]
    fn test_parse_add_with_quotes() {
        assert_eq!(
            ShellCommand::parse(r#"add "Lecture 1.pptx" decks/"#).unwrap(),
            Some(ShellCommand::Add(vec![
                PathBuf::from("Lecture 1.pptx"),
                PathBuf::from("decks/")
            ]))
        );
    }

    #[test]
    fn test_split_args_keeps_empty_quotes() {
        assert_eq!(split_args(r#"select """#), ["select", ""]);
    }
}
