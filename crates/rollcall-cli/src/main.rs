//! Rollcall - check exam results by roll number from the terminal.
//!
//! This binary is a thin presenter over `rollcall-core`: it builds the
//! configured roster source and cache, runs lookups, and prints the results.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rollcall_core::{Config, LookupResult, LookupService, SourceKind};

#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about = "Check exam results by roll number")]
struct Cli {
    /// Roster source type: remote, spreadsheet_file or json_file
    #[arg(long, global = true)]
    source_kind: Option<SourceKind>,

    /// Roster URL or file path
    #[arg(long = "source", global = true)]
    source_location: Option<String>,

    /// Seconds before the cached roster is reloaded
    #[arg(long, global = true)]
    ttl_seconds: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up one or more roll numbers
    Lookup {
        #[arg(required = true)]
        roll_numbers: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read roll numbers from stdin, one per line (:refresh, :age, :quit)
    Repl,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(kind) = cli.source_kind {
        config.source_kind = kind;
    }
    if let Some(location) = cli.source_location {
        config.source_location = location;
    }
    if let Some(ttl) = cli.ttl_seconds {
        config.ttl_seconds = ttl;
    }
    info!(
        source_kind = %config.source_kind,
        source = %config.source_location,
        ttl_seconds = config.ttl_seconds,
        "Rollcall starting"
    );

    let service = config.build_service()?;

    match cli.command {
        Command::Lookup { roll_numbers, json } => lookup(&service, &roll_numbers, json).await,
        Command::Repl => repl(&service).await,
    }
}

/// Run all lookups concurrently; they share one roster load.
async fn lookup(service: &LookupService, roll_numbers: &[String], json: bool) -> Result<()> {
    let results =
        futures::future::join_all(roll_numbers.iter().map(|r| service.find_status(r))).await;

    if json {
        let output = if results.len() == 1 {
            serde_json::to_string_pretty(&results[0])?
        } else {
            serde_json::to_string_pretty(&results)?
        };
        println!("{}", output);
    } else {
        for result in &results {
            print_result(result);
        }
    }
    Ok(())
}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Quit,
    Refresh,
    Age,
    /// Any other line, including an empty one, which looks up "00000000".
    Lookup(&'a str),
}

fn parse_repl_line(line: &str) -> ReplCommand<'_> {
    match line.trim() {
        ":quit" | ":q" => ReplCommand::Quit,
        ":refresh" => ReplCommand::Refresh,
        ":age" => ReplCommand::Age,
        roll_number => ReplCommand::Lookup(roll_number),
    }
}

/// Read roll numbers from stdin until EOF or `:quit`.
/// Blank lines are looked up like any other input.
async fn repl(service: &LookupService) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("roll number> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        match parse_repl_line(&line) {
            ReplCommand::Quit => return Ok(()),
            ReplCommand::Refresh => println!("{}", service.invalidate_roster().message),
            ReplCommand::Age => match service.cache().cached_at() {
                Some(at) => println!(
                    "Roster loaded {} ({})",
                    service.cache().cached_age().unwrap_or_default(),
                    at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
                None => println!("Roster not loaded"),
            },
            ReplCommand::Lookup(roll_number) => {
                print_result(&service.find_status(roll_number).await)
            }
        }
    }
}

fn print_result(result: &LookupResult) {
    match result {
        LookupResult::Found {
            registration_number,
            sheet_name,
            exam_result,
            message,
        } => {
            println!("✓ Congratulations!");
            println!("  Roll Number: {}", registration_number);
            println!("  Status: {}", result.status_label());
            println!("  Result: {} ({})", exam_result, sheet_name);
            println!("  {}", message);
        }
        LookupResult::NotFound {
            registration_number,
            message,
        } => {
            println!("✗ Keep pushing forward!");
            println!("  Roll Number: {}", registration_number);
            println!("  Status: {}", result.status_label());
            println!("  {}", message);
        }
        LookupResult::LoadError { .. } => {
            println!("✗ {}", result.user_message());
        }
    }
}
