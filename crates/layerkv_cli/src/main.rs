//! layerkv CLI
//!
//! Interactive shell for the layerkv nested-transaction store.
//!
//! # Commands
//!
//! - `READ <key>` - Print the value of a key
//! - `WRITE <key> <value>` - Store a value (may contain spaces)
//! - `DELETE <key>` - Remove a key
//! - `START` - Open a nested transaction
//! - `COMMIT` - Merge the innermost transaction one level down
//! - `ABORT` - Discard the innermost transaction
//! - `QUIT` - Exit, abandoning any open transactions

mod parser;
mod repl;

use clap::Parser;
use layerkv_core::{Config, Store};
use repl::Repl;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// In-memory key-value store with nested transactions.
#[derive(Parser)]
#[command(name = "layerkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Trace every read, write and delete (implies --verbose)
    #[arg(long)]
    trace: bool,

    /// Do not print a prompt
    #[arg(short, long)]
    quiet: bool,

    /// Prompt printed before each command
    #[arg(long, default_value = "> ")]
    prompt: String,

    /// Read commands from this file instead of standard input
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print operation statistics as JSON on exit
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let store = Store::with_config(Config::new().trace_operations(cli.trace));
    debug!(version = layerkv_core::VERSION, "session started");

    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open script {}: {e}", path.display()))?;
            run_session(&cli, store, BufReader::new(file), None)
        }
        None => {
            let prompt = (!cli.quiet).then(|| cli.prompt.clone());
            run_session(&cli, store, io::stdin().lock(), prompt)
        }
    }
}

fn run_session<R: BufRead>(
    cli: &Cli,
    store: Store,
    input: R,
    prompt: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = Repl::new(store, input, io::stdout().lock(), io::stderr().lock())
        .with_prompt(prompt);
    let abandoned = repl.run()?;
    debug!(abandoned, "session ended");

    if cli.stats {
        let stats = serde_json::to_string(&repl.store().stats().snapshot())?;
        eprintln!("{stats}");
    }

    Ok(())
}
