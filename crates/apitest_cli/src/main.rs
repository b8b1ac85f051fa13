//! apitest CLI - run and inspect the bundled API test suites.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod suites;

#[derive(Parser)]
#[command(name = "apitest")]
#[command(about = "Declarative API test runner", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run registered test suites
    Run {
        /// Only run the suite with this name
        #[arg(short, long)]
        suite: Option<String>,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Default per-test time budget in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// List registered suites and their tests
    List,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            suite,
            format,
            timeout,
        } => {
            let all_passed = commands::run::run(suite.as_deref(), &format, timeout)?;
            if !all_passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::List => commands::list::run(),
    }
}
