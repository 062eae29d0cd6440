//! Herd CLI - Diagnostic collection and reporting for JavaScript/TypeScript.

mod report;
mod summary;

use clap::Parser;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "herd")]
#[command(version)]
#[command(about = "Collects ESLint, TypeScript, and Vitest diagnostics into structured reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (repeat for more detail)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the diagnostic sources and write per-file JSON reports
    #[command(visible_alias = "diagnostics")]
    Report(report::ReportArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Report(args) => report::run(args, cli.verbose).await,
    }
}

/// `RUST_LOG` wins when set; otherwise verbosity flags pick the level.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
