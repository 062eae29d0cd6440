//! The `report` command: configure, run the pipeline, summarize.

use crate::summary;
use anyhow::{Context, Result};
use colored::*;
use herd_collect::Orchestrator;
use herd_config::{Config, Overrides};
use herd_core::RunReport;
use herd_fs::NativeFileSystem;
use herd_report::{Enricher, ReadErrorPolicy, ReportService, ReportWriter};
use herd_sources::default_registry;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Which tool integrations to run (Vitest always runs)
    #[arg(long = "run", value_enum, default_value = "all")]
    run: RunMode,

    /// Output directory for reports (default: .herd under the project root)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<PathBuf>,

    /// Per-source timeout in milliseconds (0 disables the timeout)
    #[arg(short = 't', long = "timeout", value_name = "MS")]
    timeout: Option<u64>,

    /// Glob pattern to analyze (can be repeated)
    #[arg(long = "patterns", value_name = "PATTERN")]
    patterns: Vec<String>,

    /// Glob pattern to exclude (can be repeated)
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Tool configuration file (tsconfig / eslint config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project root to run in
    #[arg(long, default_value = ".")]
    cwd: PathBuf,

    /// Tolerate unreadable files by writing degraded reports
    #[arg(long)]
    allow_unreadable: bool,

    /// Exit zero even when diagnostics were found
    #[arg(long)]
    no_exit_on_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum RunMode {
    Eslint,
    Typescript,
    All,
}

impl RunMode {
    /// (eslint, typescript) enablement overrides; `None` leaves the
    /// config file value in place.
    fn source_overrides(self) -> (Option<bool>, Option<bool>) {
        match self {
            RunMode::Eslint => (Some(true), Some(false)),
            RunMode::Typescript => (Some(false), Some(true)),
            RunMode::All => (None, None),
        }
    }
}

pub async fn run(args: ReportArgs, verbose: u8) -> ExitCode {
    let no_exit_on_error = args.no_exit_on_error;
    let started = Instant::now();

    match execute(args).await {
        Ok((report, output_root)) => {
            summary::print(&report, &output_root, started.elapsed());
            if report.stats.total_count > 0 && !no_exit_on_error {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            if verbose > 0 {
                for cause in err.chain().skip(1) {
                    eprintln!("  {} {}", "caused by:".bright_black(), cause);
                }
            }
            ExitCode::from(2)
        }
    }
}

async fn execute(args: ReportArgs) -> Result<(RunReport, PathBuf)> {
    let root = std::fs::canonicalize(&args.cwd)
        .with_context(|| format!("project root not accessible: {}", args.cwd.display()))?;

    let mut config = Config::load_or_default(&root)?;
    config.apply_overrides(&build_overrides(&args));

    let collection = config.collection_config(&root, args.config.clone())?;
    let output_root = config.output_root(&root);

    let fs = Arc::new(NativeFileSystem::new());
    let policy = if args.allow_unreadable {
        ReadErrorPolicy::Degrade
    } else {
        ReadErrorPolicy::Fail
    };

    let service = ReportService::new(
        Orchestrator::new(default_registry()),
        Enricher::new(
            Arc::clone(&fs),
            root.clone(),
            policy,
            collection.concurrency,
        ),
        ReportWriter::new(Arc::clone(&fs), output_root.clone(), root),
        fs,
        output_root.clone(),
    );

    let report = service.run(&collection).await?;
    Ok((report, output_root))
}

fn build_overrides(args: &ReportArgs) -> Overrides {
    let (eslint, typescript) = args.run.source_overrides();
    Overrides {
        patterns: (!args.patterns.is_empty()).then(|| args.patterns.clone()),
        ignore: (!args.ignore.is_empty()).then(|| args.ignore.clone()),
        timeout_ms: args.timeout,
        eslint,
        typescript,
        output_dir: args.output.clone(),
    }
}
