//! Colored run summary printed after a report run.

use colored::*;
use herd_core::RunReport;
use std::path::Path;
use std::time::Duration;

pub fn print(report: &RunReport, output_root: &Path, elapsed: Duration) {
    println!();
    println!("{}", "Herd report".bold());
    println!();

    let sources = &report.source_stats;
    let source_line = format!(
        "{} run, {} succeeded, {} failed ({} timed out)",
        sources.total, sources.successful, sources.failed, sources.timed_out
    );
    if sources.failed > 0 {
        println!("  {} Sources: {}", "⚠".yellow(), source_line.yellow());
    } else {
        println!("  {} Sources: {}", "✓".green(), source_line);
    }

    let stats = &report.stats;
    if stats.total_count == 0 {
        println!("  {} No diagnostics found", "✓".green());
    } else {
        println!(
            "  {} {} diagnostics: {}, {}, {} info, {} notes",
            "✗".red(),
            stats.total_count,
            format!("{} errors", stats.error_count).red(),
            format!("{} warnings", stats.warning_count).yellow(),
            stats.info_count,
            stats.note_count
        );
        println!(
            "    across {} files",
            report.stats.total_by_file.len()
        );
    }

    let writes = &report.write_stats;
    if writes.files_written > 0 {
        println!(
            "  {} {} report files written to {} ({} bytes)",
            "✓".green(),
            writes.files_written,
            output_root.display().to_string().cyan(),
            writes.bytes_written
        );
    }

    println!();
    println!("  Finished in {:.2}s", elapsed.as_secs_f64());
}
