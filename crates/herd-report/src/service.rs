//! End-to-end run sequencing: clear, collect, enrich, persist.

use crate::enrich::Enricher;
use crate::writer::ReportWriter;
use herd_collect::{filter_empty_groups, group_by_source_and_file, Orchestrator};
use herd_core::{CollectionConfig, Error, Result, RunReport, SourceKind};
use herd_fs::FileSystem;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Drives one complete report run.
///
/// Sequencing is fixed: previous output is cleared first so a run that
/// fails mid-way never leaves stale reports masquerading as current,
/// then collection, grouping, enrichment, and persistence. Any fatal
/// step error is wrapped into the stable top-level diagnostic error so
/// callers see one consistent surface.
pub struct ReportService<F: FileSystem> {
    orchestrator: Orchestrator,
    enricher: Enricher<F>,
    writer: ReportWriter<F>,
    fs: Arc<F>,
    output_root: PathBuf,
}

impl<F: FileSystem> ReportService<F> {
    pub fn new(
        orchestrator: Orchestrator,
        enricher: Enricher<F>,
        writer: ReportWriter<F>,
        fs: Arc<F>,
        output_root: PathBuf,
    ) -> Self {
        Self {
            orchestrator,
            enricher,
            writer,
            fs,
            output_root,
        }
    }

    /// Runs the full pipeline and returns the run's merged results.
    pub async fn run(&self, config: &CollectionConfig) -> Result<RunReport> {
        self.clear_previous_output().await?;

        let outcome = self
            .orchestrator
            .generate(config)
            .await
            .map_err(|err| Error::diagnostic(None, err))?;

        let groups = filter_empty_groups(group_by_source_and_file(&outcome.diagnostics));
        debug!(sources = groups.len(), "grouped diagnostics for enrichment");

        let enriched = self
            .enricher
            .enrich_all(&groups)
            .await
            .map_err(|err| Error::diagnostic(None, err))?;

        let write_stats = self
            .writer
            .write(&enriched)
            .await
            .map_err(|err| Error::diagnostic(None, err))?;

        info!(
            diagnostics = outcome.diagnostics.len(),
            files_written = write_stats.files_written,
            "report run complete"
        );

        Ok(RunReport {
            diagnostics: outcome.diagnostics,
            stats: outcome.stats,
            source_stats: outcome.source_stats,
            write_stats,
        })
    }

    /// Removes every source's previous `errors/` directory. Missing
    /// directories are fine.
    async fn clear_previous_output(&self) -> Result<()> {
        for kind in SourceKind::ALL {
            let dir = self.output_root.join(kind.as_str()).join("errors");
            self.fs.remove_dir_all(&dir).await.map_err(|err| {
                Error::diagnostic(
                    None,
                    Error::FileSystem {
                        path: dir.clone(),
                        source: err,
                    },
                )
            })?;
        }
        Ok(())
    }
}
