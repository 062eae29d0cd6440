//! Concurrent collection orchestrator.

use crate::aggregate::aggregate;
use crate::stats::StatisticsCollector;
use futures::future::join_all;
use herd_core::{
    CollectionConfig, Diagnostic, DiagnosticStatistics, Error, Result, SourceKind, SourceRegistry,
    SourceStatistics,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of one collection run.
#[derive(Debug, Clone)]
pub struct CollectionOutcome {
    /// Merged diagnostics from every successful source, in source
    /// registration order.
    pub diagnostics: Vec<Diagnostic>,
    /// Aggregate statistics over the merged diagnostics.
    pub stats: DiagnosticStatistics,
    /// How the active sources settled.
    pub source_stats: SourceStatistics,
}

/// Runs all active diagnostic sources concurrently and merges their
/// results, tolerating partial failure.
///
/// Every active source's `collect` future is issued together; when the
/// config carries a timeout each future is individually raced against
/// it. The orchestrator always waits for the full settle-set, so one
/// broken tool never prevents reporting the others' results. A timeout
/// poisons only its source's result; the underlying subprocess is not
/// signalled and may run to completion in the background (a leak bounded
/// by process lifetime).
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: SourceRegistry,
}

impl Orchestrator {
    /// Creates an orchestrator over a registry of sources.
    pub fn new(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    /// Collects diagnostics from all active sources.
    ///
    /// # Errors
    ///
    /// - [`Error::NoSourcesEnabled`] when the config disables every
    ///   registered source (fail fast, no retry).
    /// - [`Error::AllSourcesFailed`] when zero sources succeeded.
    ///
    /// Individual source failures and timeouts are folded into
    /// [`SourceStatistics`] instead of aborting the run.
    pub async fn generate(&self, config: &CollectionConfig) -> Result<CollectionOutcome> {
        let active: Vec<_> = self
            .registry
            .all()
            .iter()
            .filter(|source| config.is_source_enabled(source.kind()))
            .cloned()
            .collect();

        if active.is_empty() {
            return Err(Error::NoSourcesEnabled);
        }

        info!(
            sources = active.len(),
            timeout_ms = config.timeout_ms,
            "starting diagnostic collection"
        );

        let settled = join_all(active.iter().map(|source| {
            let source = Arc::clone(source);
            async move {
                let kind = source.kind();
                let result = if config.timeout_ms > 0 {
                    match tokio::time::timeout(
                        Duration::from_millis(config.timeout_ms),
                        source.collect(config),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(Error::SourceTimeout {
                            kind,
                            timeout_ms: config.timeout_ms,
                        }),
                    }
                } else {
                    source.collect(config).await
                };
                (kind, result)
            }
        }))
        .await;

        let mut source_stats = SourceStatistics {
            total: active.len(),
            ..Default::default()
        };
        let mut per_source: Vec<Vec<Diagnostic>> = Vec::new();

        for (kind, result) in settled {
            match result {
                Ok(diagnostics) => {
                    debug!(source = %kind, count = diagnostics.len(), "source completed");
                    source_stats.successful += 1;
                    per_source.push(diagnostics);
                }
                Err(err) => {
                    if err.is_timeout() {
                        source_stats.timed_out += 1;
                    }
                    source_stats.failed += 1;
                    warn!(source = %kind, error = %err, "source failed");
                }
            }
        }

        if source_stats.successful == 0 {
            return Err(Error::AllSourcesFailed {
                total: source_stats.total,
            });
        }

        let diagnostics = aggregate(&per_source);
        let mut collector = StatisticsCollector::new();
        collector.collect_all(diagnostics.clone());
        let stats = collector.snapshot();

        info!(
            total = diagnostics.len(),
            successful = source_stats.successful,
            failed = source_stats.failed,
            timed_out = source_stats.timed_out,
            "diagnostic collection complete"
        );

        Ok(CollectionOutcome {
            diagnostics,
            stats,
            source_stats,
        })
    }

    /// The sources this orchestrator runs, filtered per config flags.
    pub fn active_kinds(&self, config: &CollectionConfig) -> Vec<SourceKind> {
        self.registry
            .all()
            .iter()
            .map(|source| source.kind())
            .filter(|kind| config.is_source_enabled(*kind))
            .collect()
    }
}
