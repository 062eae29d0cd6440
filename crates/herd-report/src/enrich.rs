//! Per-file report enrichment.

use futures::stream::{self, StreamExt, TryStreamExt};
use herd_core::{resolve_path, Diagnostic, Error, FileReport, Result, SourceKind};
use herd_fs::FileSystem;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// How a batch enrichment handles a file that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadErrorPolicy {
    /// A single read failure is fatal for the whole batch; the error
    /// carries the failing file's path.
    #[default]
    Fail,
    /// Every read failure yields a degraded report (empty content, zero
    /// size/lines) and the batch continues.
    Degrade,
}

/// Assembles [`FileReport`]s for (source, file) diagnostic groups.
///
/// Reads file content through the filesystem collaborator and pairs it
/// with the diagnostics reported against that file. Single-file
/// enrichment always degrades on read failure; batch enrichment follows
/// the configured [`ReadErrorPolicy`].
pub struct Enricher<F: FileSystem> {
    fs: Arc<F>,
    root: PathBuf,
    policy: ReadErrorPolicy,
    concurrency: usize,
}

impl<F: FileSystem> Enricher<F> {
    /// Creates an enricher reading relative paths against `root`.
    pub fn new(fs: Arc<F>, root: PathBuf, policy: ReadErrorPolicy, concurrency: usize) -> Self {
        Self {
            fs,
            root,
            policy,
            concurrency: concurrency.max(1),
        }
    }

    /// Builds a report for one file.
    ///
    /// A read failure is localized: it is logged and the report is
    /// degraded (empty content), never propagated.
    pub async fn enrich_file(
        &self,
        file_path: &str,
        diagnostics: Vec<Diagnostic>,
        source: SourceKind,
    ) -> Result<FileReport> {
        let absolute = resolve_path(&self.root, file_path.as_ref());
        match self.fs.read_to_string(&absolute).await {
            Ok(content) => Ok(FileReport::new(
                file_path, absolute, content, diagnostics, source,
            )),
            Err(err) => {
                warn!(
                    file = %absolute.display(),
                    error = %err,
                    "file read failed, emitting degraded report"
                );
                Ok(FileReport::degraded(file_path, absolute, diagnostics, source))
            }
        }
    }

    /// Builds reports for every (source, file) group.
    ///
    /// Empty input returns an empty map without touching the
    /// filesystem. Per-file reads run concurrently (bounded by the
    /// configured concurrency) and results keep input order.
    pub async fn enrich_all(
        &self,
        groups: &BTreeMap<SourceKind, Vec<(String, Vec<Diagnostic>)>>,
    ) -> Result<BTreeMap<SourceKind, Vec<FileReport>>> {
        let mut enriched = BTreeMap::new();

        for (source, files) in groups {
            if files.is_empty() {
                continue;
            }

            let reports: Vec<FileReport> = stream::iter(
                files
                    .iter()
                    .map(|(path, diagnostics)| self.batch_report(path, diagnostics.clone(), *source)),
            )
            .buffered(self.concurrency)
            .try_collect()
            .await?;

            enriched.insert(*source, reports);
        }

        Ok(enriched)
    }

    async fn batch_report(
        &self,
        file_path: &str,
        diagnostics: Vec<Diagnostic>,
        source: SourceKind,
    ) -> Result<FileReport> {
        let absolute = resolve_path(&self.root, file_path.as_ref());
        match self.fs.read_to_string(&absolute).await {
            Ok(content) => Ok(FileReport::new(
                file_path, absolute, content, diagnostics, source,
            )),
            Err(err) => match self.policy {
                ReadErrorPolicy::Fail => Err(Error::FileSystem {
                    path: absolute,
                    source: err,
                }),
                ReadErrorPolicy::Degrade => {
                    warn!(
                        file = %absolute.display(),
                        error = %err,
                        "file read failed, emitting degraded report"
                    );
                    Ok(FileReport::degraded(file_path, absolute, diagnostics, source))
                }
            },
        }
    }
}
