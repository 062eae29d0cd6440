//! Atomic structured persistence of file reports.

use chrono::Utc;
use herd_core::{Error, FileReport, Result, SourceKind, WriteStats};
use herd_fs::FileSystem;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Persists [`FileReport`]s under `<output_root>/<source>/errors/`, one
/// JSON file per analyzed source file.
///
/// Every file is written atomically (temp then rename), so a concurrent
/// reader never observes a half-written report. Reports are written
/// sequentially within one call; the first failure aborts the call and
/// surfaces that file's error. Unlike collection, writing is
/// all-or-nothing.
pub struct ReportWriter<F: FileSystem> {
    fs: Arc<F>,
    output_root: PathBuf,
    run_root: PathBuf,
}

impl<F: FileSystem> ReportWriter<F> {
    /// Creates a writer persisting under `output_root`; `run_root` is
    /// stripped from report paths when building file names.
    pub fn new(fs: Arc<F>, output_root: PathBuf, run_root: PathBuf) -> Self {
        Self {
            fs,
            output_root,
            run_root,
        }
    }

    /// Writes one JSON file per report, returning write statistics.
    pub async fn write(
        &self,
        reports: &BTreeMap<SourceKind, Vec<FileReport>>,
    ) -> Result<WriteStats> {
        let started = Instant::now();
        let mut files_written = 0usize;
        let mut bytes_written = 0usize;

        for (source, file_reports) in reports {
            if file_reports.is_empty() {
                continue;
            }

            let dir = self.output_root.join(source.as_str()).join("errors");
            self.fs
                .create_dir_all(&dir)
                .await
                .map_err(|err| Error::FileSystem {
                    path: dir.clone(),
                    source: err,
                })?;

            for report in file_reports {
                let path = dir.join(report_file_name(&self.run_root, &report.file_path));
                let json =
                    serde_json::to_string_pretty(report).map_err(|err| Error::Json {
                        path: path.clone(),
                        source: err,
                    })?;

                self.fs
                    .write_atomic(&path, &json)
                    .await
                    .map_err(|err| Error::FileSystem {
                        path: path.clone(),
                        source: err,
                    })?;

                files_written += 1;
                bytes_written += json.len();
                debug!(file = %path.display(), bytes = json.len(), "report written");
            }
        }

        Ok(WriteStats {
            files_written,
            bytes_written,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        })
    }
}

/// Flattens a report path into a per-source file name: the path
/// relative to the run root with separators replaced by `_`, suffixed
/// `.json`.
///
/// Two relative paths differing only in separator choice can collide;
/// accepted as a known limitation.
pub(crate) fn report_file_name(run_root: &Path, file_path: &str) -> String {
    let root = run_root.to_string_lossy();
    let relative = file_path
        .strip_prefix(root.as_ref())
        .map(|rest| rest.trim_start_matches(['/', '\\']))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(file_path);

    format!("{}.json", relative.replace(['/', '\\'], "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use herd_core::{Diagnostic, Severity};
    use herd_fs::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_file_name_flattening() {
        let root = Path::new("/project");
        assert_eq!(report_file_name(root, "src/app.ts"), "src_app.ts.json");
        assert_eq!(
            report_file_name(root, "/project/src/app.ts"),
            "src_app.ts.json"
        );
        assert_eq!(
            report_file_name(root, "src\\nested\\app.ts"),
            "src_nested_app.ts.json"
        );
        // Paths outside the run root keep their full shape, flattened.
        assert_eq!(
            report_file_name(root, "/elsewhere/app.ts"),
            "_elsewhere_app.ts.json"
        );
    }

    #[tokio::test]
    async fn test_write_produces_one_json_per_report() {
        let fs = MemoryFileSystem::new();
        let writer = ReportWriter::new(
            Arc::new(fs.clone()),
            PathBuf::from("/out"),
            PathBuf::from("/project"),
        );

        let diagnostics = vec![Diagnostic::new(
            SourceKind::Eslint,
            "src/a.ts",
            1,
            1,
            Severity::Error,
            Some("no-undef".to_string()),
            "x is not defined",
        )];
        let mut reports = BTreeMap::new();
        reports.insert(
            SourceKind::Eslint,
            vec![FileReport::new(
                "src/a.ts",
                PathBuf::from("/project/src/a.ts"),
                "const x = 1\n".to_string(),
                diagnostics,
                SourceKind::Eslint,
            )],
        );
        reports.insert(SourceKind::Typescript, vec![]);

        let stats = writer.write(&reports).await.unwrap();
        assert_eq!(stats.files_written, 1);
        assert!(stats.bytes_written > 0);

        let written = fs
            .contents("/out/eslint/errors/src_a.ts.json")
            .expect("report file present");
        assert_eq!(stats.bytes_written, written.len());

        // Payload is complete, parseable, camelCase JSON.
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["filePath"], "src/a.ts");
        assert_eq!(value["absolutePath"], "/project/src/a.ts");
        assert_eq!(value["encoding"], "utf-8");
        assert_eq!(value["lineCount"], 2);
        assert_eq!(value["metadata"]["instrument"], "eslint");
        assert_eq!(value["diagnostics"][0]["id"], "eslint:src/a.ts:1:1:no-undef");

        // Empty source groups produce no directory.
        assert!(!fs
            .exists(Path::new("/out/typescript/errors"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_artifacts() {
        let fs = MemoryFileSystem::new();
        let writer = ReportWriter::new(
            Arc::new(fs.clone()),
            PathBuf::from("/out"),
            PathBuf::from("/project"),
        );

        let mut reports = BTreeMap::new();
        reports.insert(
            SourceKind::Vitest,
            vec![
                FileReport::degraded(
                    "src/a.test.ts",
                    PathBuf::from("/project/src/a.test.ts"),
                    vec![],
                    SourceKind::Vitest,
                ),
                FileReport::degraded(
                    "src/b.test.ts",
                    PathBuf::from("/project/src/b.test.ts"),
                    vec![],
                    SourceKind::Vitest,
                ),
            ],
        );

        writer.write(&reports).await.unwrap();

        let paths = fs.file_paths();
        assert_eq!(paths.len(), 2);
        assert!(paths
            .iter()
            .all(|path| path.extension() == Some("json".as_ref())));
    }
}
