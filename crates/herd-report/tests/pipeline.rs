//! End-to-end pipeline tests over an in-memory filesystem and static
//! sources.

use herd_collect::Orchestrator;
use herd_core::{
    CollectionConfig, Diagnostic, DiagnosticSource, Error, Result, Severity, SourceKind,
    SourceRegistry,
};
use herd_fs::{FileSystem, MemoryFileSystem};
use herd_report::{Enricher, ReadErrorPolicy, ReportService, ReportWriter};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct StaticSource {
    kind: SourceKind,
    diagnostics: Vec<Diagnostic>,
}

#[async_trait::async_trait]
impl DiagnosticSource for StaticSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn collect(&self, _config: &CollectionConfig) -> Result<Vec<Diagnostic>> {
        Ok(self.diagnostics.clone())
    }
}

struct FailingSource {
    kind: SourceKind,
}

#[async_trait::async_trait]
impl DiagnosticSource for FailingSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn collect(&self, _config: &CollectionConfig) -> Result<Vec<Diagnostic>> {
        Err(Error::Source {
            kind: self.kind,
            message: "tool is broken".to_string(),
        })
    }
}

fn diagnostic(source: SourceKind, file: &str, line: u32, severity: Severity) -> Diagnostic {
    Diagnostic::new(
        source,
        file,
        line,
        1,
        severity,
        Some("rule".to_string()),
        "something is off",
    )
}

fn service(fs: &MemoryFileSystem, registry: SourceRegistry) -> ReportService<MemoryFileSystem> {
    let fs = Arc::new(fs.clone());
    let root = PathBuf::from("/project");
    let output = PathBuf::from("/project/.herd");
    ReportService::new(
        Orchestrator::new(registry),
        Enricher::new(Arc::clone(&fs), root.clone(), ReadErrorPolicy::Degrade, 4),
        ReportWriter::new(Arc::clone(&fs), output.clone(), root),
        fs,
        output,
    )
}

fn config() -> CollectionConfig {
    CollectionConfig {
        root_path: PathBuf::from("/project"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_full_run_writes_reports_at_expected_paths() {
    let fs = MemoryFileSystem::new();
    fs.insert_file("/project/src/app.ts", "const x: number = 'no'\n");
    fs.insert_file("/project/src/util.ts", "export const y = z\n");

    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(StaticSource {
        kind: SourceKind::Eslint,
        diagnostics: vec![
            diagnostic(SourceKind::Eslint, "src/util.ts", 1, Severity::Error),
            diagnostic(SourceKind::Eslint, "src/util.ts", 1, Severity::Warning),
        ],
    }));
    registry.register(Arc::new(StaticSource {
        kind: SourceKind::Typescript,
        diagnostics: vec![diagnostic(
            SourceKind::Typescript,
            "src/app.ts",
            1,
            Severity::Error,
        )],
    }));

    let report = service(&fs, registry).run(&config()).await.unwrap();

    assert_eq!(report.diagnostics.len(), 3);
    assert_eq!(report.stats.total_count, 3);
    assert_eq!(report.stats.error_count, 2);
    assert_eq!(report.stats.warning_count, 1);
    assert_eq!(report.source_stats.total, 2);
    assert_eq!(report.source_stats.successful, 2);
    assert_eq!(report.write_stats.files_written, 2);

    let eslint = fs
        .contents("/project/.herd/eslint/errors/src_util.ts.json")
        .expect("eslint report present");
    let value: serde_json::Value = serde_json::from_str(&eslint).unwrap();
    assert_eq!(value["filePath"], "src/util.ts");
    assert_eq!(value["sourceCode"], "export const y = z\n");
    assert_eq!(value["diagnostics"].as_array().unwrap().len(), 2);
    assert_eq!(value["metadata"]["instrument"], "eslint");
    assert_eq!(value["metadata"]["diagnosticCount"], 2);
    assert_eq!(value["metadata"]["errorCount"], 1);
    assert_eq!(value["metadata"]["warningCount"], 1);

    assert!(fs
        .contents("/project/.herd/typescript/errors/src_app.ts.json")
        .is_some());

    // Atomic writes leave no temp artifacts behind.
    assert!(fs
        .file_paths()
        .iter()
        .all(|path| path.extension() == Some("json".as_ref())));
}

#[tokio::test]
async fn test_run_clears_stale_output_first() {
    let fs = MemoryFileSystem::new();
    fs.insert_file("/project/src/app.ts", "let a\n");
    fs.insert_file(
        "/project/.herd/eslint/errors/src_old.ts.json",
        "{\"stale\": true}",
    );
    fs.insert_file(
        "/project/.herd/vitest/errors/src_old.test.ts.json",
        "{\"stale\": true}",
    );

    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(StaticSource {
        kind: SourceKind::Eslint,
        diagnostics: vec![diagnostic(SourceKind::Eslint, "src/app.ts", 1, Severity::Error)],
    }));

    service(&fs, registry).run(&config()).await.unwrap();

    assert!(fs
        .contents("/project/.herd/eslint/errors/src_old.ts.json")
        .is_none());
    assert!(fs
        .contents("/project/.herd/vitest/errors/src_old.test.ts.json")
        .is_none());
    assert!(fs
        .contents("/project/.herd/eslint/errors/src_app.ts.json")
        .is_some());
}

#[tokio::test]
async fn test_partial_failure_still_produces_reports() {
    let fs = MemoryFileSystem::new();
    fs.insert_file("/project/src/app.ts", "let a\n");

    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(FailingSource {
        kind: SourceKind::Eslint,
    }));
    registry.register(Arc::new(StaticSource {
        kind: SourceKind::Typescript,
        diagnostics: vec![diagnostic(
            SourceKind::Typescript,
            "src/app.ts",
            1,
            Severity::Error,
        )],
    }));

    let report = service(&fs, registry).run(&config()).await.unwrap();

    assert_eq!(report.source_stats.total, 2);
    assert_eq!(report.source_stats.successful, 1);
    assert_eq!(report.source_stats.failed, 1);
    assert_eq!(report.source_stats.timed_out, 0);
    assert_eq!(report.write_stats.files_written, 1);
    assert!(fs
        .contents("/project/.herd/typescript/errors/src_app.ts.json")
        .is_some());
    assert!(!fs
        .exists(Path::new("/project/.herd/eslint/errors"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_all_sources_failing_is_a_stable_top_level_error() {
    let fs = MemoryFileSystem::new();

    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(FailingSource {
        kind: SourceKind::Eslint,
    }));
    registry.register(Arc::new(FailingSource {
        kind: SourceKind::Typescript,
    }));

    let err = service(&fs, registry).run(&config()).await.unwrap_err();
    match err {
        Error::Diagnostic { message, cause, .. } => {
            assert!(matches!(
                cause.as_deref(),
                Some(Error::AllSourcesFailed { total: 2 })
            ));
            assert_eq!(message, Error::AllSourcesFailed { total: 2 }.to_string());
        }
        other => panic!("expected Diagnostic error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_clean_run_writes_nothing() {
    let fs = MemoryFileSystem::new();
    fs.insert_file("/project/src/app.ts", "let a\n");

    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(StaticSource {
        kind: SourceKind::Eslint,
        diagnostics: vec![],
    }));

    let report = service(&fs, registry).run(&config()).await.unwrap();

    assert_eq!(report.diagnostics.len(), 0);
    assert_eq!(report.stats.total_count, 0);
    assert_eq!(report.write_stats.files_written, 0);
    assert_eq!(report.write_stats.bytes_written, 0);
    assert!(fs.file_paths().iter().all(|path| path.starts_with("/project/src")));
}

#[tokio::test]
async fn test_unreadable_file_degrades_instead_of_aborting() {
    let fs = MemoryFileSystem::new();
    // Diagnostic points at a file that does not exist in the fs.

    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(StaticSource {
        kind: SourceKind::Eslint,
        diagnostics: vec![diagnostic(
            SourceKind::Eslint,
            "src/ghost.ts",
            1,
            Severity::Error,
        )],
    }));

    let report = service(&fs, registry).run(&config()).await.unwrap();
    assert_eq!(report.write_stats.files_written, 1);

    let written = fs
        .contents("/project/.herd/eslint/errors/src_ghost.ts.json")
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["sourceCode"], "");
    assert_eq!(value["lineCount"], 0);
    assert_eq!(value["size"], 0);
    assert_eq!(value["diagnostics"].as_array().unwrap().len(), 1);
}
