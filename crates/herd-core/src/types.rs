//! Core data types for the Herd diagnostic pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Severity of a diagnostic, on a fixed 4-level scale.
///
/// The derived ordering places `Error` highest:
/// `Error > Warning > Info > Note`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Supplementary note attached to another finding.
    Note,
    /// Informational finding.
    Info,
    /// Should be reviewed.
    Warning,
    /// Must be fixed.
    Error,
}

impl Severity {
    /// All severities, lowest to highest.
    pub const ALL: [Severity; 4] = [
        Severity::Note,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Returns the lowercase name used on the wire and in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of diagnostic integrations Herd collects from.
///
/// Derives `Ord` so `BTreeMap<SourceKind, _>` groupings iterate in a
/// stable order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// ESLint lint findings.
    Eslint,
    /// TypeScript compiler (`tsc --noEmit`) type errors.
    Typescript,
    /// Vitest test failures.
    Vitest,
}

impl SourceKind {
    /// All known source kinds in registration order.
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Eslint,
        SourceKind::Typescript,
        SourceKind::Vitest,
    ];

    /// Returns the lowercase integration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Eslint => "eslint",
            SourceKind::Typescript => "typescript",
            SourceKind::Vitest => "vitest",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "eslint" => Ok(SourceKind::Eslint),
            "typescript" => Ok(SourceKind::Typescript),
            "vitest" => Ok(SourceKind::Vitest),
            other => Err(format!("unknown source kind: {other}")),
        }
    }
}

/// A single normalized diagnostic from one source tool.
///
/// Immutable after construction. The `id` is derived from
/// `(source, file_path, line, column, code)`, so re-collecting the same
/// issue on a later run produces the same identity even when the message
/// text drifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Stable identity: `source:filePath:line:column:code`.
    pub id: String,

    /// The tool that reported this diagnostic.
    pub source: SourceKind,

    /// Tool-reported path; may be absolute or relative.
    pub file_path: String,

    /// Line number (1-based).
    pub line: u32,

    /// Column number (1-based).
    pub column: u32,

    /// End line for range diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,

    /// End column for range diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,

    /// Severity on the 4-level scale.
    pub severity: Severity,

    /// Rule or diagnostic code; `"unknown"` when the tool reports none.
    pub code: String,

    /// Human-readable message.
    pub message: String,

    /// Optional elaboration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Creation time, set once at construction.
    pub timestamp: DateTime<Utc>,
}

impl Diagnostic {
    /// Fallback code when a tool has no rule/diagnostic code.
    pub const UNKNOWN_CODE: &'static str = "unknown";

    /// Creates a diagnostic, deriving its stable id.
    pub fn new(
        source: SourceKind,
        file_path: impl Into<String>,
        line: u32,
        column: u32,
        severity: Severity,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        let file_path = file_path.into();
        let code = code
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| Self::UNKNOWN_CODE.to_string());
        let id = format!("{source}:{file_path}:{line}:{column}:{code}");

        Self {
            id,
            source,
            file_path,
            line,
            column,
            end_line: None,
            end_column: None,
            severity,
            code,
            message: message.into(),
            detail: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches an end position for range diagnostics.
    pub fn with_range(mut self, end_line: Option<u32>, end_column: Option<u32>) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    /// Attaches elaboration text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Immutable input for one collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Glob patterns handed through to the tools (non-empty, ordered).
    pub patterns: Vec<String>,

    /// Project root all relative paths resolve against.
    pub root_path: PathBuf,

    /// Concurrency for enrichment file reads.
    pub concurrency: usize,

    /// Per-source timeout in milliseconds; `0` disables the timeout race.
    pub timeout_ms: u64,

    /// Glob patterns excluded from analysis.
    pub ignore_patterns: Vec<String>,

    /// Whether the ESLint integration is active.
    pub eslint: bool,

    /// Whether the TypeScript integration is active.
    pub typescript: bool,

    /// Tool configuration file (tsconfig/eslint config) when overridden.
    pub config_path: Option<PathBuf>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["src".to_string()],
            root_path: PathBuf::from("."),
            concurrency: 4,
            timeout_ms: 30_000,
            ignore_patterns: Vec::new(),
            eslint: true,
            typescript: true,
            config_path: None,
        }
    }
}

impl CollectionConfig {
    /// Whether a source participates in this run.
    ///
    /// `Eslint` and `Typescript` follow their flags; every other kind is
    /// always included.
    pub fn is_source_enabled(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Eslint => self.eslint,
            SourceKind::Typescript => self.typescript,
            _ => true,
        }
    }

    /// Validates the config, returning a structured issue list on rejection.
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut issues = Vec::new();

        if self.patterns.is_empty() {
            issues.push(crate::error::ValidationIssue::new(
                "patterns",
                "must not be empty",
            ));
        }
        if self.patterns.iter().any(|pattern| pattern.is_empty()) {
            issues.push(crate::error::ValidationIssue::new(
                "patterns",
                "patterns must not contain empty strings",
            ));
        }
        if self.concurrency == 0 {
            issues.push(crate::error::ValidationIssue::new(
                "concurrency",
                "must be at least 1",
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(crate::error::Error::Validation { issues })
        }
    }
}

/// Per-run accounting of how the active sources settled.
///
/// `failed` counts every non-success including timeouts; `timed_out` is
/// the subset that hit the timeout race. `successful + failed == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatistics {
    /// Number of active sources in the run.
    pub total: usize,
    /// Sources that returned diagnostics.
    pub successful: usize,
    /// Sources that failed, including timeouts.
    pub failed: usize,
    /// Sources that failed specifically by timing out.
    pub timed_out: usize,
}

/// Snapshot of aggregate statistics over a diagnostic set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticStatistics {
    /// When this snapshot was computed.
    pub timestamp: DateTime<Utc>,

    /// Total diagnostics in the set.
    pub total_count: usize,

    /// Diagnostics with `Severity::Error`.
    pub error_count: usize,

    /// Diagnostics with `Severity::Warning`.
    pub warning_count: usize,

    /// Diagnostics with `Severity::Info`.
    pub info_count: usize,

    /// Diagnostics with `Severity::Note`.
    pub note_count: usize,

    /// Count per file path.
    pub total_by_file: BTreeMap<String, usize>,

    /// Count per severity.
    pub total_by_severity: BTreeMap<Severity, usize>,

    /// Count per rule/diagnostic code.
    pub total_by_code: BTreeMap<String, usize>,
}

impl DiagnosticStatistics {
    /// The zero-state snapshot.
    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now(),
            total_count: 0,
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            note_count: 0,
            total_by_file: BTreeMap::new(),
            total_by_severity: BTreeMap::new(),
            total_by_code: BTreeMap::new(),
        }
    }
}

/// Per-file metadata carried inside a [`FileReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// The integration the report belongs to.
    pub instrument: SourceKind,

    /// When the report was assembled.
    pub timestamp: DateTime<Utc>,

    /// Diagnostics in this file.
    pub diagnostic_count: usize,

    /// Error-severity diagnostics in this file.
    pub error_count: usize,

    /// Warning-severity diagnostics in this file.
    pub warning_count: usize,

    /// Info-severity diagnostics in this file.
    pub info_count: usize,
}

/// A per-(source, file) structured report: source text plus the
/// diagnostics reported against it.
///
/// Built once per run and never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Tool-reported path.
    pub file_path: String,

    /// Resolved absolute path.
    pub absolute_path: PathBuf,

    /// UTF-8 file content; empty for degraded reports.
    pub source_code: String,

    /// Content encoding, always `"utf-8"`.
    pub encoding: String,

    /// Number of newline-delimited segments; `0` for empty content.
    pub line_count: usize,

    /// Content size in bytes.
    pub size: usize,

    /// Diagnostics reported against this file by this source.
    pub diagnostics: Vec<Diagnostic>,

    /// Report metadata.
    pub metadata: ReportMetadata,
}

impl FileReport {
    /// Assembles a report from file content and its diagnostics.
    pub fn new(
        file_path: impl Into<String>,
        absolute_path: PathBuf,
        source_code: String,
        diagnostics: Vec<Diagnostic>,
        instrument: SourceKind,
    ) -> Self {
        let line_count = if source_code.is_empty() {
            0
        } else {
            source_code.split('\n').count()
        };
        let size = source_code.len();

        let count_severity = |severity: Severity| {
            diagnostics
                .iter()
                .filter(|diagnostic| diagnostic.severity == severity)
                .count()
        };
        let metadata = ReportMetadata {
            instrument,
            timestamp: Utc::now(),
            diagnostic_count: diagnostics.len(),
            error_count: count_severity(Severity::Error),
            warning_count: count_severity(Severity::Warning),
            info_count: count_severity(Severity::Info),
        };

        Self {
            file_path: file_path.into(),
            absolute_path,
            source_code,
            encoding: "utf-8".to_string(),
            line_count,
            size,
            diagnostics,
            metadata,
        }
    }

    /// Assembles a degraded report for a file whose content could not be
    /// read: empty content, zero size and lines.
    pub fn degraded(
        file_path: impl Into<String>,
        absolute_path: PathBuf,
        diagnostics: Vec<Diagnostic>,
        instrument: SourceKind,
    ) -> Self {
        Self::new(file_path, absolute_path, String::new(), diagnostics, instrument)
    }
}

/// Statistics returned by one structured-writer call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteStats {
    /// Number of report files written.
    pub files_written: usize,
    /// Total serialized bytes written.
    pub bytes_written: usize,
    /// Wall-clock duration of the write call.
    pub duration_ms: u64,
    /// When the write completed.
    pub timestamp: DateTime<Utc>,
}

/// End-to-end result of one report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Merged diagnostics from every successful source.
    pub diagnostics: Vec<Diagnostic>,
    /// Aggregate statistics over the merged diagnostics.
    pub stats: DiagnosticStatistics,
    /// How the active sources settled.
    pub source_stats: SourceStatistics,
    /// Persistence statistics.
    pub write_stats: WriteStats,
}

/// Resolves a tool-reported path against a root: absolute paths are used
/// as-is, relative paths are joined to the root.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
