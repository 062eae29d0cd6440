//! Herd Core - Diagnostic model and source abstraction.
//!
//! This crate provides the foundational types for Herd's diagnostic
//! collection pipeline. It defines:
//!
//! - [`Diagnostic`]: the normalized record every tool's output maps into
//! - [`DiagnosticSource`]: trait for tool-specific collection adapters
//! - [`SourceRegistry`]: ordered registry of configured sources
//! - [`CollectionConfig`], [`FileReport`], and the statistics types
//! - [`Error`]: the error taxonomy shared across the pipeline
//!
//! # Architecture
//!
//! Herd collects from several independent tools concurrently and folds
//! their output into one model:
//!
//! ```text
//! ┌─────────────────┐
//! │    herd-cli     │  (User interface)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  herd-report    │  (Enrichment, persistence, run sequencing)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  herd-collect   │  (Concurrent fan-out, aggregation, statistics)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  herd-sources   │  (ESLint / tsc / Vitest adapters)
//! └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use herd_core::{CollectionConfig, Diagnostic, Severity, SourceKind};
//!
//! let config = CollectionConfig::default();
//! assert!(config.is_source_enabled(SourceKind::Eslint));
//!
//! let diagnostic = Diagnostic::new(
//!     SourceKind::Eslint,
//!     "src/app.ts",
//!     10,
//!     5,
//!     Severity::Error,
//!     Some("no-unused-vars".to_string()),
//!     "'x' is assigned a value but never used",
//! );
//! assert_eq!(diagnostic.id, "eslint:src/app.ts:10:5:no-unused-vars");
//! ```

pub mod error;
pub mod source;
pub mod types;

// Re-export core types for convenience
pub use error::{Error, Result, ValidationIssue};
pub use source::{DiagnosticSource, SourceRegistry};
pub use types::{
    resolve_path, CollectionConfig, Diagnostic, DiagnosticStatistics, FileReport, ReportMetadata,
    RunReport, Severity, SourceKind, SourceStatistics, WriteStats,
};
