//! Herd Report - Enrichment, persistence, and run sequencing.
//!
//! The tail of the pipeline:
//!
//! - [`Enricher`]: pairs (source, file) diagnostic groups with the
//!   file's content, degrading or failing per [`ReadErrorPolicy`]
//! - [`ReportWriter`]: persists one JSON file per analyzed source file
//!   under `<output>/<source>/errors/`, atomically
//! - [`ReportService`]: sequences a whole run — clear previous output,
//!   collect, group, enrich, write

pub mod enrich;
pub mod service;
pub mod writer;

pub use enrich::{Enricher, ReadErrorPolicy};
pub use service::ReportService;
pub use writer::ReportWriter;
