//! Herd Collect - Concurrent diagnostic collection and aggregation.
//!
//! This crate owns the middle of the pipeline:
//!
//! - [`Orchestrator`]: fans out to every active [`DiagnosticSource`]
//!   concurrently, races each against a per-source timeout, and merges
//!   whatever succeeded (partial failure is tolerated by design)
//! - [`aggregate`]: pure grouping/merging functions over diagnostics
//! - [`StatisticsCollector`]: accumulates diagnostics and derives
//!   aggregate statistics, recomputed in full on every collect
//!
//! [`DiagnosticSource`]: herd_core::DiagnosticSource

pub mod aggregate;
pub mod orchestrator;
pub mod stats;

pub use aggregate::{
    aggregate, count_by_severity, filter_empty_groups, group_by_file, group_by_source,
    group_by_source_and_file,
};
pub use orchestrator::{CollectionOutcome, Orchestrator};
pub use stats::StatisticsCollector;
