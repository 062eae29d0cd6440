//! Statistics accumulator over a diagnostic set.

use chrono::Utc;
use herd_core::{Diagnostic, DiagnosticStatistics, Severity};
use std::collections::BTreeMap;

/// Accumulates diagnostics and derives aggregate statistics.
///
/// Every `collect` fully recomputes the counts from the entire
/// accumulated list instead of applying deltas, so
/// `snapshot() == f(accumulated)` holds by construction and cannot drift.
/// Lifecycle: create, collect, snapshot, optionally [`reset`].
///
/// [`reset`]: StatisticsCollector::reset
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    diagnostics: Vec<Diagnostic>,
    stats: Option<DiagnosticStatistics>,
}

impl StatisticsCollector {
    /// Creates an idle collector with empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one diagnostic and recomputes.
    pub fn collect(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
        self.recompute();
    }

    /// Appends a batch of diagnostics and recomputes.
    pub fn collect_all(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
        self.recompute();
    }

    /// Returns an owned snapshot of the current statistics.
    ///
    /// Mutating the returned value never affects internal state.
    pub fn snapshot(&self) -> DiagnosticStatistics {
        self.stats.clone().unwrap_or_else(DiagnosticStatistics::empty)
    }

    /// Clears accumulated diagnostics and returns to the zero state.
    ///
    /// Never invoked automatically; long-lived callers reset between
    /// independent runs.
    pub fn reset(&mut self) {
        self.diagnostics.clear();
        self.stats = None;
    }

    /// Number of diagnostics accumulated since the last reset.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether anything has been accumulated since the last reset.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn recompute(&mut self) {
        let mut total_by_file: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
        let mut total_by_code: BTreeMap<String, usize> = BTreeMap::new();

        for diagnostic in &self.diagnostics {
            *total_by_file.entry(diagnostic.file_path.clone()).or_default() += 1;
            *total_by_severity.entry(diagnostic.severity).or_default() += 1;
            *total_by_code.entry(diagnostic.code.clone()).or_default() += 1;
        }

        let count = |severity: Severity| total_by_severity.get(&severity).copied().unwrap_or(0);

        self.stats = Some(DiagnosticStatistics {
            timestamp: Utc::now(),
            total_count: self.diagnostics.len(),
            error_count: count(Severity::Error),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
            note_count: count(Severity::Note),
            total_by_file,
            total_by_severity,
            total_by_code,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herd_core::SourceKind;
    use pretty_assertions::assert_eq;

    fn diagnostic(file: &str, severity: Severity, code: &str) -> Diagnostic {
        Diagnostic::new(
            SourceKind::Eslint,
            file,
            1,
            1,
            severity,
            Some(code.to_string()),
            "message",
        )
    }

    #[test]
    fn test_idle_snapshot_is_zero_state() {
        let collector = StatisticsCollector::new();
        let snapshot = collector.snapshot();

        assert_eq!(snapshot.total_count, 0);
        assert!(snapshot.total_by_file.is_empty());
        assert!(snapshot.total_by_code.is_empty());
    }

    #[test]
    fn test_counts_recomputed_from_full_set() {
        let mut collector = StatisticsCollector::new();
        collector.collect_all(vec![
            diagnostic("src/a.ts", Severity::Error, "no-undef"),
            diagnostic("src/a.ts", Severity::Warning, "semi"),
        ]);
        collector.collect(diagnostic("src/b.ts", Severity::Error, "no-undef"));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_count, 3);
        assert_eq!(snapshot.error_count, 2);
        assert_eq!(snapshot.warning_count, 1);
        assert_eq!(snapshot.total_by_file["src/a.ts"], 2);
        assert_eq!(snapshot.total_by_file["src/b.ts"], 1);
        assert_eq!(snapshot.total_by_code["no-undef"], 2);
    }

    #[test]
    fn test_severity_counts_sum_to_total() {
        let mut collector = StatisticsCollector::new();
        collector.collect_all(vec![
            diagnostic("src/a.ts", Severity::Error, "a"),
            diagnostic("src/b.ts", Severity::Warning, "b"),
            diagnostic("src/c.ts", Severity::Info, "c"),
            diagnostic("src/d.ts", Severity::Note, "d"),
            diagnostic("src/e.ts", Severity::Error, "e"),
        ]);

        let s = collector.snapshot();
        assert_eq!(
            s.error_count + s.warning_count + s.info_count + s.note_count,
            s.total_count
        );
        assert_eq!(s.total_count, 5);
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut collector = StatisticsCollector::new();
        collector.collect(diagnostic("src/a.ts", Severity::Error, "a"));

        let mut snapshot = collector.snapshot();
        snapshot.total_count = 999;
        snapshot.total_by_file.clear();

        assert_eq!(collector.snapshot().total_count, 1);
        assert_eq!(collector.snapshot().total_by_file.len(), 1);
    }

    #[test]
    fn test_reset_returns_to_zero_state() {
        let mut collector = StatisticsCollector::new();
        collector.collect_all(vec![
            diagnostic("src/a.ts", Severity::Error, "a"),
            diagnostic("src/b.ts", Severity::Warning, "b"),
        ]);
        assert_eq!(collector.len(), 2);

        collector.reset();
        assert!(collector.is_empty());
        assert_eq!(collector.snapshot().total_count, 0);

        // Collecting after reset starts over.
        collector.collect(diagnostic("src/c.ts", Severity::Info, "c"));
        assert_eq!(collector.snapshot().total_count, 1);
    }
}
