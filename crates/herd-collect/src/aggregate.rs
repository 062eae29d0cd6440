//! Pure aggregation and grouping functions over diagnostics.
//!
//! No I/O, no shared state. All grouping preserves insertion order so a
//! run's output is reproducible.

use herd_core::{Diagnostic, Severity, SourceKind};
use std::collections::BTreeMap;

/// Merges per-source diagnostic arrays by stable concatenation.
///
/// Input array order and within-array order are preserved. No sorting,
/// no de-duplication: duplicate ids are kept verbatim so per-source
/// counts stay exact.
pub fn aggregate(sources: &[Vec<Diagnostic>]) -> Vec<Diagnostic> {
    sources.iter().flatten().cloned().collect()
}

/// Counts diagnostics per severity. Every severity key is present, even
/// with a zero count.
pub fn count_by_severity(diagnostics: &[Diagnostic]) -> BTreeMap<Severity, usize> {
    let mut counts: BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|severity| (*severity, 0)).collect();
    for diagnostic in diagnostics {
        *counts.entry(diagnostic.severity).or_default() += 1;
    }
    counts
}

/// Groups diagnostics by source. Every known [`SourceKind`] key is
/// present in the output, empty when that source reported nothing;
/// callers that want to skip empty groups filter explicitly.
pub fn group_by_source(diagnostics: &[Diagnostic]) -> BTreeMap<SourceKind, Vec<Diagnostic>> {
    let mut groups: BTreeMap<SourceKind, Vec<Diagnostic>> =
        SourceKind::ALL.iter().map(|kind| (*kind, Vec::new())).collect();
    for diagnostic in diagnostics {
        groups
            .entry(diagnostic.source)
            .or_default()
            .push(diagnostic.clone());
    }
    groups
}

/// Groups diagnostics by file path in first-seen order.
pub fn group_by_file(diagnostics: &[Diagnostic]) -> Vec<(String, Vec<Diagnostic>)> {
    let mut groups: Vec<(String, Vec<Diagnostic>)> = Vec::new();
    for diagnostic in diagnostics {
        match groups
            .iter_mut()
            .find(|(path, _)| *path == diagnostic.file_path)
        {
            Some((_, group)) => group.push(diagnostic.clone()),
            None => groups.push((diagnostic.file_path.clone(), vec![diagnostic.clone()])),
        }
    }
    groups
}

/// Groups diagnostics by source, then by file path within each source.
///
/// All source keys are present; per-source file order is first-seen.
pub fn group_by_source_and_file(
    diagnostics: &[Diagnostic],
) -> BTreeMap<SourceKind, Vec<(String, Vec<Diagnostic>)>> {
    group_by_source(diagnostics)
        .into_iter()
        .map(|(kind, group)| (kind, group_by_file(&group)))
        .collect()
}

/// Drops sources whose file list is empty. Used before enrichment to
/// avoid needless I/O.
pub fn filter_empty_groups(
    groups: BTreeMap<SourceKind, Vec<(String, Vec<Diagnostic>)>>,
) -> BTreeMap<SourceKind, Vec<(String, Vec<Diagnostic>)>> {
    groups
        .into_iter()
        .filter(|(_, files)| !files.is_empty())
        .collect()
}
