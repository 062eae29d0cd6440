//! Vitest diagnostic source (`npx vitest run --reporter=json`).

use crate::exec::{run_npx, stderr_snippet};
use herd_core::{
    CollectionConfig, Diagnostic, DiagnosticSource, Error, Result, Severity, SourceKind,
};
use serde::Deserialize;
use tracing::debug;

/// Code attached to every failed-assertion diagnostic.
const FAILED_TEST_CODE: &str = "failed-test";

/// Collects test failures from Vitest's JSON reporter.
///
/// Vitest exits 1 when tests failed; the JSON envelope still arrives on
/// stdout and is data. Only spawn failures and unparseable output are
/// adapter errors.
#[derive(Debug, Default)]
pub struct VitestSource;

impl VitestSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl DiagnosticSource for VitestSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Vitest
    }

    async fn collect(&self, config: &CollectionConfig) -> Result<Vec<Diagnostic>> {
        let args = vec![
            "vitest".to_string(),
            "run".to_string(),
            "--reporter=json".to_string(),
        ];

        let output = run_npx(self.kind(), &args, &config.root_path).await?;
        let raw = String::from_utf8_lossy(&output.stdout);

        if raw.trim().is_empty() {
            return Err(Error::Source {
                kind: self.kind(),
                message: format!(
                    "vitest produced no JSON output (exit {}): {}",
                    output.status,
                    stderr_snippet(&output)
                ),
            });
        }

        let diagnostics = parse_vitest_output(&raw)?;
        debug!(count = diagnostics.len(), "parsed vitest output");
        Ok(diagnostics)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VitestReport {
    #[serde(default)]
    test_results: Vec<VitestFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VitestFile {
    /// Absolute path to the test file.
    name: String,
    #[serde(default)]
    assertion_results: Vec<VitestAssertion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VitestAssertion {
    title: String,
    #[serde(default)]
    full_name: Option<String>,
    status: String,
    #[serde(default)]
    failure_messages: Vec<String>,
    #[serde(default)]
    location: Option<VitestLocation>,
}

#[derive(Debug, Deserialize)]
struct VitestLocation {
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
}

/// Maps Vitest's JSON reporter envelope to diagnostics: one
/// error-severity diagnostic per failed assertion.
fn parse_vitest_output(raw: &str) -> Result<Vec<Diagnostic>> {
    let report: VitestReport =
        serde_json::from_str(raw.trim()).map_err(|err| Error::Source {
            kind: SourceKind::Vitest,
            message: format!("unparseable vitest JSON output: {err}"),
        })?;

    let mut diagnostics = Vec::new();
    for file in report.test_results {
        for assertion in file.assertion_results {
            if assertion.status != "failed" {
                continue;
            }

            let (line, column) = assertion
                .location
                .as_ref()
                .map(|loc| (loc.line.unwrap_or(1), loc.column.unwrap_or(1)))
                .unwrap_or((1, 1));
            let message = assertion
                .full_name
                .clone()
                .unwrap_or_else(|| assertion.title.clone());

            let mut diagnostic = Diagnostic::new(
                SourceKind::Vitest,
                file.name.clone(),
                line,
                column,
                Severity::Error,
                Some(FAILED_TEST_CODE.to_string()),
                message,
            );
            if !assertion.failure_messages.is_empty() {
                diagnostic = diagnostic.with_detail(assertion.failure_messages.join("\n"));
            }
            diagnostics.push(diagnostic);
        }
    }
    Ok(diagnostics)
}
