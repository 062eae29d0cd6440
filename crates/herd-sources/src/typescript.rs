//! TypeScript compiler diagnostic source (`npx tsc --noEmit`).

use crate::exec::{run_npx, stderr_snippet};
use herd_core::{
    CollectionConfig, Diagnostic, DiagnosticSource, Error, Result, Severity, SourceKind,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// One `tsc` diagnostic line:
/// `src/app.ts(42,7): error TS2322: Type 'string' is not assignable ...`
static DIAGNOSTIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\((\d+),(\d+)\): (error|warning) (TS\d+): (.+)$")
        .expect("tsc diagnostic line pattern is valid")
});

/// Collects type errors from `tsc --noEmit`.
///
/// File inclusion is driven by the project's tsconfig (or the
/// `config_path` override); `tsc` does not take glob patterns. The
/// compiler exits non-zero when it found type errors; as long as its
/// output parses, that is data, not an adapter failure.
#[derive(Debug, Default)]
pub struct TypescriptSource;

impl TypescriptSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl DiagnosticSource for TypescriptSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Typescript
    }

    async fn collect(&self, config: &CollectionConfig) -> Result<Vec<Diagnostic>> {
        let mut args = vec![
            "tsc".to_string(),
            "--noEmit".to_string(),
            "--pretty".to_string(),
            "false".to_string(),
        ];
        if let Some(path) = &config.config_path {
            args.push("--project".to_string());
            args.push(path.display().to_string());
        }

        let output = run_npx(self.kind(), &args, &config.root_path).await?;
        let raw = String::from_utf8_lossy(&output.stdout);
        let diagnostics = parse_tsc_output(&raw);

        // Non-zero exit with nothing parseable means tsc itself broke
        // (missing binary, malformed tsconfig) rather than type errors.
        if !output.status.success() && diagnostics.is_empty() {
            return Err(Error::Source {
                kind: self.kind(),
                message: format!(
                    "tsc exited with {} and produced no diagnostics: {}",
                    output.status,
                    stderr_snippet(&output)
                ),
            });
        }

        debug!(count = diagnostics.len(), "parsed tsc output");
        Ok(diagnostics)
    }
}

/// Parses `tsc --pretty false` diagnostic lines.
///
/// Indented continuation lines elaborate the preceding diagnostic and
/// are folded into its detail.
fn parse_tsc_output(raw: &str) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for line in raw.lines() {
        if let Some(captures) = DIAGNOSTIC_LINE.captures(line) {
            let file_path = captures[1].to_string();
            let line_no: u32 = captures[2].parse().unwrap_or(1);
            let column: u32 = captures[3].parse().unwrap_or(1);
            let severity = match &captures[4] {
                "error" => Severity::Error,
                _ => Severity::Warning,
            };
            let code = captures[5].to_string();
            let message = captures[6].to_string();

            diagnostics.push(Diagnostic::new(
                SourceKind::Typescript,
                file_path,
                line_no,
                column,
                severity,
                Some(code),
                message,
            ));
        } else if line.starts_with(' ') && !line.trim().is_empty() {
            if let Some(last) = diagnostics.last_mut() {
                let detail = match last.detail.take() {
                    Some(existing) => format!("{existing}\n{}", line.trim()),
                    None => line.trim().to_string(),
                };
                last.detail = Some(detail);
            }
        }
    }

    diagnostics
}
