//! ESLint diagnostic source (`npx eslint --format json`).

use crate::exec::{run_npx, stderr_snippet};
use herd_core::{
    CollectionConfig, Diagnostic, DiagnosticSource, Error, Result, Severity, SourceKind,
};
use serde::Deserialize;
use tracing::debug;

/// Collects lint findings from ESLint's JSON formatter.
///
/// ESLint exits 1 when lint problems were found; that is a successful
/// collection. Only exit 2 (fatal), spawn failures, and unparseable
/// output are adapter errors.
#[derive(Debug, Default)]
pub struct EslintSource;

impl EslintSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl DiagnosticSource for EslintSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Eslint
    }

    async fn collect(&self, config: &CollectionConfig) -> Result<Vec<Diagnostic>> {
        let mut args = vec![
            "eslint".to_string(),
            "--format".to_string(),
            "json".to_string(),
        ];
        for pattern in &config.patterns {
            args.push(pattern.clone());
        }
        for ignore in &config.ignore_patterns {
            args.push("--ignore-pattern".to_string());
            args.push(ignore.clone());
        }
        if let Some(path) = &config.config_path {
            args.push("--config".to_string());
            args.push(path.display().to_string());
        }

        let output = run_npx(self.kind(), &args, &config.root_path).await?;

        // Exit 1 carries the findings envelope; anything above is fatal.
        if !output.status.success() && output.status.code() != Some(1) {
            return Err(Error::Source {
                kind: self.kind(),
                message: format!(
                    "eslint exited with {}: {}",
                    output.status,
                    stderr_snippet(&output)
                ),
            });
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let diagnostics = parse_eslint_output(&raw)?;
        debug!(count = diagnostics.len(), "parsed eslint output");
        Ok(diagnostics)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFile {
    file_path: String,
    #[serde(default)]
    messages: Vec<EslintMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintMessage {
    rule_id: Option<String>,
    severity: u8,
    message: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
    #[serde(default)]
    end_line: Option<u32>,
    #[serde(default)]
    end_column: Option<u32>,
}

/// Maps ESLint's JSON formatter envelope to diagnostics.
fn parse_eslint_output(raw: &str) -> Result<Vec<Diagnostic>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let files: Vec<EslintFile> = serde_json::from_str(trimmed).map_err(|err| Error::Source {
        kind: SourceKind::Eslint,
        message: format!("unparseable eslint JSON output: {err}"),
    })?;

    let mut diagnostics = Vec::new();
    for file in files {
        for message in file.messages {
            let severity = match message.severity {
                2 => Severity::Error,
                // 1 is "warn"; anything the envelope drifts into is
                // softened rather than killing the source.
                _ => Severity::Warning,
            };
            diagnostics.push(
                Diagnostic::new(
                    SourceKind::Eslint,
                    file.file_path.clone(),
                    message.line.unwrap_or(1),
                    message.column.unwrap_or(1),
                    severity,
                    message.rule_id,
                    message.message,
                )
                .with_range(message.end_line, message.end_column),
            );
        }
    }
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"[
      {
        "filePath": "/project/src/app.ts",
        "messages": [
          {
            "ruleId": "no-unused-vars",
            "severity": 2,
            "message": "'x' is assigned a value but never used.",
            "line": 10,
            "column": 7,
            "endLine": 10,
            "endColumn": 8
          },
          {
            "ruleId": "semi",
            "severity": 1,
            "message": "Missing semicolon.",
            "line": 12,
            "column": 20
          },
          {
            "ruleId": null,
            "severity": 2,
            "message": "Parsing error: Unexpected token",
            "line": 1,
            "column": 1
          }
        ]
      },
      {
        "filePath": "/project/src/clean.ts",
        "messages": []
      }
    ]"#;

    #[test]
    fn test_parse_eslint_envelope() {
        let diagnostics = parse_eslint_output(SAMPLE).unwrap();
        assert_eq!(diagnostics.len(), 3);

        assert_eq!(diagnostics[0].source, SourceKind::Eslint);
        assert_eq!(diagnostics[0].file_path, "/project/src/app.ts");
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].code, "no-unused-vars");
        assert_eq!(diagnostics[0].line, 10);
        assert_eq!(diagnostics[0].column, 7);
        assert_eq!(diagnostics[0].end_line, Some(10));
        assert_eq!(diagnostics[0].end_column, Some(8));

        assert_eq!(diagnostics[1].severity, Severity::Warning);
        assert_eq!(diagnostics[1].code, "semi");
        assert_eq!(diagnostics[1].end_line, None);
    }

    #[test]
    fn test_null_rule_id_falls_back_to_unknown() {
        let diagnostics = parse_eslint_output(SAMPLE).unwrap();
        assert_eq!(diagnostics[2].code, "unknown");
        assert_eq!(
            diagnostics[2].id,
            "eslint:/project/src/app.ts:1:1:unknown"
        );
    }

    #[test]
    fn test_empty_output_yields_no_diagnostics() {
        assert!(parse_eslint_output("").unwrap().is_empty());
        assert!(parse_eslint_output("[]").unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_output_is_a_source_error() {
        let err = parse_eslint_output("not json at all").unwrap_err();
        assert!(matches!(
            err,
            Error::Source {
                kind: SourceKind::Eslint,
                ..
            }
        ));
    }

    #[test]
    fn test_unrecognized_severity_softens_to_warning() {
        let raw = r#"[{"filePath":"a.ts","messages":[{"ruleId":"x","severity":9,"message":"m","line":1,"column":1}]}]"#;
        let diagnostics = parse_eslint_output(raw).unwrap();
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }
}
