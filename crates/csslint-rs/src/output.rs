//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use css_rules::{Diagnostic, Severity};
use serde::Serialize;

/// A formatted diagnostic for output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type (Error or Warning).
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// The file path.
    pub filename: String,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// The message.
    pub message: String,
    /// Id of the rule that raised it.
    pub rule: String,
}

/// Formats diagnostics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a collection of diagnostics.
    pub fn format(&self, diagnostics: &[Diagnostic], file_path: &Utf8Path, source: &str) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(diagnostics, file_path),
            OutputFormat::HumanVerbose => self.format_human_verbose(diagnostics, file_path, source),
            OutputFormat::Json => {
                let formatted = Self::format_json_diagnostics(diagnostics, file_path);
                serde_json::to_string_pretty(&formatted).unwrap_or_default()
            }
            OutputFormat::Machine => self.format_machine(diagnostics, file_path),
        }
    }

    /// Formats as human-readable output.
    fn format_human(&self, diagnostics: &[Diagnostic], file_path: &Utf8Path) -> String {
        let mut output = String::new();

        for diag in diagnostics {
            output.push_str(&format!(
                "{}:{}:{}\n{}: {} ({})\n\n",
                file_path,
                diag.line(),
                diag.column(),
                severity_label(diag.severity),
                diag.message,
                diag.rule
            ));
        }

        output
    }

    /// Formats as human-readable output with code snippets.
    fn format_human_verbose(
        &self,
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
        source: &str,
    ) -> String {
        let lines: Vec<&str> = source.lines().collect();
        let mut output = String::new();

        for diag in diagnostics {
            output.push_str(&format!(
                "{}:{}:{}\n{}: {} ({})\n",
                file_path,
                diag.line(),
                diag.column(),
                severity_label(diag.severity),
                diag.message,
                diag.rule
            ));

            let line_num = diag.line() as usize;
            if let Some(line) = line_num.checked_sub(1).and_then(|i| lines.get(i)) {
                output.push_str(&format!("  {} | {}\n", line_num, line));

                let padding = " ".repeat(diag.column().saturating_sub(1) as usize);
                output.push_str(&format!(
                    "  {} | {}^\n",
                    " ".repeat(line_num.to_string().len()),
                    padding
                ));
            }

            output.push('\n');
        }

        output
    }

    /// Formats diagnostics into JSON-ready structs.
    pub fn format_json_diagnostics(
        diagnostics: &[Diagnostic],
        file_path: &Utf8Path,
    ) -> Vec<FormattedDiagnostic> {
        diagnostics
            .iter()
            .map(|diag| FormattedDiagnostic {
                diagnostic_type: severity_label(diag.severity).to_string(),
                filename: file_path.to_string(),
                line: diag.line(),
                column: diag.column(),
                message: diag.message.clone(),
                rule: diag.rule.to_string(),
            })
            .collect()
    }

    /// Formats as machine-readable output.
    fn format_machine(&self, diagnostics: &[Diagnostic], file_path: &Utf8Path) -> String {
        let mut output = String::new();

        for diag in diagnostics {
            output.push_str(&format!(
                "{} {}:{}:{} {} ({})\n",
                severity_label(diag.severity).to_uppercase(),
                file_path,
                diag.line(),
                diag.column(),
                diag.message,
                diag.rule
            ));
        }

        output
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    }
}

/// Summary of a check run.
#[derive(Debug, Default)]
pub struct CheckSummary {
    /// Number of files checked.
    pub file_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Whether to fail on warnings.
    pub fail_on_warnings: bool,
}

impl CheckSummary {
    /// Formats the summary line.
    pub fn format(&self) -> String {
        format!(
            "====================================\ncsslint found {} {} and {} {} in {} {}",
            self.error_count,
            plural(self.error_count, "error", "errors"),
            self.warning_count,
            plural(self.warning_count, "warning", "warnings"),
            self.file_count,
            plural(self.file_count, "file", "files")
        )
    }

    /// Returns true if the run should exit with a failure status.
    pub fn is_failure(&self) -> bool {
        self.error_count > 0 || (self.warning_count > 0 && self.fail_on_warnings)
    }

    /// Returns true if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_rules::Position;

    fn diagnostics() -> Vec<Diagnostic> {
        vec![
            Diagnostic::new(
                "resource",
                "Consider using a localised resource instead for 'http://x.com/a.png'",
                Position::new(2, 15),
            ),
            Diagnostic::new(
                "parse-error",
                "unknown @ rule: @foo",
                Position::new(3, 1),
            )
            .with_severity(Severity::Error),
        ]
    }

    const SOURCE: &str = ".a {\n  background: url(http://x.com/a.png);\n@foo; }\n";

    #[test]
    fn test_format_human() {
        let formatter = Formatter::new(OutputFormat::Human);
        let output = formatter.format(&diagnostics(), Utf8Path::new("css/main.css"), SOURCE);
        insta::assert_snapshot!(output, @r"
        css/main.css:2:15
        Warning: Consider using a localised resource instead for 'http://x.com/a.png' (resource)

        css/main.css:3:1
        Error: unknown @ rule: @foo (parse-error)
        ");
    }

    #[test]
    fn test_format_human_verbose() {
        let formatter = Formatter::new(OutputFormat::HumanVerbose);
        let output = formatter.format(&diagnostics()[..1], Utf8Path::new("main.css"), SOURCE);
        assert_eq!(
            output,
            "main.css:2:15\n\
             Warning: Consider using a localised resource instead for 'http://x.com/a.png' (resource)\n  \
             2 |   background: url(http://x.com/a.png);\n    \
             |               ^\n\n"
        );
    }

    #[test]
    fn test_format_machine() {
        let formatter = Formatter::new(OutputFormat::Machine);
        let output = formatter.format(&diagnostics(), Utf8Path::new("main.css"), SOURCE);
        insta::assert_snapshot!(output, @r"
        WARNING main.css:2:15 Consider using a localised resource instead for 'http://x.com/a.png' (resource)
        ERROR main.css:3:1 unknown @ rule: @foo (parse-error)
        ");
    }

    #[test]
    fn test_format_json() {
        let formatted = Formatter::format_json_diagnostics(&diagnostics(), Utf8Path::new("main.css"));
        let value = serde_json::to_value(&formatted).unwrap();
        assert_eq!(
            value[0],
            serde_json::json!({
                "type": "Warning",
                "filename": "main.css",
                "line": 2,
                "column": 15,
                "message": "Consider using a localised resource instead for 'http://x.com/a.png'",
                "rule": "resource"
            })
        );
        assert_eq!(value[1]["type"], "Error");
    }

    #[test]
    fn test_summary() {
        let summary = CheckSummary {
            file_count: 5,
            error_count: 2,
            warning_count: 1,
            fail_on_warnings: false,
        };

        let output = summary.format();
        assert!(output.ends_with("csslint found 2 errors and 1 warning in 5 files"));
        assert!(summary.is_failure());
    }

    #[test]
    fn test_fail_on_warnings() {
        let mut summary = CheckSummary {
            file_count: 1,
            warning_count: 1,
            ..Default::default()
        };
        assert!(!summary.is_failure());
        summary.fail_on_warnings = true;
        assert!(summary.is_failure());
        assert!(!summary.is_clean());
    }
}
