//! Diagnostic types.

use css_events::Position;

/// Rule id used for diagnostics raised by the parser rather than a rule.
pub const PARSE_ERROR_RULE: &str = "parse-error";

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Id of the rule that raised it.
    pub rule: &'static str,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// Where the offending construct starts.
    pub position: Position,
}

impl Diagnostic {
    /// Creates a new warning.
    pub fn new(rule: &'static str, message: impl Into<String>, position: Position) -> Self {
        Self {
            rule,
            severity: Severity::Warning,
            message: message.into(),
            position,
        }
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// 1-based line.
    #[inline]
    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// 1-based column.
    #[inline]
    pub fn column(&self) -> u32 {
        self.position.col
    }
}

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Reported, but does not fail the run by default.
    Warning,
    /// Fails the run.
    Error,
}

impl Severity {
    /// Returns the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
