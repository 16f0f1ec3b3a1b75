//! Structured diagnostic messages with severity, codes, locations, and help.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Integration inputs are JSON descriptions rather than HDL sources, so a
/// diagnostic points at a logical location (a connection, an instance, a
/// port) instead of a byte span. Each diagnostic includes:
/// - A severity level and unique code
/// - A primary message and optional location
/// - Optional notes and help text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where the issue was detected, e.g. "connection `c0`".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Explanatory footnotes (e.g., "note: ...").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Actionable suggestions (e.g., "help: ...").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code and message.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates a new note diagnostic with the given code and message.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, code, message)
    }

    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Sets the location of this diagnostic.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Error, 304);
        let diag = Diagnostic::error(code, "unknown instance `ghost`");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "unknown instance `ghost`");
        assert_eq!(format!("{}", diag.code), "E304");
        assert!(diag.location.is_none());
    }

    #[test]
    fn create_warning_and_note() {
        let code = DiagnosticCode::new(Category::Warning, 300);
        assert_eq!(Diagnostic::warning(code, "w").severity, Severity::Warning);
        assert_eq!(Diagnostic::note(code, "n").severity, Severity::Note);
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Error, 306);
        let diag = Diagnostic::error(code, "protocol mismatch")
            .at("connection `stream0`")
            .with_note("source speaks axi_stream")
            .with_help("connect ports of the same protocol");
        assert_eq!(diag.location.as_deref(), Some("connection `stream0`"));
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn serde_skips_empty_fields() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let diag = Diagnostic::error(code, "bad endpoint");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("notes"));
        assert!(!json.contains("location"));
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }
}
