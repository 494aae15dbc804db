//! Diagnostic types for shape check results

use serde::{Deserialize, Serialize};
use std::fmt;

/// How loudly a failed shape rule is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    /// Fails the check run (exit code 2)
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// One failed shape rule on one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule ID that triggered this diagnostic
    pub rule_id: String,
    pub severity: Severity,
    /// Simple name of the offending element
    pub element: String,
    /// "<element>: expected <condition>, found <description>"
    pub message: String,
    /// Help text (usually rule description)
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(rule_id: &str, severity: Severity, element: &str, message: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            element: element.to_string(),
            message: message.to_string(),
            help: None,
        }
    }

    /// Add help text
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// "error[SHAPE001]: <message>"
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.rule_id, self.message)?;
        if let Some(help) = &self.help {
            write!(f, "\n  = help: {}", help)?;
        }
        Ok(())
    }
}
