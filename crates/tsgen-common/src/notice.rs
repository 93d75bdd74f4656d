//! Notices surfaced to the host.
//!
//! Shape resolution never aborts the process; everything the user should see
//! is either a tagged failure value or a `Notice` in the result. Notices
//! carry a severity so the host can render partial-mode drops as warnings and
//! loose-mode drops as plain information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// A warning
    Warning,
    /// An error (used only by the host when rendering failures)
    Error,
}

impl Severity {
    /// Get the severity name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Check if this is a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A user-facing message produced during generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity used by the host when rendering
    pub severity: Severity,
    /// Human-readable message text
    pub message: String,
}

impl Notice {
    /// Create a warning-severity notice.
    pub fn warning(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an info-severity notice.
    pub fn info(message: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_display_includes_severity() {
        let notice = Notice::warning("field 'x' dropped");
        assert_eq!(notice.to_string(), "warning: field 'x' dropped");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
