use colored::Colorize;
use std::io::IsTerminal;

use tsgen_common::{Notice, Severity};

/// Renders notices and status lines for the terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Reporter {
        Reporter { color }
    }

    /// Reporter for stderr output, with color when stderr is a terminal.
    pub fn for_stderr() -> Reporter {
        Reporter::new(std::io::stderr().is_terminal())
    }

    /// Render notices one per line. Empty input renders to an empty string.
    pub fn render(&self, notices: &[Notice]) -> String {
        let mut out = String::new();
        for (index, notice) in notices.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_notice(notice));
        }
        out
    }

    pub fn format_notice(&self, notice: &Notice) -> String {
        format!("{}: {}", self.format_severity(notice.severity), notice.message)
    }

    /// Render a resolution failure the same way an error notice renders.
    pub fn format_failure(&self, message: &str) -> String {
        format!("{}: {}", self.format_severity(Severity::Error), message)
    }

    /// Render a status line for a successful generation.
    pub fn format_success(&self, message: &str) -> String {
        if self.color {
            message.green().to_string()
        } else {
            message.to_string()
        }
    }

    fn format_severity(&self, severity: Severity) -> String {
        let label = severity.name();
        if !self.color {
            return label.to_string();
        }

        match severity {
            Severity::Error => label.red().bold().to_string(),
            Severity::Warning => label.yellow().bold().to_string(),
            Severity::Info => label.cyan().to_string(),
        }
    }
}
