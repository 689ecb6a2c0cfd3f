//! Structured JSON logger
//!
//! Per OBSERVABILITY.md:
//! - Structured logs (JSON), one line per event
//! - Deterministic key ordering: `event`, `severity`, then fields by key
//! - Explicit severity levels with a configurable floor
//! - Synchronous, no buffering

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::events::Event;

/// Log severity levels per OBSERVABILITY.md
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Per-operation detail
    Trace = 0,
    /// Normal lifecycle
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger writing one JSON object per line.
///
/// TRACE through WARN go to stdout, ERROR and FATAL to stderr. Lines below
/// `min_severity` are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    min_severity: Severity,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl Logger {
    pub fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Whether a line at `severity` would be written.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Log a typed lifecycle event at its own severity.
    pub fn event(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(event.severity(), event.as_str(), fields);
    }

    /// Log an event with the given severity and fields.
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity >= Severity::Error {
            self.log_to_writer(severity, event, fields, &mut io::stderr());
        } else {
            self.log_to_writer(severity, event, fields, &mut io::stdout());
        }
    }

    /// Write one line to `writer` if `severity` passes the floor.
    ///
    /// Write failures are ignored: logging never fails an operation.
    pub fn log_to_writer<W: Write>(
        &self,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        if !self.enabled(severity) {
            return;
        }

        let line = render(severity, event, fields);
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

/// Render a single log line, newline-terminated.
fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let mut output = String::with_capacity(128);
    output.push_str("{\"event\":");
    output.push_str(&quote(event));
    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    for (key, value) in sorted {
        output.push(',');
        output.push_str(&quote(key));
        output.push(':');
        output.push_str(&quote(value));
    }

    output.push_str("}\n");
    output
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
