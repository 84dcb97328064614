//! log parser - turn raw log text into structured entries

pub mod line;

pub use line::{LineGrammar, LineMatch};

use crate::{LogEntry, LogLevel, TIMESTAMP_FORMAT};
use std::collections::BTreeMap;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::warn;

/// A line that had the right shape but a timestamp we could not read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub line_number: usize, // 1-based line in the raw input
    pub line: String,
    pub reason: String,
}

/// What happened to a single line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Parsed(LogEntry),
    /// did not match the grammar, dropped without a diagnostic
    Skipped,
    BadTimestamp(ParseDiagnostic),
}

/// Result of parsing a whole log text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub entries: Vec<LogEntry>,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub skipped: usize, // non-blank lines that did not match
}

impl ParseReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries per recognised severity, plus how many carried a level we could not map
    pub fn level_counts(&self) -> (BTreeMap<LogLevel, usize>, usize) {
        let mut counts = BTreeMap::new();
        let mut unknown = 0;
        for entry in &self.entries {
            match entry.severity() {
                Some(level) => *counts.entry(level).or_insert(0) += 1,
                None => unknown += 1,
            }
        }
        (counts, unknown)
    }
}

pub struct LogParser {
    grammar: LineGrammar,
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            grammar: LineGrammar::new(),
        }
    }

    /// Classify one line. `line_number` only feeds the diagnostic.
    pub fn parse_line(&self, line_number: usize, line: &str) -> LineOutcome {
        let Some(m) = self.grammar.matches(line) else {
            return LineOutcome::Skipped;
        };

        match NaiveDateTime::parse_from_str(m.timestamp, TIMESTAMP_FORMAT) {
            Ok(timestamp) => LineOutcome::Parsed(LogEntry {
                timestamp,
                service: m.service.to_string(),
                level: m.level.to_string(),
                message: m.message.to_string(),
                original: line.to_string(),
            }),
            Err(e) => LineOutcome::BadTimestamp(ParseDiagnostic {
                line_number,
                line: line.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Parse every line of `raw`, keeping input order.
    ///
    /// Lines that do not match are dropped quietly. Lines that match but carry
    /// an unreadable timestamp are dropped with a warning and a diagnostic.
    pub fn parse(&self, raw: &str) -> ParseReport {
        let mut report = ParseReport::default();

        // lines dropped by the trim still count towards line numbers
        let trimmed = raw.trim();
        let leading = raw[..raw.len() - raw.trim_start().len()].matches('\n').count();

        for (idx, line) in trimmed.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            match self.parse_line(leading + idx + 1, line) {
                LineOutcome::Parsed(entry) => report.entries.push(entry),
                LineOutcome::Skipped => {
                    if !line.trim().is_empty() {
                        report.skipped += 1;
                    }
                }
                LineOutcome::BadTimestamp(diag) => {
                    warn!(
                        line_number = diag.line_number,
                        reason = %diag.reason,
                        "Could not parse timestamp in line: {}",
                        diag.line
                    );
                    report.diagnostics.push(diag);
                }
            }
        }

        report
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}
