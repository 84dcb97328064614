// Context formatter
// renders parsed entries back into the text block that gets chunked and embedded

use crate::{LogEntry, TIMESTAMP_FORMAT};

const SEPARATOR_WIDTH: usize = 40;

pub struct ContextFormatter;

impl ContextFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, entries: &[LogEntry]) -> String {
        format_entries(entries)
    }

    fn render(entry: &LogEntry) -> String {
        format!(
            "Time: {}\nService: {}\nLevel: {}\nMessage: {}\n{}",
            entry.timestamp.format(TIMESTAMP_FORMAT),
            entry.service,
            entry.level,
            entry.message,
            "-".repeat(SEPARATOR_WIDTH)
        )
    }
}

impl Default for ContextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// One block per entry, blocks joined by a single newline
pub fn format_entries(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(ContextFormatter::render)
        .collect::<Vec<_>>()
        .join("\n")
}
