//! Core types for the log question-answering pipeline
//! this crate holds the parsing, formatting and chunking steps that run before any model is called.
pub mod chunker;
pub mod format;
pub mod parser;
pub mod source;

pub use chunker::{reassemble, split_text, Chunker, ChunkerConfig, OversizePolicy};
pub use format::{format_entries, ContextFormatter};
pub use parser::{LineOutcome, LogParser, ParseDiagnostic, ParseReport};
pub use source::read_log_file;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fixed timestamp layout used by the log lines and the rendered context
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ERRORS //

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("cannot read log source {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid chunk settings: chunk_size={chunk_size}, overlap={overlap} (need chunk_size > 0 and overlap < chunk_size)")]
    InvalidChunkConfig { chunk_size: usize, overlap: usize },
}

// LOG LEVEL //

/// Normalised severity, lowest first. Only used to summarise a parse,
/// the entry keeps whatever level token the line carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Map a level token, ignoring case. Common aliases (WARNING, ERR, CRIT) are accepted.
    pub fn parse(token: &str) -> Option<Self> {
        let level = match token.to_ascii_uppercase().as_str() {
            "TRACE" => Self::Trace,
            "DEBUG" => Self::Debug,
            "INFO" => Self::Info,
            "WARN" | "WARNING" => Self::Warn,
            "ERROR" | "ERR" => Self::Error,
            "FATAL" | "CRITICAL" | "CRIT" => Self::Fatal,
            _ => return None,
        };
        Some(level)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// parsed log entry

// one line of the log file broken into its four fields
// level stays free text, the parser never validates it

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime, // when the log was written

    pub service: String, // emitting component

    pub level: String, // severity token as written (INFO, WARN, ...)

    pub message: String, // rest of the line

    pub original: String, // verbatim source line
}

impl LogEntry {
    /// Best-effort mapping of the free-text level onto [`LogLevel`]
    pub fn severity(&self) -> Option<LogLevel> {
        LogLevel::parse(&self.level)
    }
}
