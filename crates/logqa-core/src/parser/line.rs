// Bracketed log line grammar: [YYYY-MM-DD HH:MM:SS] service LEVEL: message

use regex::Regex;

/// Borrowed fields of a line that matched the grammar.
/// The timestamp is still raw text at this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'a> {
    pub timestamp: &'a str,
    pub service: &'a str,
    pub level: &'a str,
    pub message: &'a str,
}

pub struct LineGrammar {
    // the regex crate runs a finite automaton, so matching cost stays linear in the line length
    pattern: Regex,
}

impl LineGrammar {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\[(.*?)\] (.*?) ([A-Z]+): (.*)$")
                .expect("line grammar pattern is valid"),
        }
    }

    /// Match one line (without its terminator). `None` when the shape is wrong.
    pub fn matches<'a>(&self, line: &'a str) -> Option<LineMatch<'a>> {
        let caps = self.pattern.captures(line)?;

        Some(LineMatch {
            timestamp: caps.get(1).map(|m| m.as_str()).unwrap_or(""),
            service: caps.get(2).map(|m| m.as_str()).unwrap_or(""),
            level: caps.get(3).map(|m| m.as_str()).unwrap_or(""),
            message: caps.get(4).map(|m| m.as_str()).unwrap_or(""),
        })
    }
}

impl Default for LineGrammar {
    fn default() -> Self {
        Self::new()
    }
}
