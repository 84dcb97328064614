// Chunker - split the formatted context into overlapping windows for embedding
//
// sizes are counted in chars. a chunk ends right after a separator when one
// falls inside the window, the next chunk starts `overlap` chars before that end.

use crate::CoreError;
use serde::{Deserialize, Serialize};

/// What to do when no separator falls inside a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// keep the unbroken unit whole, even past chunk_size
    #[default]
    Keep,
    /// cut at exactly chunk_size chars
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    /// highest priority first
    pub separators: Vec<String>,
    pub oversize: OversizePolicy,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 0,
            separators: vec!["\n\n".to_string(), "\n".to_string(), " ".to_string()],
            oversize: OversizePolicy::Keep,
        }
    }
}

impl ChunkerConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, oversize: OversizePolicy) -> Self {
        self.oversize = oversize;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(mut config: ChunkerConfig) -> Result<Self, CoreError> {
        if config.chunk_size == 0 || config.overlap >= config.chunk_size {
            return Err(CoreError::InvalidChunkConfig {
                chunk_size: config.chunk_size,
                overlap: config.overlap,
            });
        }
        config.separators.retain(|s| !s.is_empty());
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // byte offset of every char boundary, plus the end of the text
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;
        let size = self.config.chunk_size;

        if total <= size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let limit = start + size;
            if limit >= total {
                chunks.push(text[bounds[start]..].to_string());
                break;
            }

            let end = match self.last_break(text, &bounds, start, limit) {
                Some(end) => end,
                None => match self.config.oversize {
                    OversizePolicy::Hard => limit,
                    OversizePolicy::Keep => self.next_break(text, &bounds, limit),
                },
            };

            chunks.push(text[bounds[start]..bounds[end]].to_string());
            if end >= total {
                break;
            }
            // end > start + overlap, so this always moves forward
            start = end - self.config.overlap;
        }

        chunks
    }

    // last separator end inside (start + overlap, limit], by separator priority
    fn last_break(&self, text: &str, bounds: &[usize], start: usize, limit: usize) -> Option<usize> {
        let floor = bounds[start + self.config.overlap];
        let window = &text[bounds[start]..bounds[limit]];

        self.config.separators.iter().find_map(|sep| {
            let end = bounds[start] + window.rfind(sep.as_str())? + sep.len();
            (end > floor).then(|| char_pos(bounds, end))
        })
    }

    // end of the unbroken unit that runs past `limit`.
    // walks forward once and stops at the first separator, so cost is the unit length
    fn next_break(&self, text: &str, bounds: &[usize], limit: usize) -> usize {
        let from = bounds[limit];
        let rest = &text[from..];

        for (i, _) in rest.char_indices() {
            let tail = &rest[i..];
            let shortest = self
                .config
                .separators
                .iter()
                .filter(|sep| tail.starts_with(sep.as_str()))
                .map(|sep| sep.len())
                .min();

            if let Some(len) = shortest {
                // a separator right at the limit closes the previous unit
                if i == 0 {
                    return limit;
                }
                return char_pos(bounds, from + i + len);
            }
        }
        bounds.len() - 1
    }
}

fn char_pos(bounds: &[usize], byte: usize) -> usize {
    bounds.binary_search(&byte).unwrap_or_else(|i| i)
}

/// Split with the default separators and oversize policy
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, CoreError> {
    Ok(Chunker::new(ChunkerConfig::new(chunk_size, overlap))?.split(text))
}

/// Inverse of [`Chunker::split`]: drop the leading `overlap` chars of every chunk after the first
pub fn reassemble<S: AsRef<str>>(chunks: &[S], overlap: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let chunk = chunk.as_ref();
        if i == 0 {
            out.push_str(chunk);
        } else {
            let skip = chunk
                .char_indices()
                .nth(overlap)
                .map(|(b, _)| b)
                .unwrap_or(chunk.len());
            out.push_str(&chunk[skip..]);
        }
    }
    out
}
