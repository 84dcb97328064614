//! Configuration file for the logqa binary

use logqa_rag::RagConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "logqa.toml";
pub const DEFAULT_LOG_FILE: &str = "logs.txt";

// Main config structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    // log file to read when --file is not given
    pub log_file: Option<PathBuf>,

    // everything the RAG side needs (provider, chunking, retrieval, backends)
    #[serde(flatten)]
    pub rag: RagConfig,
}

// Load configuration from a TOML file

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: CliConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Explicit path must exist, the default path is optional
pub fn resolve_config(explicit: Option<&Path>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) => load_config(path)
            .map_err(|e| format!("failed to load config {}: {}", path.display(), e).into()),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => Ok(CliConfig::default()),
    }
}
