// LogQA CLI - ask questions about a log file

mod chat;
mod config;

use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Table};
use logqa_core::{
    format_entries, read_log_file, reassemble, Chunker, LogLevel, LogParser, ParseReport,
};
use logqa_rag::{LlmProvider, MemoryIndex, QaOrchestrator, RagConfig};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{resolve_config, DEFAULT_LOG_FILE};

#[derive(Parser)]
#[command(name = "logqa")]
#[command(version = "0.1.0")]
#[command(about = "Ask questions about a log file with a local or hosted LLM", long_about = None)]
struct Cli {
    /// Log file to analyse [default: logs.txt]
    #[arg(short, long, env = "LOGQA_LOG_FILE", global = true)]
    file: Option<PathBuf>,

    /// Config file [default: ./logqa.toml when present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Completion provider (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    provider: Option<ProviderArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Ollama,
    Openai,
}

impl From<ProviderArg> for LlmProvider {
    fn from(p: ProviderArg) -> Self {
        match p {
            ProviderArg::Ollama => LlmProvider::Ollama,
            ProviderArg::Openai => LlmProvider::OpenAi,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive question loop (default)
    Chat,

    /// Ask a single question and exit
    Ask {
        /// Your question in natural language
        question: String,
    },

    /// Parse the log file and print the formatted context
    Parse {
        /// Print entries as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Show how the formatted context is chunked
    Chunks,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = resolve_config(cli.config.as_deref())?;
    let mut rag = file_config.rag;
    rag.apply_env();
    if let Some(p) = cli.provider {
        rag.provider = p.into();
    }

    let log_file = cli
        .file
        .or(file_config.log_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let raw = read_log_file(&log_file)?;
    info!(path = %log_file.display(), bytes = raw.len(), "Log file read");

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let qa = load_orchestrator(&rag, &raw).await?;
            let stdin = io::stdin();
            chat::run_loop(&qa, stdin.lock(), &mut io::stdout()).await?;
        }
        Commands::Ask { question } => {
            let qa = load_orchestrator(&rag, &raw).await?;
            let answer = qa.ask(&question).await?;
            println!("{}", answer.text);
            eprintln!(
                "{} {}",
                "Sources:".dimmed(),
                answer.sources.len().to_string().yellow()
            );
        }
        Commands::Parse { json } => {
            let report = LogParser::new().parse(&raw);
            if json {
                println!("{}", serde_json::to_string_pretty(&report.entries)?);
            } else {
                println!("{}", format_entries(&report.entries));
            }
            print_parse_summary(&report);
        }
        Commands::Chunks => {
            show_chunks(&rag, &raw)?;
        }
    }

    Ok(())
}

async fn load_orchestrator(
    rag: &RagConfig,
    raw: &str,
) -> Result<QaOrchestrator, Box<dyn std::error::Error>> {
    let mut qa = QaOrchestrator::new(
        rag.embedder()?,
        Box::new(MemoryIndex::new()),
        rag.llm_client()?,
        rag,
    )?;

    let summary = qa.load(raw).await?;
    eprintln!(
        "{} {} entries, {} chunks ({} timestamp warnings, {} lines skipped)",
        "Indexed".green(),
        summary.entries,
        summary.chunks,
        summary.diagnostics,
        summary.skipped
    );
    Ok(qa)
}

fn print_parse_summary(report: &ParseReport) {
    eprintln!(
        "{} {} entries | {} {} | {} {}",
        "Parsed:".dimmed(),
        report.entries.len().to_string().green(),
        "Timestamp warnings:".dimmed(),
        report.diagnostics.len().to_string().yellow(),
        "Skipped:".dimmed(),
        report.skipped
    );

    let (counts, unknown) = report.level_counts();
    if counts.is_empty() && unknown == 0 {
        return;
    }
    let mut parts: Vec<String> = counts
        .iter()
        .rev()
        .map(|(level, n)| format!("{} {}", colour_level(*level), n))
        .collect();
    if unknown > 0 {
        parts.push(format!("{} {}", "other".dimmed(), unknown));
    }
    eprintln!("{} {}", "Levels:".dimmed(), parts.join(" | "));
}

fn colour_level(level: LogLevel) -> ColoredString {
    match level {
        LogLevel::Fatal | LogLevel::Error => level.as_str().red(),
        LogLevel::Warn => level.as_str().yellow(),
        LogLevel::Info => level.as_str().green(),
        LogLevel::Debug | LogLevel::Trace => level.as_str().dimmed(),
    }
}

fn show_chunks(rag: &RagConfig, raw: &str) -> Result<(), Box<dyn std::error::Error>> {
    let report = LogParser::new().parse(raw);
    let context = format_entries(&report.entries);
    let chunker = Chunker::new(rag.chunking.to_chunker_config())?;
    let chunks = chunker.split(&context);
    let size = chunker.config().chunk_size;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Chars", "First line"]);

    for (i, chunk) in chunks.iter().enumerate() {
        let chars = chunk.chars().count();
        let chars = if chars > size {
            chars.to_string().red().to_string()
        } else {
            chars.to_string()
        };
        let first: String = chunk.lines().next().unwrap_or("").chars().take(50).collect();
        table.add_row(vec![(i + 1).to_string(), chars, first]);
    }

    println!("{table}");
    print_parse_summary(&report);

    let rebuilt = reassemble(&chunks, chunker.config().overlap);
    if rebuilt == context {
        println!("{} {} chunks reassemble to the original context", "✓".green(), chunks.len());
        Ok(())
    } else {
        Err("chunks do not reassemble to the original context".into())
    }
}
