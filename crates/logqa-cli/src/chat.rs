// Interactive question loop
// reads questions line by line until `exit` or end of input

use colored::Colorize;
use logqa_rag::QaOrchestrator;
use std::io::{self, BufRead, Write};

pub async fn run_loop<R: BufRead, W: Write>(
    qa: &QaOrchestrator,
    mut input: R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "Log Analyzer using {} (via {})",
            qa.llm().model(),
            qa.llm().provider()
        )
        .cyan()
        .bold()
    )?;
    writeln!(out, "Type 'exit' to quit")?;

    let mut line = String::new();
    loop {
        write!(out, "\n{} ", "Question about logs:".bold())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // EOF (ctrl-d / piped input ran out)
            writeln!(out)?;
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            writeln!(out, "Exiting...")?;
            break;
        }

        match qa.ask(question).await {
            Ok(answer) => {
                writeln!(out, "\n{} {}", "Answer:".green().bold(), answer.text)?;
            }
            Err(e) => {
                // one failed question should not end the session
                writeln!(out, "\n{} {}", "Error:".red().bold(), e)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use logqa_rag::{EmbeddingProvider, LlmClient, MemoryIndex, ProviderError, RagConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ConstEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ConstEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    // fails every second call
    struct FlakyLlm {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmClient for FlakyLlm {
        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                Err(ProviderError::ApiError("model overloaded".to_string()))
            } else {
                Ok(format!("answer {}", n))
            }
        }

        fn model(&self) -> &str {
            "llama3"
        }

        fn provider(&self) -> &str {
            "ollama"
        }
    }

    async fn loaded() -> (QaOrchestrator, Arc<FlakyLlm>) {
        colored::control::set_override(false);
        let llm = Arc::new(FlakyLlm {
            calls: AtomicUsize::new(0),
        });
        let mut qa = QaOrchestrator::new(
            Arc::new(ConstEmbedder),
            Box::new(MemoryIndex::new()),
            llm.clone(),
            &RagConfig::default(),
        )
        .unwrap();
        qa.load("[2024-01-01 10:00:00] auth ERROR: login failed").await.unwrap();
        (qa, llm)
    }

    #[tokio::test]
    async fn test_exit_is_case_insensitive() {
        let (qa, llm) = loaded().await;
        let mut out = Vec::new();

        run_loop(&qa, "what failed?\nEXIT\nnever asked\n".as_bytes(), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Log Analyzer using llama3 (via ollama)"));
        assert!(text.contains("Answer: answer 0"));
        assert!(text.contains("Exiting..."));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_do_not_end_the_loop() {
        let (qa, llm) = loaded().await;
        let mut out = Vec::new();

        run_loop(&qa, "one\ntwo\n\nthree\nexit\n".as_bytes(), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Answer: answer 0"));
        assert!(text.contains("Error: completion provider failed: API error: model overloaded"));
        assert!(text.contains("Answer: answer 2"));
        // blank line skipped, no call for it
        assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_eof_ends_loop() {
        let (qa, _llm) = loaded().await;
        let mut out = Vec::new();

        run_loop(&qa, "".as_bytes(), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Exiting..."));
    }
}
