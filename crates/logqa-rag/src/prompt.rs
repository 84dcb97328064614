// Prompt template for log questions
// retrieved chunks are stuffed into one context block

const TEMPLATE: &str = "You are a log analysis assistant. Use the following pieces of log information to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.

Log Context:
{context}

Question: {question}
";

/// Join retrieved chunks with a blank line between them
pub fn build_context<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(context: &str, question: &str) -> String {
    // context first so a `{question}` inside the logs is left alone
    TEMPLATE
        .replacen("{question}", question, 1)
        .replacen("{context}", context, 1)
}
