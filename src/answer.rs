//! Question answering over the indexed document.
//!
//! Pipeline: embed the question → retrieve the nearest chunks → render the
//! prompt → ask the chat model. The outcome is an explicit [`Answer`]:
//! generated text, or a marker that nothing has been indexed yet. Provider
//! and store failures propagate as errors; they are never folded into the
//! answer text.

use anyhow::{bail, Result};

use crate::chat::ChatClient;
use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::models::{Answer, ScoredChunk};
use crate::store::VectorStore;

/// Instructional template sent to the chat model. Rendered with the
/// retrieved context and the user's question.
const ANSWER_PROMPT: &str = "\
Instructions:
    You are trained to extract answers from the given Context and the User's Question. \
Your response must be based on semantic understanding, which means even if the wording is \
not an exact match, infer the closest possible meaning from the Context.

    Key Points to Follow:
    - **Precise Answer Length**: The answer must be between a minimum of 40 words and a maximum of 100 words.
    - **Strict Answering Rules**: Do not include any unnecessary text. The answer should be concise and focused directly on the question.
    - **Professional Language**: Do not use any abusive or prohibited language. Always respond in a polite and gentle tone.
    - **No Personal Information Requests**: Do not ask for personal information from the user at any point.
    - **Concise & Understandable**: Provide the most concise, clear, and understandable answer possible.
    - **Semantic Similarity**: If exact wording isn't available in the Context, use your semantic understanding to infer the answer. If there are semantically related phrases, use them to generate a precise response. Use natural language understanding to interpret closely related words or concepts.
    - **Unavailable Information**: If the answer is genuinely not found in the Context, politely apologize and inform the user that the specific information is not available in the provided context.

    Context:
    {context}

    **User's Question:** {question}

    Respond in a polite, professional, and concise manner.
";

/// Fixed reply for the graceful no-index case.
pub const NOT_INDEXED_ANSWER: &str =
    "No documents have been indexed yet. Please upload a PDF before asking questions.";

/// Answer a question against the current index generation.
pub async fn answer_question(
    config: &Config,
    embedder: &EmbeddingClient,
    chat: &ChatClient,
    store: &VectorStore,
    question: &str,
) -> Result<Answer> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    if store.generation().await?.is_none() {
        return Ok(Answer::NotIndexed);
    }

    let query_vector = embedder.embed_query(question).await?;
    let retrieved = store.search(query_vector, config.retrieval.top_k).await?;

    tracing::info!(retrieved = retrieved.len(), "answering question");

    let context = assemble_context(&retrieved);
    let prompt = render_prompt(&context, question);
    let completion = chat.complete(&prompt).await?;

    Ok(Answer::Generated(completion))
}

/// Retrieved chunk texts joined with blank lines, in similarity order.
fn assemble_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_prompt(context: &str, question: &str) -> String {
    ANSWER_PROMPT
        .replace("{context}", context)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(text: &str, index: i64, score: f32) -> ScoredChunk {
        ScoredChunk {
            text: text.to_string(),
            chunk_index: index,
            score,
        }
    }

    #[test]
    fn prompt_contains_context_and_question() {
        let prompt = render_prompt("the sky is blue", "what color is the sky?");
        assert!(prompt.contains("the sky is blue"));
        assert!(prompt.contains("**User's Question:** what color is the sky?"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
    }

    #[test]
    fn context_preserves_similarity_order() {
        let chunks = vec![
            scored("most similar", 7, 0.9),
            scored("less similar", 2, 0.5),
        ];
        let context = assemble_context(&chunks);
        assert_eq!(context, "most similar\n\nless similar");
    }

    #[test]
    fn empty_retrieval_renders_empty_context() {
        assert_eq!(assemble_context(&[]), "");
    }
}
