//! Prompt assembly for answer generation

use crate::types::response::RetrievedSegment;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved segments into the context block, in retrieval order,
    /// each tagged with its rank index so the model can reference it.
    pub fn build_context(results: &[RetrievedSegment]) -> String {
        let mut context = String::new();
        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!("[{}] {}\n", i, result.text));
        }
        context
    }

    /// Assemble the full prompt: fixed instruction template, context block,
    /// and the original query. No truncation beyond what chunking bounded.
    pub fn build_prompt(query: &str, results: &[RetrievedSegment]) -> String {
        format!(
            "You are a helpful assistant. Use the following document context:\n\n{}\nUser question: {}\nAnswer concisely.",
            Self::build_context(results),
            query
        )
    }
}
