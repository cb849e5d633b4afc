//! Query-time retrieve-then-generate pipeline

mod pipeline;
mod prompt;

pub use pipeline::{QueryPipeline, QueryStage, DEFAULT_TOP_K};
pub use prompt::PromptBuilder;
