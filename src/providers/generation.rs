//! Generation provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for single-shot answer generation from an assembled prompt.
///
/// Implementations report failures as `Error::Upstream` with stage
/// `Generation`. No streaming is required.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a textual response for the prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
