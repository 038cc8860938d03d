//! Language model capability used by the interview
//!
//! The interview only needs "complete this prompt"; vendors plug in behind
//! this trait (see `infra::llm` for the OpenAI-compatible client).

use async_trait::async_trait;

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a completion for a single user prompt
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}
