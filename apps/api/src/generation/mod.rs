//! Content generation: pluggable, trait-based adapter over the generation service.
//!
//! Default: `LlmContentGenerator` (chat completions via `llm_client`).
//! Tests and offline runs swap in any other `ContentGenerator`.
//!
//! `AppState` holds an `Arc<dyn ContentGenerator>`, chosen at startup.

pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::generation::prompts::build_section_prompt;
use crate::llm_client::prompts::BUSINESS_ANALYST_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::transcript::truncate_chars;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Produces the narrative for one section. Implement this to swap backends
/// without touching the orchestrator or handlers.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, context: &str, instruction: &str) -> Result<String, GenerationError>;
}

/// Generator backed by the chat-completions client.
pub struct LlmContentGenerator {
    llm: LlmClient,
    max_context_chars: usize,
}

impl LlmContentGenerator {
    pub fn new(llm: LlmClient, max_context_chars: usize) -> Self {
        Self {
            llm,
            max_context_chars,
        }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, context: &str, instruction: &str) -> Result<String, GenerationError> {
        let context = truncate_chars(context, self.max_context_chars);
        let prompt = build_section_prompt(context, instruction);
        debug!(
            context_chars = context.chars().count(),
            model = self.llm.model(),
            "requesting section content"
        );
        Ok(self.llm.call_text(&prompt, BUSINESS_ANALYST_SYSTEM).await?)
    }
}
