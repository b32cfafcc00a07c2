// src/llm/mod.rs
//! Generative model seam: one prompt in, generated text out

use anyhow::Result;
use async_trait::async_trait;

pub mod chat_client;
pub mod prompts;

pub use chat_client::ChatClient;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a single prompt and return the model's text, without streaming.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}
