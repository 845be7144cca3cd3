pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::GlmClient;
pub use error::GlmError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Usage};

/// External text-generation capability injected into the pipeline.
///
/// Implementations must be safe to call concurrently from independent tasks;
/// the pipeline shares one instance behind an `Arc` across the fan-out.
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GlmError>;
}
