use crate::utils::error::Result;
use async_trait::async_trait;

/// A text-in/text-out generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
