//! Provider trait seams.
//!
//! The agent pipeline only ever talks to these traits; the real
//! OpenAI-compatible client and the test stubs both implement them.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PromptPayload;

/// Turns text into fixed-length vectors via a remote embedding endpoint.
///
/// The index must be queried with the same provider instance (same model,
/// same endpoint) that built it — mixing embedding spaces produces garbage
/// rankings, so the retriever takes the embedder at construction time.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    /// All-or-nothing: a failed batch produces no partial result.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Generates a natural-language answer from an assembled prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// One stateless call: exactly one system and one user message.
    async fn complete(&self, payload: &PromptPayload) -> Result<String>;
}
