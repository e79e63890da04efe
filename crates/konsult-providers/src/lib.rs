//! # Konsult Providers
//!
//! Remote LLM provider implementation. A single `OpenAiCompatibleClient`
//! serves both trait seams — embeddings and chat completions — against any
//! OpenAI-compatible endpoint, distinguished only by base URL and API key.

pub mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleClient;
