//! # Konsult Agent
//!
//! The per-message pipeline: retrieve top-k passages, assemble a grounded
//! prompt, call the completion provider, and always come back with reply
//! text — provider failures become an apologetic reply, never a crash of
//! the polling loop.

pub mod agent;
pub mod prompt;

pub use agent::{Agent, AgentReplies};
pub use prompt::{PromptLimits, assemble};
