//! The answer pipeline.
//!
//! One `Agent` is constructed at startup with its index, providers, and
//! fixed replies, then shared read-only behind an `Arc` across per-message
//! tasks. No global state, no locking — the index never changes after
//! startup.

use konsult_core::traits::CompletionProvider;
use konsult_core::types::Passage;
use konsult_knowledge::Retriever;
use std::sync::Arc;

use crate::prompt::{self, PromptLimits};

/// Fixed user-facing reply strings.
#[derive(Debug, Clone)]
pub struct AgentReplies {
    pub greeting: String,
    pub refusal: String,
    pub error_reply: String,
}

/// Retrieval-augmented answer pipeline. Read-only after construction.
pub struct Agent {
    retriever: Retriever,
    completion: Arc<dyn CompletionProvider>,
    instruction: String,
    knowledge_excerpt: String,
    limits: PromptLimits,
    top_k: usize,
    replies: AgentReplies,
}

impl Agent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        retriever: Retriever,
        completion: Arc<dyn CompletionProvider>,
        instruction: String,
        knowledge_excerpt: String,
        limits: PromptLimits,
        top_k: usize,
        replies: AgentReplies,
    ) -> Self {
        Self {
            retriever,
            completion,
            instruction,
            knowledge_excerpt,
            limits,
            top_k,
            replies,
        }
    }

    /// Fixed greeting for the /start command; the pipeline is skipped.
    pub fn greeting(&self) -> &str {
        &self.replies.greeting
    }

    /// Answer one question. Never fails: every per-message error resolves
    /// to reply text so the channel always has something to send, and the
    /// pipeline stays alive for the next message.
    pub async fn answer(&self, question: &str) -> String {
        let retrieved: Vec<Passage> = match self.retriever.search(question, self.top_k).await {
            Ok(scored) => scored.into_iter().map(|s| s.passage).collect(),
            Err(e) => {
                tracing::error!("Retrieval failed: {e}");
                return self.replies.error_reply.clone();
            }
        };

        let Some(payload) = prompt::assemble(
            &self.instruction,
            &self.knowledge_excerpt,
            &retrieved,
            question,
            self.limits,
        ) else {
            tracing::debug!("No grounding for question; sending refusal");
            return self.replies.refusal.clone();
        };

        match self.completion.complete(&payload).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Completion failed: {e}");
                self.replies.error_reply.clone()
            }
        }
    }
}
