//! Shared data types: passages, prompts, and channel-neutral messages.

use serde::{Deserialize, Serialize};

/// A bounded excerpt of the knowledge document used as a retrieval unit.
///
/// Immutable once produced by the chunker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    /// Starting character index in the source document.
    pub source_offset: usize,
}

/// A passage together with its embedding vector.
///
/// Owned by the index for its entire lifetime; never mutated. All vectors
/// in one index share the dimensionality of the embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedPassage {
    pub passage: Passage,
    pub vector: Vec<f32>,
}

/// The assembled completion request, built right before the provider call
/// and discarded after use.
#[derive(Debug, Clone)]
pub struct PromptPayload {
    pub system_instruction: String,
    pub context_text: String,
    pub user_question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A role-tagged chat message in provider wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl PromptPayload {
    /// Render as exactly one system message and one user message.
    /// No conversation history is carried across calls.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system_instruction.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: format!("{}\n\n{}", self.context_text, self.user_question),
            },
        ]
    }
}

/// An inbound message from the chat channel.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub sender_id: i64,
    pub sender_name: Option<String>,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// An outbound reply for the chat channel.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub content: String,
}
