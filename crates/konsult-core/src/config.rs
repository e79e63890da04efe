//! Konsult configuration system.
//!
//! TOML file + environment overrides for secrets. Credentials are never
//! literals in source; `validate()` fails fast before the polling loop
//! starts when a required credential is missing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{KonsultError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KonsultConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

impl KonsultConfig {
    /// Load config from the default path (~/.konsult/config.toml),
    /// falling back to defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Load config from a specific path, then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| KonsultError::Config(format!("Failed to read config: {e}")))?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| KonsultError::Config(format!("Failed to parse config: {e}")))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over file values for secrets.
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            if !token.is_empty() {
                self.telegram.bot_token = token;
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                self.llm.api_key = key;
            }
        }
    }

    /// Check that required credentials are present.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.is_empty() {
            return Err(KonsultError::Config(
                "telegram.bot_token is not set (or TELEGRAM_BOT_TOKEN)".into(),
            ));
        }
        if self.llm.api_key.is_empty() {
            return Err(KonsultError::Config(
                "llm.api_key is not set (or OPENAI_API_KEY)".into(),
            ));
        }
        if self.knowledge.chunk_overlap >= self.knowledge.chunk_size {
            return Err(KonsultError::Config(format!(
                "knowledge.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.knowledge.chunk_overlap, self.knowledge.chunk_size
            )));
        }
        if self.knowledge.top_k == 0 {
            return Err(KonsultError::Config("knowledge.top_k must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".konsult")
            .join("config.toml")
    }
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

fn default_poll_interval() -> u64 {
    1
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            poll_interval: default_poll_interval(),
        }
    }
}

/// Embedding + completion provider configuration (OpenAI-compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".into()
}
fn default_chat_model() -> String {
    "gpt-4-turbo".into()
}
fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Knowledge base and index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Source document for the knowledge base. Absence is not an error —
    /// the bot degrades to the refusal reply.
    #[serde(default = "default_document_path")]
    pub document_path: String,
    /// System instruction text. Absence falls back to a built-in default.
    #[serde(default = "default_instruction_path")]
    pub instruction_path: String,
    /// Persisted vector index location.
    #[serde(default = "default_index_path")]
    pub index_path: String,
    /// Chunk window size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters. Must be < chunk_size.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// How many passages to retrieve per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_document_path() -> String {
    "knowledge.txt".into()
}
fn default_instruction_path() -> String {
    "instruction.txt".into()
}
fn default_index_path() -> String {
    "~/.konsult/index.json".into()
}
fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_top_k() -> usize {
    2
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            instruction_path: default_instruction_path(),
            index_path: default_index_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
        }
    }
}

/// Prompt assembly limits and fixed user-facing replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Max characters of the system instruction sent per call.
    #[serde(default = "default_instruction_max")]
    pub instruction_max: usize,
    /// Max characters of the static knowledge excerpt sent per call.
    #[serde(default = "default_knowledge_max")]
    pub knowledge_max: usize,
    /// Max characters of the joined retrieved passages sent per call.
    #[serde(default = "default_context_max")]
    pub context_max: usize,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_refusal")]
    pub refusal: String,
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
}

fn default_instruction_max() -> usize {
    2000
}
fn default_knowledge_max() -> usize {
    4000
}
fn default_context_max() -> usize {
    6000
}
fn default_greeting() -> String {
    "Hi! I am your consultant bot. Ask me anything about the knowledge base.".into()
}
fn default_refusal() -> String {
    "I can only answer questions covered by my knowledge base, and I could not \
     find anything relevant. Please try rephrasing your question."
        .into()
}
fn default_error_reply() -> String {
    "Sorry, something went wrong while preparing your answer. Please try again \
     in a moment."
        .into()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            instruction_max: default_instruction_max(),
            knowledge_max: default_knowledge_max(),
            context_max: default_context_max(),
            greeting: default_greeting(),
            refusal: default_refusal(),
            error_reply: default_error_reply(),
        }
    }
}
