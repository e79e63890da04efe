//! # Konsult — Telegram knowledge-base consultant bot
//!
//! Answers user questions strictly from a static knowledge document:
//! chunk + embed the document once at startup (or load the persisted
//! index), then per message retrieve top-k passages, assemble a grounded
//! prompt, and call an OpenAI-compatible completion endpoint.
//!
//! Usage:
//!   konsult                         # config from ~/.konsult/config.toml
//!   konsult --config bot.toml       # explicit config file
//!   konsult --rebuild-index         # ignore the persisted index

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use konsult_agent::{Agent, AgentReplies, PromptLimits};
use konsult_core::{KonsultConfig, KonsultError};
use konsult_knowledge::{Retriever, VectorIndex, chunker};
use konsult_providers::OpenAiCompatibleClient;
use konsult_telegram::TelegramChannel;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "konsult", version, about = "Telegram knowledge-base consultant bot")]
struct Cli {
    /// Path to config file (default: ~/.konsult/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Rebuild the vector index from the knowledge document even if a
    /// persisted index exists
    #[arg(long)]
    rebuild_index: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

/// Load the persisted index, or build it from the knowledge document.
///
/// Degradation order: persisted index → rebuild from document → explicitly
/// empty index (the bot then answers every question with the refusal).
async fn acquire_index(
    config: &KonsultConfig,
    embedder: &OpenAiCompatibleClient,
    force_rebuild: bool,
) -> Result<VectorIndex> {
    let index_path = expand_path(&config.knowledge.index_path);
    let index_path = Path::new(&index_path);

    if !force_rebuild {
        match VectorIndex::load(index_path) {
            Ok(index) => return Ok(index),
            Err(KonsultError::IndexNotFound(_)) => {
                tracing::info!("No persisted index, building from document");
            }
            Err(KonsultError::IndexCorrupt(e)) => {
                tracing::warn!("Persisted index unreadable ({e}), rebuilding");
            }
            Err(e) => return Err(e).context("loading persisted index"),
        }
    }

    let document_path = expand_path(&config.knowledge.document_path);
    let text = match std::fs::read_to_string(&document_path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                "Knowledge document {document_path} unavailable ({e}); starting with an empty index"
            );
            return Ok(VectorIndex::empty());
        }
    };

    let passages = chunker::split(
        &text,
        config.knowledge.chunk_size,
        config.knowledge.chunk_overlap,
    )?;
    tracing::info!("Chunked {} into {} passages", document_path, passages.len());

    let index = VectorIndex::build(passages, embedder)
        .await
        .context("embedding the knowledge document")?;
    if let Err(e) = index.save(index_path) {
        tracing::warn!("Could not persist index to {}: {e}", index_path.display());
    }
    Ok(index)
}

const DEFAULT_INSTRUCTION: &str = "You are a consultant bot. Answer strictly from the \
provided context. If the context does not contain the answer, say that the knowledge \
base does not cover the question.";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "konsult=debug"
    } else {
        "konsult=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    // Config: file + env overrides, then fail fast on missing credentials.
    let config = match &cli.config {
        Some(path) => KonsultConfig::load_from(Path::new(path))?,
        None => KonsultConfig::load()?,
    };
    config.validate().context("invalid configuration")?;

    let provider = Arc::new(OpenAiCompatibleClient::new(&config.llm)?);

    let index = acquire_index(&config, provider.as_ref(), cli.rebuild_index).await?;
    if index.is_empty() {
        tracing::warn!("Running with an empty index — every question gets the refusal reply");
    }

    let instruction_path = expand_path(&config.knowledge.instruction_path);
    let instruction = std::fs::read_to_string(&instruction_path).unwrap_or_else(|_| {
        tracing::info!("No instruction file at {instruction_path}, using built-in default");
        DEFAULT_INSTRUCTION.to_string()
    });

    let retriever = Retriever::new(Arc::new(index), provider.clone());
    let agent = Arc::new(Agent::new(
        retriever,
        provider,
        instruction,
        String::new(),
        PromptLimits {
            instruction_max: config.prompt.instruction_max,
            knowledge_max: config.prompt.knowledge_max,
            context_max: config.prompt.context_max,
        },
        config.knowledge.top_k,
        AgentReplies {
            greeting: config.prompt.greeting.clone(),
            refusal: config.prompt.refusal.clone(),
            error_reply: config.prompt.error_reply.clone(),
        },
    ));

    let channel = TelegramChannel::new(config.telegram.clone());
    channel.connect().await?;

    let sender = Arc::new(TelegramChannel::new(config.telegram.clone()));
    let mut stream = channel.start_polling();

    tracing::info!("Konsult is ready");

    // One independent task per message: a slow completion call never
    // stalls replies to other chats. The agent and index are read-only,
    // so concurrent tasks share them without locking.
    while let Some(incoming) = stream.next().await {
        let agent = agent.clone();
        let sender = sender.clone();

        tokio::spawn(async move {
            tracing::debug!("Message from chat {}: {}", incoming.chat_id, incoming.content);
            sender.send_typing(incoming.chat_id).await;

            let reply = if incoming.content.trim() == "/start" {
                agent.greeting().to_string()
            } else {
                agent.answer(&incoming.content).await
            };

            let outgoing = konsult_core::types::OutgoingMessage {
                chat_id: incoming.chat_id,
                content: reply,
            };
            if let Err(e) = sender.send(&outgoing).await {
                tracing::error!("Failed to send reply to chat {}: {e}", incoming.chat_id);
            }
        });
    }

    Ok(())
}
