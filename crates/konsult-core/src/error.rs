//! Error taxonomy for the Konsult workspace.
//!
//! Fatal vs. recoverable is decided by the caller: `Config` aborts startup,
//! `Provider`/`Http` are converted to user-visible reply text per message,
//! `IndexNotFound`/`IndexCorrupt` trigger a rebuild from the source document.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, KonsultError>;

#[derive(Debug, thiserror::Error)]
pub enum KonsultError {
    /// Missing or invalid configuration — prevents startup.
    #[error("Config error: {0}")]
    Config(String),

    /// Embedding or completion provider rejected the request.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Transport-level HTTP failure (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Chat channel (Telegram Bot API) failure.
    #[error("Channel error: {0}")]
    Channel(String),

    /// No persisted index at the given location.
    #[error("Index not found: {0}")]
    IndexNotFound(PathBuf),

    /// Persisted index exists but cannot be decoded.
    #[error("Corrupt index: {0}")]
    IndexCorrupt(String),

    /// Contract violation in an internal call — a programming defect.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
