//! # Konsult Core
//!
//! Shared foundation for the Konsult bot: configuration, error taxonomy,
//! message and passage types, and the provider trait seams.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::KonsultConfig;
pub use error::{KonsultError, Result};
