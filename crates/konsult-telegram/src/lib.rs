//! # Konsult Telegram
//! Telegram Bot API channel — long polling + message sending.

pub mod telegram;

pub use telegram::{TelegramChannel, TelegramPollingStream};
