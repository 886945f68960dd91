//! Report Bot — collects a manager's daily report over Telegram.

pub mod bot;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
pub mod report;
