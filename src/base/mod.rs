//! Core components, types, and utilities for the order-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Outbound message shapes (attachments and dialogs).
//! - Inbound interaction callback payloads.
//! - Common types and result handling.

pub mod config;
pub mod message;
pub mod payload;
pub mod types;
