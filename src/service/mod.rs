//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the order-bot:
//! - Chat services (e.g., Slack)
//! - The HTTP server receiving interaction callbacks
//!
//! The chat service defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod callback;
pub mod chat;
