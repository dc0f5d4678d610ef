//! Library root for `order-bot`.
//!
//! Order-bot is a Slack assistant that walks a user through placing an order:
//! - Answers a mention in the ordering channel with a menu
//! - Confirms the picked item, or opens an order form dialog
//! - Posts the submitted order back as an approval request
//!
//! One HTTP server receives channel messages from the Events API and answers
//! button, select, and dialog callbacks. Nothing is stored; each step lives in
//! the message Slack holds between interactions.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the order-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat client
/// - Starts the callback server for events and interactions
pub async fn start(config: Config) -> Void {
    info!("Starting order-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
