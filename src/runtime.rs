//! Runtime services and shared state for the order-bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{
        callback::{self, CallbackState},
        chat::ChatClient,
    },
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the chat client and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the slack client.
        let chat = ChatClient::slack(&config).await?;

        Ok(Self { config, chat })
    }

    /// Runs the callback server, which receives both events and interactions, until shutdown.
    pub async fn start(&self) -> Void {
        let state = CallbackState {
            config: self.config.clone(),
            chat: self.chat.clone(),
        };

        callback::serve(state).await?;

        info!("Callback server stopped.");

        Ok(())
    }
}
