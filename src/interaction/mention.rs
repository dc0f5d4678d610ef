//! Handles messages that mention the bot in the ordering channel.

use std::fmt;

use tracing::{Instrument, debug, error, info, instrument};

use crate::{
    base::{config::Config, message::MessageParams, types::Void},
    interaction::order,
    service::chat::ChatClient,
};

/// The parts of a channel message the mention handler cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub channel_id: String,
    pub user_id: Option<String>,
    pub text: String,
    /// Set for messages posted by bots, including this one.
    pub bot_id: Option<String>,
    /// Set for edits, joins, and other non-plain messages.
    pub subtype: Option<String>,
}

/// Why a mention was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionError {
    /// The message mentioned the bot but did not start with the trigger word.
    InvalidMessage(String),
}

impl fmt::Display for MentionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MentionError::InvalidMessage(text) => write!(f, "invalid message: {text}"),
        }
    }
}

impl std::error::Error for MentionError {}

/// Parses a message addressed to the bot.
///
/// Returns `Ok(false)` when the message does not start with `<@BOT> `, and
/// `Ok(true)` when the first word after the mention is the trigger word.
pub fn parse_mention(text: &str, bot_user_id: &str, trigger_word: &str) -> Result<bool, MentionError> {
    if !text.starts_with(&format!("<@{bot_user_id}> ")) {
        return Ok(false);
    }

    let mut words = text.split_whitespace().skip(1);

    match words.next() {
        Some(word) if word == trigger_word => Ok(true),
        _ => Err(MentionError::InvalidMessage(text.to_string())),
    }
}

/// Spawns the handling of a channel message so the event is acknowledged before Slack is called.
#[instrument(skip_all)]
pub fn handle_message(message: IncomingMessage, config: Config, chat: ChatClient) {
    tokio::spawn(async move {
        // Process the event.
        let result = handle_message_internal(message, &config, &chat).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Failed to handle message: {}", err);
        }
    });
}

/// Answers a valid mention with the menu, posted ephemerally to the mentioning user.
#[instrument(skip_all, fields(channel = %message.channel_id))]
pub async fn handle_message_internal(message: IncomingMessage, config: &Config, chat: &ChatClient) -> Void {
    // Only respond in the configured channel.
    if message.channel_id != config.channel_id {
        debug!("Ignoring message from another channel: {}", message.text);
        return Ok(());
    }

    if message.bot_id.is_some() || message.subtype.is_some() {
        debug!("Ignoring bot or non-plain message.");
        return Ok(());
    }

    let Some(user_id) = message.user_id.as_deref() else {
        debug!("Ignoring message without a user.");
        return Ok(());
    };

    // Only respond to mentions of the bot.
    if !parse_mention(&message.text, chat.bot_user_id(), &config.trigger_word)? {
        return Ok(());
    }

    info!("Posting menu to {} ...", user_id);

    let params = MessageParams::with_attachment(order::menu_attachment(config));
    chat.post_ephemeral(&message.channel_id, user_id, &params).await?;

    Ok(())
}
