//! Chat service integration for order-bot.
//!
//! This module provides the Slack implementation of `GenericChatClient`:
//! - Resolving the bot user with `auth.test`
//! - Posting ephemeral messages with `chat.postEphemeral`
//! - Opening dialogs with `dialog.open`
//!
//! Incoming messages and interactions reach the bot over HTTP, see
//! `service::callback`.

use crate::base::{
    config::Config,
    message::{Dialog, MessageParams},
    types::{Res, Void},
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use serde::Serialize;
use serde_json::Value;
use slack_morphism::prelude::*;
use tracing::{info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub bot_user_id: String,
    pub web: SlackWebApi,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        // Get the bot's user ID, unless it was configured.

        let bot_user_id = match &config.bot_user_id {
            Some(id) => id.clone(),
            None => resolve_bot_user_id(config).await?,
        };

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            bot_user_id,
            web: SlackWebApi::new(&config.slack_api_base, &config.slack_bot_token),
        })
    }
}

/// Asks Slack who the bot token belongs to.
async fn resolve_bot_user_id(config: &Config) -> Res<String> {
    let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

    let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
    let connector = SlackClientHyperConnector::with_connector(https_connector);
    let client: FullClient = slack_morphism::SlackClient::new(connector);

    let session = client.open_session(&bot_token);
    let bot_user = session.auth_test().await?;

    Ok(bot_user.user_id.0)
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    #[instrument(skip(self, params))]
    async fn post_ephemeral(&self, channel_id: &str, user_id: &str, params: &MessageParams) -> Res<String> {
        let request = PostEphemeralRequest {
            channel: channel_id,
            user: user_id,
            params,
        };

        let response = self.web.call("chat.postEphemeral", &request).await.map_err(|e| anyhow::anyhow!("Failed to post ephemeral message: {}", e))?;

        Ok(response["message_ts"].as_str().unwrap_or_default().to_string())
    }

    #[instrument(skip(self, dialog))]
    async fn open_dialog(&self, trigger_id: &str, dialog: &Dialog) -> Void {
        let request = OpenDialogRequest { trigger_id, dialog };

        let _ = self.web.call("dialog.open", &request).await.map_err(|e| anyhow::anyhow!("Failed to open dialog: {}", e))?;

        Ok(())
    }
}

// Web API.

#[derive(Serialize)]
struct PostEphemeralRequest<'a> {
    channel: &'a str,
    user: &'a str,
    #[serde(flatten)]
    params: &'a MessageParams,
}

#[derive(Serialize)]
struct OpenDialogRequest<'a> {
    trigger_id: &'a str,
    dialog: &'a Dialog,
}

/// Minimal Web API caller for the methods slack-morphism does not model
/// (legacy attachment actions and dialogs).
#[derive(Clone)]
pub struct SlackWebApi {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl SlackWebApi {
    pub fn new(api_base: &str, bot_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
        }
    }

    /// Calls a Web API method with a JSON body, failing when Slack answers `ok: false`.
    pub async fn call<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Res<Value> {
        let response: Value = self
            .http
            .post(format!("{}/{}", self.api_base, method))
            .bearer_auth(&self.bot_token)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        check_ok(method, response)
    }
}

/// Turns an `ok: false` Web API answer into an error carrying Slack's `error` string.
fn check_ok(method: &str, response: Value) -> Res<Value> {
    if response["ok"].as_bool() != Some(true) {
        let err = response["error"].as_str().unwrap_or("unknown");
        return Err(anyhow::anyhow!("{} failed: {}", method, err));
    }

    if let Some(warning) = response["warning"].as_str() {
        warn!("{} warning: {}", method, warning);
    }

    Ok(response)
}

// Tests.
