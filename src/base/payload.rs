//! Inbound callbacks: interactions and Events API deliveries.
//!
//! Slack posts interactions as `application/x-www-form-urlencoded` bodies whose
//! `payload` field is a JSON document tagged by `type`. Events arrive as plain
//! JSON, also tagged by `type`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::{message::AttachmentAction, types::InteractionError};
use crate::interaction::mention::IncomingMessage;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
    InteractiveMessage(InteractiveMessage),
    DialogSubmission(DialogSubmission),
    DialogCancellation(DialogCancellation),
}

impl InteractionPayload {
    /// Decodes the JSON carried in the `payload` form field.
    pub fn from_form_value(payload: &str) -> Result<Self, InteractionError> {
        serde_json::from_str(payload).map_err(|e| InteractionError::MalformedPayload(e.to_string()))
    }

    /// The verification token included by Slack.
    pub fn token(&self) -> &str {
        match self {
            InteractionPayload::InteractiveMessage(m) => &m.token,
            InteractionPayload::DialogSubmission(s) => &s.token,
            InteractionPayload::DialogCancellation(c) => &c.token,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InteractionPayload::InteractiveMessage(_) => "interactive_message",
            InteractionPayload::DialogSubmission(_) => "dialog_submission",
            InteractionPayload::DialogCancellation(_) => "dialog_cancellation",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdName {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub domain: String,
}

/// A button click or select choice on one of our attachments.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractiveMessage {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub callback_id: String,
    #[serde(default)]
    pub actions: Vec<AttachmentAction>,
    pub user: IdName,
    pub channel: IdName,
    #[serde(default)]
    pub team: Team,
    #[serde(default)]
    pub trigger_id: String,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub action_ts: String,
    #[serde(default)]
    pub message_ts: String,
    /// Absent for ephemeral messages.
    #[serde(default)]
    pub original_message: Option<Value>,
}

/// A filled-in dialog.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogSubmission {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub callback_id: String,
    pub user: IdName,
    pub channel: IdName,
    #[serde(default)]
    pub team: Team,
    /// Optional elements left blank arrive as `null`.
    #[serde(default)]
    pub submission: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub response_url: String,
}

impl DialogSubmission {
    /// The trimmed, non-empty value of a submitted element.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.submission.get(name).and_then(|v| v.as_deref()).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// A dialog closed without submitting.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogCancellation {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub callback_id: String,
    pub user: IdName,
    pub channel: IdName,
    #[serde(default)]
    pub state: String,
}

/// An Events API delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// Sent once when the request URL is configured.
    UrlVerification {
        #[serde(default)]
        token: String,
        challenge: String,
    },
    EventCallback {
        #[serde(default)]
        token: String,
        event: Value,
    },
    /// Rate limit notices and anything newer.
    #[serde(other)]
    Other,
}

impl EventPayload {
    /// Decodes a JSON request body.
    pub fn from_body(body: &[u8]) -> Result<Self, InteractionError> {
        serde_json::from_slice(body).map_err(|e| InteractionError::MalformedPayload(e.to_string()))
    }

    /// The verification token included by Slack, when the delivery carries one.
    pub fn token(&self) -> Option<&str> {
        match self {
            EventPayload::UrlVerification { token, .. } | EventPayload::EventCallback { token, .. } => Some(token),
            EventPayload::Other => None,
        }
    }
}

/// The fields of a `message` event the mention handler needs.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl MessageEvent {
    /// Reads a `message` event out of an event callback; other event types yield `None`.
    pub fn from_event(event: &Value) -> Option<Self> {
        let message: MessageEvent = serde_json::from_value(event.clone()).ok()?;

        (message.kind == "message").then_some(message)
    }

    /// Converts into the mention handler's view of a message; events without a channel yield `None`.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        Some(IncomingMessage {
            channel_id: self.channel?,
            user_id: self.user,
            text: self.text.unwrap_or_default(),
            bot_id: self.bot_id,
            subtype: self.subtype,
        })
    }
}
