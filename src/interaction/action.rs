//! Dispatches interaction callbacks to the step of the ordering flow they belong to.

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        message::{DialogErrors, MessageParams},
        payload::{DialogCancellation, DialogSubmission, InteractionPayload, InteractiveMessage},
        types::{InteractionError, OrderAction},
    },
    interaction::order,
    service::chat::ChatClient,
};

/// What the callback server should answer Slack with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionReply {
    /// Replace the original message.
    Message(MessageParams),
    /// Answer with an empty `200`, leaving the original message in place.
    Empty,
    /// Reject the listed dialog fields.
    DialogErrors(DialogErrors),
}

/// Handles one decoded interaction callback.
///
/// The verification token is checked before anything else, whatever the
/// kind of callback.
#[instrument(skip_all, fields(kind = payload.kind()))]
pub async fn handle_interaction(payload: InteractionPayload, config: &Config, chat: &ChatClient) -> Result<InteractionReply, InteractionError> {
    if payload.token() != config.verification_token {
        warn!("Rejecting callback with an invalid token.");
        return Err(InteractionError::InvalidToken);
    }

    match payload {
        InteractionPayload::InteractiveMessage(message) => handle_action(message, chat).await,
        InteractionPayload::DialogSubmission(submission) => Ok(handle_dialog_submission(submission, chat).await),
        InteractionPayload::DialogCancellation(cancellation) => Ok(handle_dialog_cancellation(cancellation, chat).await),
    }
}

/// Handles a button click or select choice.
#[instrument(skip_all, fields(user = %message.user.id))]
async fn handle_action(message: InteractiveMessage, chat: &ChatClient) -> Result<InteractionReply, InteractionError> {
    let action = message.actions.first().ok_or(InteractionError::NoActions)?;
    let name = action.name.parse::<OrderAction>()?;

    info!("Handling `{}` action ...", name);

    let reply = match name {
        OrderAction::Select => {
            let item = action.selected_options.first().map(|o| o.value.as_str()).ok_or(InteractionError::NoSelection)?;

            InteractionReply::Message(MessageParams::with_attachment(order::confirm_attachment(item)))
        }
        OrderAction::Start => InteractionReply::Message(order::result_message(":ok: Donezo", "")),
        OrderAction::Cancel => InteractionReply::Message(order::result_message(format!(":x: @{} canceled the request", message.user.name), "")),
        OrderAction::Dialog => {
            let dialog = order::order_dialog(&action.value);

            match chat.open_dialog(&message.trigger_id, &dialog).await {
                Ok(()) => InteractionReply::Empty,
                Err(err) => {
                    error!("Failed to open dialog: {}", err);
                    InteractionReply::Message(order::result_message(":warning: could not open the order form", ""))
                }
            }
        }
        OrderAction::Approve => {
            let item = message.original_message.as_ref().and_then(first_field_value).unwrap_or_default();

            InteractionReply::Message(order::result_message(format!(":white_check_mark: @{} approved the order", message.user.name), item))
        }
        OrderAction::Reject => {
            let item = message.original_message.as_ref().and_then(first_field_value).unwrap_or_default();

            InteractionReply::Message(order::result_message(format!(":no_entry_sign: @{} rejected the order", message.user.name), item))
        }
    };

    Ok(reply)
}

/// Handles a filled-in order form.
///
/// Slack only accepts an empty `200` or field errors here, so failures to
/// post the approval are logged rather than returned.
#[instrument(skip_all, fields(user = %submission.user.id))]
async fn handle_dialog_submission(submission: DialogSubmission, chat: &ChatClient) -> InteractionReply {
    if let Some(errors) = order::validate_submission(&submission) {
        info!("Order form has {} invalid field(s).", errors.errors.len());
        return InteractionReply::DialogErrors(errors);
    }

    let attachment = order::approval_attachment(&submission, chrono::Utc::now().timestamp());
    let text = format!(
        "you ordered {} x {}",
        submission.value("item_count").unwrap_or_default(),
        submission.value("item_name").unwrap_or_default()
    );
    let params = MessageParams::with_attachment(attachment).with_text(text);

    if let Err(err) = chat.post_ephemeral(&submission.channel.id, &submission.user.id, &params).await {
        error!("Failed to post approval request: {}", err);
    }

    InteractionReply::Empty
}

/// Handles a closed order form.
#[instrument(skip_all, fields(user = %cancellation.user.id))]
async fn handle_dialog_cancellation(cancellation: DialogCancellation, chat: &ChatClient) -> InteractionReply {
    let params = MessageParams::default().with_text(":x: order form was closed");

    if let Err(err) = chat.post_ephemeral(&cancellation.channel.id, &cancellation.user.id, &params).await {
        warn!("Failed to acknowledge closed order form: {}", err);
    }

    InteractionReply::Empty
}

/// The value of the first field of the first attachment of a message.
fn first_field_value(message: &Value) -> Option<String> {
    message
        .pointer("/attachments/0/fields/0/value")
        .and_then(Value::as_str)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_field_value_reads_the_item_name() {
        let message = json!({
            "attachments": [{ "fields": [{ "title": "Item name", "value": "Tea" }, { "title": "Reason", "value": "Cold" }] }]
        });

        assert_eq!(first_field_value(&message), Some("Tea".to_string()));
        assert_eq!(first_field_value(&json!({ "text": "hello" })), None);
    }
}
