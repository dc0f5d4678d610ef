//! Canned messages of the ordering flow.
//!
//! Every message here is built fresh per request; nothing is remembered
//! between one interaction and the next.

use crate::base::{
    config::Config,
    message::{ActionStyle, Attachment, AttachmentAction, AttachmentField, Dialog, DialogElement, DialogErrors, MessageParams, TextSubtype},
    payload::DialogSubmission,
    types::{CALLBACK_ORDER, CALLBACK_ORDER_APPROVAL, CALLBACK_ORDER_FORM, COLOR_APPROVAL, COLOR_ORDER, OrderAction},
};

/// Largest quantity accepted in the order form.
pub const MAX_ITEM_COUNT: u32 = 1000;

/// The menu posted in answer to a mention.
pub fn menu_attachment(config: &Config) -> Attachment {
    Attachment::new(CALLBACK_ORDER, COLOR_ORDER)
        .with_text(&config.menu_prompt)
        .with_action(AttachmentAction::select(OrderAction::Select.as_str(), config.menu_items.iter().cloned()))
        .with_action(AttachmentAction::button(OrderAction::Cancel.as_str(), "Cancel", ActionStyle::Danger))
}

/// Replaces the menu once an item was picked.
pub fn confirm_attachment(item: &str) -> Attachment {
    Attachment::new(CALLBACK_ORDER, COLOR_ORDER)
        .with_text(format!("OK to order {} ?", title_case(item)))
        .with_action(AttachmentAction::button(OrderAction::Start.as_str(), "Yes", ActionStyle::Primary).with_value(OrderAction::Start.as_str()))
        .with_action(AttachmentAction::button(OrderAction::Dialog.as_str(), "Open Dialog", ActionStyle::Warning).with_value(item))
        .with_action(AttachmentAction::button(OrderAction::Cancel.as_str(), "No", ActionStyle::Danger))
}

/// A final message: no controls left, just one field describing the outcome.
pub fn result_message(title: impl Into<String>, value: impl Into<String>) -> MessageParams {
    MessageParams::with_attachment(Attachment::new(CALLBACK_ORDER, COLOR_ORDER).with_field(AttachmentField::long(title, value)))
}

/// The order form, prefilled with the picked item.
pub fn order_dialog(item: &str) -> Dialog {
    Dialog {
        callback_id: CALLBACK_ORDER_FORM.to_string(),
        title: "Order request".to_string(),
        submit_label: "Request".to_string(),
        notify_on_cancel: true,
        state: item.to_string(),
        elements: vec![
            DialogElement::Text {
                label: "Item name".to_string(),
                name: "item_name".to_string(),
                subtype: None,
                placeholder: None,
                hint: None,
                value: (!item.is_empty()).then(|| item.to_string()),
                optional: false,
            },
            DialogElement::Text {
                label: "URL".to_string(),
                name: "item_url".to_string(),
                subtype: Some(TextSubtype::Url),
                placeholder: Some("https://".to_string()),
                hint: Some("Where can it be bought?".to_string()),
                value: None,
                optional: true,
            },
            DialogElement::Textarea {
                label: "Reason".to_string(),
                name: "item_reason".to_string(),
                placeholder: None,
                hint: Some("Why do we need it?".to_string()),
                optional: false,
            },
            DialogElement::Text {
                label: "How many".to_string(),
                name: "item_count".to_string(),
                subtype: Some(TextSubtype::Number),
                placeholder: None,
                hint: None,
                value: Some("1".to_string()),
                optional: false,
            },
        ],
    }
}

/// Checks a submitted order form, returning the field errors to show if any.
pub fn validate_submission(submission: &DialogSubmission) -> Option<DialogErrors> {
    let mut errors = DialogErrors::default();

    if submission.value("item_name").is_none() {
        errors.push("item_name", "Tell us what to order.");
    }

    match submission.value("item_count").map(str::parse::<u32>) {
        Some(Ok(count)) if (1..=MAX_ITEM_COUNT).contains(&count) => {}
        _ => errors.push("item_count", format!("Enter a whole number between 1 and {MAX_ITEM_COUNT}.")),
    }

    (!errors.is_empty()).then_some(errors)
}

/// The approval request built from a submitted order form.
pub fn approval_attachment(submission: &DialogSubmission, submitted_at: i64) -> Attachment {
    let value = |name: &str| submission.value(name).unwrap_or_default().to_string();

    Attachment::new(CALLBACK_ORDER_APPROVAL, COLOR_APPROVAL)
        .with_text(format!("@{} submitted order request", submission.user.name))
        .with_field(AttachmentField::long("Item name", value("item_name")))
        .with_field(AttachmentField::long("Reason", value("item_reason")))
        .with_field(AttachmentField::long("URL", value("item_url")))
        .with_field(AttachmentField::long("How many", value("item_count")))
        .with_action(AttachmentAction::button(OrderAction::Approve.as_str(), "Approve", ActionStyle::Primary))
        .with_action(AttachmentAction::button(OrderAction::Reject.as_str(), "Reject", ActionStyle::Danger))
        .with_footer("order-bot")
        .with_ts(submitted_at)
}

/// Upper-cases the first letter of each word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = ' ';

    for c in s.chars() {
        if is_word_separator(prev) {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = c;
    }

    out
}

/// ASCII punctuation and any whitespace end a word; letters, digits, and `_` do not.
fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || c == '_')
    } else {
        c.is_whitespace()
    }
}
