//! Outbound message shapes: legacy attachments and dialogs.
//!
//! These mirror Slack's documented JSON schema. Empty values are skipped on
//! the wire so a serialized message only carries what was set.

use serde::{Deserialize, Serialize};

/// Body of a replacement response or an ephemeral post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_original: Option<bool>,
}

impl MessageParams {
    pub fn with_attachment(attachment: Attachment) -> Self {
        Self {
            attachments: vec![attachment],
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A secondary attachment: text, color, fields, and interactive controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fallback: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub callback_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AttachmentAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl Attachment {
    pub fn new(callback_id: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            callback_id: callback_id.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.fallback = text.clone();
        self.text = text;
        self
    }

    pub fn with_field(mut self, field: AttachmentField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_action(mut self, action: AttachmentAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_ts(mut self, ts: i64) -> Self {
        self.ts = Some(ts);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

impl AttachmentField {
    /// A full-width field.
    pub fn long(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Button,
    Select,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStyle {
    Primary,
    Danger,
    Warning,
    #[default]
    #[serde(other)]
    Default,
}

/// A button or select inside an attachment.
///
/// Inbound callbacks reuse this type, where `selected_options` holds the
/// user's pick for a select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentAction {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: ActionType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ActionStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AttachmentActionOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_options: Vec<AttachmentActionOption>,
}

impl AttachmentAction {
    pub fn button(name: impl Into<String>, text: impl Into<String>, style: ActionStyle) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            kind: ActionType::Button,
            style: Some(style),
            ..Default::default()
        }
    }

    pub fn select<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: ActionType::Select,
            options: items.into_iter().map(AttachmentActionOption::same).collect(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentActionOption {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub value: String,
}

impl AttachmentActionOption {
    /// An option whose label is its value.
    pub fn same(item: impl Into<String>) -> Self {
        let value = item.into();
        Self { text: value.clone(), value }
    }
}

/// A dialog form opened with a trigger id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub callback_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub submit_label: String,
    #[serde(default)]
    pub notify_on_cancel: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    pub elements: Vec<DialogElement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSubtype {
    Email,
    Number,
    Tel,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogElement {
    Text {
        label: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtype: Option<TextSubtype>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default)]
        optional: bool,
    },
    Textarea {
        label: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
        #[serde(default)]
        optional: bool,
    },
    Select {
        label: String,
        name: String,
        options: Vec<DialogOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default)]
        optional: bool,
    },
}

impl DialogElement {
    pub fn name(&self) -> &str {
        match self {
            DialogElement::Text { name, .. } | DialogElement::Textarea { name, .. } | DialogElement::Select { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogOption {
    pub label: String,
    pub value: String,
}

/// Field-level errors returned in answer to a dialog submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogErrors {
    pub errors: Vec<DialogError>,
}

impl DialogErrors {
    pub fn push(&mut self, name: impl Into<String>, error: impl Into<String>) {
        self.errors.push(DialogError {
            name: name.into(),
            error: error.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogError {
    pub name: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_values_are_omitted() {
        let params = MessageParams::with_attachment(
            Attachment::new("beer", "#f9a41b").with_action(AttachmentAction::button("cancel", "Cancel", ActionStyle::Danger)),
        );

        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(
            value,
            json!({
                "attachments": [{
                    "color": "#f9a41b",
                    "callback_id": "beer",
                    "actions": [{ "name": "cancel", "text": "Cancel", "type": "button", "style": "danger" }]
                }]
            })
        );
    }

    #[test]
    fn select_options_use_item_as_label() {
        let action = AttachmentAction::select("select", ["Yona Yona Ale"]);
        let value = serde_json::to_value(&action).unwrap();

        assert_eq!(value["type"], "select");
        assert_eq!(value["options"], json!([{ "text": "Yona Yona Ale", "value": "Yona Yona Ale" }]));
    }

    #[test]
    fn dialog_elements_are_tagged_by_type() {
        let element = DialogElement::Text {
            label: "How many".to_string(),
            name: "item_count".to_string(),
            subtype: Some(TextSubtype::Number),
            placeholder: None,
            hint: None,
            value: Some("1".to_string()),
            optional: false,
        };

        let value = serde_json::to_value(&element).unwrap();

        assert_eq!(
            value,
            json!({ "type": "text", "label": "How many", "name": "item_count", "subtype": "number", "value": "1", "optional": false })
        );
        assert_eq!(element.name(), "item_count");
    }

    #[test]
    fn inbound_action_decodes_selected_options() {
        let action: AttachmentAction = serde_json::from_value(json!({
            "name": "select",
            "type": "select",
            "selected_options": [{ "value": "Suntory Malts" }]
        }))
        .unwrap();

        assert_eq!(action.kind, ActionType::Select);
        assert_eq!(action.selected_options[0].value, "Suntory Malts");
    }

    #[test]
    fn unknown_styles_fall_back_to_default() {
        let styles: Vec<ActionStyle> = serde_json::from_value(json!(["primary", "warning", "", "fancy"])).unwrap();

        assert_eq!(styles, [ActionStyle::Primary, ActionStyle::Warning, ActionStyle::Default, ActionStyle::Default]);
        assert_eq!(serde_json::to_value(ActionStyle::Default).unwrap(), json!("default"));
    }
}
