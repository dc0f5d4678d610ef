use std::{fmt, str::FromStr};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Callback id shared by the menu, the confirmation, and the result messages.
pub const CALLBACK_ORDER: &str = "beer";
/// Callback id of the order form dialog.
pub const CALLBACK_ORDER_FORM: &str = "order_form";
/// Callback id of the approval message posted after a dialog submission.
pub const CALLBACK_ORDER_APPROVAL: &str = "order_approval";

/// Accent color of the ordering flow.
pub const COLOR_ORDER: &str = "#f9a41b";
/// Accent color of the approval message.
pub const COLOR_APPROVAL: &str = "#36a64f";

/// The named actions carried by the buttons and selects of the ordering flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Select,
    Start,
    Dialog,
    Cancel,
    Approve,
    Reject,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Select => "select",
            OrderAction::Start => "start",
            OrderAction::Dialog => "dialog",
            OrderAction::Cancel => "cancel",
            OrderAction::Approve => "approve",
            OrderAction::Reject => "reject",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderAction {
    type Err = InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(OrderAction::Select),
            "start" => Ok(OrderAction::Start),
            "dialog" => Ok(OrderAction::Dialog),
            "cancel" => Ok(OrderAction::Cancel),
            "approve" => Ok(OrderAction::Approve),
            "reject" => Ok(OrderAction::Reject),
            other => Err(InteractionError::UnknownAction(other.to_string())),
        }
    }
}

/// Errors raised while handling an interaction callback.
///
/// Each variant maps onto a single HTTP status in the callback server.
#[derive(Debug)]
pub enum InteractionError {
    /// The form body carried no usable `payload` field.
    MissingPayload,
    /// The `payload` field was not a recognized callback.
    MalformedPayload(String),
    /// The verification token did not match.
    InvalidToken,
    /// An interactive message arrived without any actions.
    NoActions,
    /// A select action arrived without a selected option.
    NoSelection,
    /// The action name is not part of the ordering flow.
    UnknownAction(String),
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionError::MissingPayload => write!(f, "missing `payload` form field"),
            InteractionError::MalformedPayload(e) => write!(f, "malformed callback payload: {e}"),
            InteractionError::InvalidToken => write!(f, "invalid verification token"),
            InteractionError::NoActions => write!(f, "interactive message carried no actions"),
            InteractionError::NoSelection => write!(f, "select action carried no selected option"),
            InteractionError::UnknownAction(name) => write!(f, "invalid action was submitted: {name}"),
        }
    }
}

impl std::error::Error for InteractionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_parse_back() {
        for action in [
            OrderAction::Select,
            OrderAction::Start,
            OrderAction::Dialog,
            OrderAction::Cancel,
            OrderAction::Approve,
            OrderAction::Reject,
        ] {
            assert_eq!(action.as_str().parse::<OrderAction>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = "refund".parse::<OrderAction>().unwrap_err();
        assert!(matches!(err, InteractionError::UnknownAction(ref name) if name == "refund"));
        assert_eq!(err.to_string(), "invalid action was submitted: refund");
    }
}
