//! HTTP server receiving Slack's interaction callbacks and events.
//!
//! Slack posts button clicks, select choices, and dialog submissions as a
//! form with a single `payload` field holding JSON. The reply written here
//! replaces the original message, or is empty to leave it untouched.
//!
//! Channel messages arrive as Events API deliveries on a separate path and
//! are acknowledged before the mention handler runs.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Form, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        payload::{EventPayload, InteractionPayload, MessageEvent},
        types::{InteractionError, Void},
    },
    interaction::{
        action::{self, InteractionReply},
        mention,
    },
    service::chat::ChatClient,
};

/// State shared by the callback handlers.
#[derive(Clone)]
pub struct CallbackState {
    pub config: Config,
    pub chat: ChatClient,
}

#[derive(Debug, Deserialize)]
pub struct CallbackForm {
    payload: Option<String>,
}

/// Builds the callback router.
pub fn router(state: CallbackState) -> Router {
    let interaction_path = state.config.interaction_path.clone();
    let events_path = state.config.events_path.clone();

    Router::new()
        .route(&interaction_path, post(handle_callback))
        .route(&events_path, post(handle_event))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves the callback router until Ctrl-C.
pub async fn serve(state: CallbackState) -> Void {
    let addr = format!("{}:{}", state.config.bind_address, state.config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(
        "Server listening on {} (interactions at {}, events at {}) ...",
        addr, state.config.interaction_path, state.config.events_path
    );

    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }

    info!("Shutting down callback server ...");
}

async fn health() -> &'static str {
    "ok"
}

/// Decodes, dispatches, and answers one interaction callback.
#[instrument(skip_all)]
async fn handle_callback(State(state): State<CallbackState>, form: Result<Form<CallbackForm>, FormRejection>) -> Response {
    let result = match decode(form) {
        Ok(payload) => action::handle_interaction(payload, &state.config, &state.chat).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(reply) => reply.into_response(),
        Err(err) => {
            warn!("Rejecting callback: {}", err);
            (status_of(&err), err.to_string()).into_response()
        }
    }
}

/// Answers one Events API delivery; message events are handed to the mention handler.
#[instrument(skip_all)]
async fn handle_event(State(state): State<CallbackState>, headers: HeaderMap, body: Bytes) -> Response {
    let payload = match EventPayload::from_body(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Rejecting event: {}", err);
            return (status_of(&err), err.to_string()).into_response();
        }
    };

    if payload.token().is_some_and(|token| token != state.config.verification_token) {
        let err = InteractionError::InvalidToken;
        warn!("Rejecting event: {}", err);
        return (status_of(&err), err.to_string()).into_response();
    }

    match payload {
        EventPayload::UrlVerification { challenge, .. } => Json(json!({ "challenge": challenge })).into_response(),
        EventPayload::EventCallback { .. } if headers.contains_key("x-slack-retry-num") => {
            // The first delivery was already handled.
            debug!("Skipping redelivered event.");
            StatusCode::OK.into_response()
        }
        EventPayload::EventCallback { event, .. } => {
            match MessageEvent::from_event(&event).and_then(MessageEvent::into_incoming) {
                Some(message) => mention::handle_message(message, state.config.clone(), state.chat.clone()),
                None => debug!("Ignoring event: {}", event["type"]),
            }

            StatusCode::OK.into_response()
        }
        EventPayload::Other => StatusCode::OK.into_response(),
    }
}

fn decode(form: Result<Form<CallbackForm>, FormRejection>) -> Result<InteractionPayload, InteractionError> {
    let Form(form) = form.map_err(|e| InteractionError::MalformedPayload(e.body_text()))?;
    let payload = form.payload.ok_or(InteractionError::MissingPayload)?;

    InteractionPayload::from_form_value(&payload)
}

/// The HTTP status a callback error is answered with.
pub fn status_of(err: &InteractionError) -> StatusCode {
    match err {
        InteractionError::InvalidToken => StatusCode::UNAUTHORIZED,
        InteractionError::MissingPayload
        | InteractionError::MalformedPayload(_)
        | InteractionError::NoActions
        | InteractionError::NoSelection
        | InteractionError::UnknownAction(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for InteractionReply {
    fn into_response(self) -> Response {
        match self {
            InteractionReply::Message(params) => (StatusCode::OK, Json(params)).into_response(),
            InteractionReply::Empty => StatusCode::OK.into_response(),
            InteractionReply::DialogErrors(errors) => (StatusCode::OK, Json(errors)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_statuses() {
        assert_eq!(status_of(&InteractionError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(&InteractionError::MissingPayload), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(&InteractionError::UnknownAction("x".to_string())), StatusCode::BAD_REQUEST);
    }
}
