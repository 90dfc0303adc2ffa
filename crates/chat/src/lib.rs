//! The chat relay: validates the form payload, forwards the conversation to
//! OpenAI or Groq, and wraps the reply in the response envelope.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    routing::post,
};
use config::{ChatConfig, ErrorSignaling};

mod error;
mod messages;
mod normalize;
mod provider;
mod server;

use error::ChatError;
use server::ChatServer;

pub(crate) type Result<T> = std::result::Result<T, ChatError>;

#[derive(Clone)]
struct ChatState {
    server: ChatServer,
    error_signaling: ErrorSignaling,
}

/// Creates an axum router serving the chat endpoint on the configured path.
pub fn router(config: ChatConfig) -> anyhow::Result<Router> {
    let ChatConfig {
        path,
        error_signaling,
        providers,
        ..
    } = config;

    let server = ChatServer::new(providers).map_err(|e| anyhow::anyhow!("Failed to initialize chat server: {e}"))?;

    let state = ChatState {
        server,
        error_signaling,
    };

    // Conversation history is forwarded whole, whatever its size
    Ok(Router::new()
        .route(&path, post(chat))
        .layer(DefaultBodyLimit::disable())
        .with_state(state))
}

/// Handle chat requests.
///
/// The body is taken as raw bytes so that malformed payloads end up in the
/// error envelope instead of an extractor rejection.
async fn chat(State(state): State<ChatState>, body: Bytes) -> Response {
    match state.server.chat(&body).await {
        Ok(response) => Json(response).into_response(),
        Err(error) => {
            log::debug!("Chat request failed: {error}");
            error.into_envelope(state.error_signaling)
        }
    }
}
