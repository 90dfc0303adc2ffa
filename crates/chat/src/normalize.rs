//! Turns a raw request body into the conversation sent upstream.

use crate::{
    error::ChatError,
    messages::{ChatMessage, ChatRequest, Role},
};

/// Deserializes the body as a [`ChatRequest`], whatever content type the client claimed.
pub(crate) fn parse(body: &[u8]) -> crate::Result<ChatRequest> {
    serde_json::from_slice(body).map_err(|e| ChatError::Validation(e.to_string()))
}

/// Builds the upstream message list: the system prompt first, then the
/// history with roles derived from position.
///
/// Nothing is trimmed, deduplicated or capped, and an empty system prompt is
/// still sent as an empty system message.
pub(crate) fn conversation(request: &ChatRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    messages.push(ChatMessage {
        role: Role::System,
        content: request.system_prompt.clone(),
    });

    messages.extend(request.messages.iter().enumerate().map(|(i, content)| ChatMessage {
        role: Role::at(i),
        content: content.clone(),
    }));

    messages
}
