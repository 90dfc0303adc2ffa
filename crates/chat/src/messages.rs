use serde::{Deserialize, Serialize};

/// Chat payload posted by the browser form.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatRequest {
    pub(crate) model_name: String,
    pub(crate) model_provider: String,
    pub(crate) system_prompt: String,
    pub(crate) messages: Vec<String>,
    /// Accepted for compatibility with the form, never acted upon.
    pub(crate) allow_search: bool,
}

/// Speaker of a message in the conversation sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Turns alternate starting with the caller, so the role only depends on
    /// the position in the history.
    pub(crate) fn at(index: usize) -> Self {
        if index % 2 == 0 { Role::User } else { Role::Assistant }
    }
}

/// Chat message in OpenAI format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ChatMessage {
    pub(crate) role: Role,
    pub(crate) content: String,
}

/// Everything a provider needs to produce a completion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletionRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: &'a [ChatMessage],
    pub(crate) temperature: f32,
}

/// Successful answer of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) model: String,
    pub(crate) provider: String,
    pub(crate) message: String,
    pub(crate) prompt: String,
    pub(crate) history: Vec<String>,
}

impl ChatResponse {
    pub(crate) fn new(request: ChatRequest, reply: String) -> Self {
        let ChatRequest {
            model_name,
            model_provider,
            system_prompt,
            mut messages,
            allow_search: _,
        } = request;

        messages.push(reply.clone());

        Self {
            model: model_name,
            provider: model_provider,
            message: reply,
            prompt: system_prompt,
            history: messages,
        }
    }
}

/// Failure answer of the chat endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}
