use serde::Serialize;

use crate::messages::{ChatMessage, CompletionRequest};

/// Request body for the OpenAI Chat Completions API.
///
/// Groq accepts the same body on its OpenAI-compatible endpoint.
#[derive(Debug, Serialize)]
pub(super) struct OpenAIRequest<'a> {
    /// ID of the model to use.
    pub(super) model: &'a str,

    /// The conversation so far, system prompt first.
    pub(super) messages: &'a [ChatMessage],

    /// What sampling temperature to use, between 0 and 2.
    pub(super) temperature: f32,
}

impl<'a> From<CompletionRequest<'a>> for OpenAIRequest<'a> {
    fn from(request: CompletionRequest<'a>) -> Self {
        let CompletionRequest {
            model,
            messages,
            temperature,
        } = request;

        Self {
            model,
            messages,
            temperature,
        }
    }
}
