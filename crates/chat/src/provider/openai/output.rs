use serde::Deserialize;

use crate::error::ProviderError;

/// Response body of the OpenAI Chat Completions API.
///
/// Only the parts needed to pull out the reply are modeled; everything else
/// (`id`, `usage`, ...) is ignored.
#[derive(Debug, Deserialize)]
pub(super) struct OpenAIResponse {
    #[serde(default)]
    pub(super) choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIChoice {
    pub(super) message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIMessage {
    #[serde(default)]
    pub(super) content: Option<String>,
}

impl OpenAIResponse {
    /// Content of the first choice.
    pub(super) fn into_reply(self) -> Result<String, ProviderError> {
        let Some(choice) = self.choices.into_iter().next() else {
            return Err(ProviderError::InvalidResponse("completion contained no choices".to_string()));
        };

        choice
            .message
            .content
            .ok_or_else(|| ProviderError::InvalidResponse("first choice has no message content".to_string()))
    }
}
