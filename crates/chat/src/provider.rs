pub(crate) mod openai;

use async_trait::async_trait;

use crate::{error::ProviderError, messages::CompletionRequest};

/// Sampling temperature used for every completion.
pub(crate) const SAMPLING_TEMPERATURE: f32 = 0.7;

/// The upstreams a chat request can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProviderKind {
    OpenAi,
    Groq,
}

impl ProviderKind {
    /// Matches a provider name as sent by the client, ignoring case.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("openai") {
            Some(Self::OpenAi)
        } else if name.eq_ignore_ascii_case("groq") {
            Some(Self::Groq)
        } else {
            None
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
        }
    }

    /// Public endpoint used when no base URL is configured.
    pub(crate) fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }
}

/// A chat-completion service.
///
/// Implementations are shared by every in-flight request and must not keep
/// per-request state.
#[async_trait]
pub(crate) trait Provider: Send + Sync {
    /// Sends the conversation upstream and returns the text of the first choice.
    async fn chat_completion(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
