use std::sync::Arc;

use config::ProvidersConfig;

use crate::{
    error::ChatError,
    messages::{ChatResponse, CompletionRequest},
    normalize,
    provider::{Provider, ProviderKind, SAMPLING_TEMPERATURE, openai::OpenAICompatibleProvider},
};

/// Routes chat requests to the upstream the client asked for.
///
/// Cloning is cheap; the provider handles are built once and shared read-only
/// by all requests.
#[derive(Clone)]
pub(crate) struct ChatServer {
    shared: Arc<ChatServerInner>,
}

struct ChatServerInner {
    openai: Box<dyn Provider>,
    groq: Box<dyn Provider>,
}

impl ChatServer {
    pub fn new(config: ProvidersConfig) -> anyhow::Result<Self> {
        let ProvidersConfig { openai, groq } = config;

        log::debug!("Initializing chat providers");

        let openai = OpenAICompatibleProvider::new(ProviderKind::OpenAi, openai)?;
        let groq = OpenAICompatibleProvider::new(ProviderKind::Groq, groq)?;

        Ok(Self::with_providers(Box::new(openai), Box::new(groq)))
    }

    pub(crate) fn with_providers(openai: Box<dyn Provider>, groq: Box<dyn Provider>) -> Self {
        Self {
            shared: Arc::new(ChatServerInner { openai, groq }),
        }
    }

    fn provider(&self, kind: ProviderKind) -> &dyn Provider {
        match kind {
            ProviderKind::OpenAi => self.shared.openai.as_ref(),
            ProviderKind::Groq => self.shared.groq.as_ref(),
        }
    }

    /// Validates the body, forwards the conversation and shapes the answer.
    pub async fn chat(&self, body: &[u8]) -> crate::Result<ChatResponse> {
        let request = normalize::parse(body)?;

        log::info!(
            "Chat request for model '{}' via provider '{}'",
            request.model_name,
            request.model_provider
        );
        log::debug!("Request has {} messages", request.messages.len());

        if request.allow_search {
            log::debug!("Web search was requested, ignoring it");
        }

        let Some(kind) = ProviderKind::from_name(&request.model_provider) else {
            log::debug!("Rejecting unsupported provider '{}'", request.model_provider);
            return Err(ChatError::UnsupportedProvider(request.model_provider));
        };

        let messages = normalize::conversation(&request);
        let provider = self.provider(kind);

        let completion = CompletionRequest {
            model: &request.model_name,
            messages: &messages,
            temperature: SAMPLING_TEMPERATURE,
        };

        let reply = provider.chat_completion(completion).await.map_err(|e| {
            log::error!("Completion from {} failed: {e}", provider.name());
            ChatError::ProviderCall(e)
        })?;

        log::debug!("Completion from {} succeeded", provider.name());

        Ok(ChatResponse::new(request, reply))
    }
}
