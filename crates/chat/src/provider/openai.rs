mod input;
mod output;

use async_trait::async_trait;
use config::ProviderConfig;
use reqwest::{Client, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use self::{input::OpenAIRequest, output::OpenAIResponse};

use crate::{
    error::ProviderError,
    messages::CompletionRequest,
    provider::{Provider, ProviderKind},
};

/// Client of an OpenAI-compatible chat-completions API.
///
/// OpenAI and Groq only differ in base URL and key, so both are served by this type.
pub(crate) struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    name: &'static str,
    api_key: Option<SecretString>,
}

impl OpenAICompatibleProvider {
    pub fn new(kind: ProviderKind, config: ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client for {} provider: {e}", kind.as_str()))?;

        let ProviderConfig { api_key, base_url } = config;

        // Use custom base URL if provided, otherwise use the public endpoint
        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| kind.default_base_url().to_string());

        if api_key.is_none() {
            log::warn!(
                "No API key configured for the {} provider, requests to it will fail to authenticate",
                kind.as_str()
            );
        }

        Ok(Self {
            client,
            base_url,
            name: kind.as_str(),
            api_key,
        })
    }
}

#[async_trait]
impl Provider for OpenAICompatibleProvider {
    async fn chat_completion(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = OpenAIRequest::from(request);

        let mut request_builder = self.client.post(&url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.header(AUTHORIZATION, format!("Bearer {}", key.expose_secret()));
        }

        let response = request_builder
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to send request to {}: {e}", self.name)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("{} API error ({status}): {error_text}", self.name);

            return Err(ProviderError::from_status(status.as_u16(), upstream_message(error_text)));
        }

        // First get the response as text to log if parsing fails
        let response_text = response.text().await.map_err(|e| {
            log::error!("Failed to read {} response body: {e}", self.name);
            ProviderError::ConnectionError(format!("Failed to read response from {}: {e}", self.name))
        })?;

        let completion: OpenAIResponse = sonic_rs::from_str(&response_text).map_err(|e| {
            log::error!("Failed to parse {} chat completion response: {e}", self.name);
            log::debug!("Raw response that failed to parse: {response_text}");
            ProviderError::InvalidResponse(format!("could not decode the completion: {e}"))
        })?;

        completion.into_reply()
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// OpenAI-style error bodies carry the useful text in `error.message`.
fn upstream_message(error_text: String) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    match sonic_rs::from_str::<ErrorBody>(&error_text) {
        Ok(body) => body.error.message,
        Err(_) => error_text,
    }
}
