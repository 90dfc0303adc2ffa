//! Chat endpoint and upstream provider configuration.

use std::borrow::Cow;

use secrecy::SecretString;
use serde::Deserialize;

/// Configuration of the chat relay endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    /// Whether the chat endpoint is exposed.
    enabled: bool,
    /// The path the chat endpoint is mounted on.
    pub path: Cow<'static, str>,
    /// How failures are reported to the caller.
    pub error_signaling: ErrorSignaling,
    /// Upstream completion services.
    pub providers: ProvidersConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: Cow::Borrowed("/chat"),
            error_signaling: ErrorSignaling::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Whether the chat endpoint is exposed.
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

/// How error envelopes map to HTTP status codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorSignaling {
    /// Every envelope, error or not, is sent with `200 OK`.
    #[default]
    Flat,
    /// Invalid requests get `400`, upstream failures get `502`.
    Status,
}

/// The two supported upstreams.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    /// OpenAI settings.
    pub openai: ProviderConfig,
    /// Groq settings.
    pub groq: ProviderConfig,
}

impl ProvidersConfig {
    /// Fills in API keys for providers that have none configured.
    pub fn with_fallback_keys(mut self, openai: Option<SecretString>, groq: Option<SecretString>) -> Self {
        if self.openai.api_key.is_none() {
            self.openai.api_key = openai;
        }

        if self.groq.api_key.is_none() {
            self.groq.api_key = groq;
        }

        self
    }
}

/// Settings of a single OpenAI-compatible upstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key sent as a bearer token. A missing key is not an error until a
    /// request is dispatched to this provider.
    pub api_key: Option<SecretString>,
    /// Custom base URL of the chat-completions API, without the trailing
    /// `/chat/completions`. The provider's public endpoint is used when unset.
    pub base_url: Option<String>,
}
