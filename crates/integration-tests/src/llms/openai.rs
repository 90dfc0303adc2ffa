use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

/// Builder for a mock of an OpenAI-compatible chat-completions API.
///
/// The same mock stands in for Groq by serving under `/openai/v1`.
pub struct OpenAIMock {
    base_path: String,
    custom_responses: HashMap<String, String>,
    error_type: Option<ErrorType>,
}

#[derive(Clone)]
enum ErrorType {
    AuthError(String),
    ModelNotFound(String),
    RateLimit(String),
    InternalError(String),
    MalformedBody,
    NoChoices,
}

impl OpenAIMock {
    pub fn new() -> Self {
        Self {
            base_path: "/v1".to_string(),
            custom_responses: HashMap::new(),
            error_type: None,
        }
    }

    /// A mock laid out like Groq's OpenAI compatibility endpoint.
    pub fn groq() -> Self {
        Self::new().with_base_path("/openai/v1")
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Reply with `response` whenever a message contains `trigger`.
    pub fn with_response(mut self, trigger: impl Into<String>, response: impl Into<String>) -> Self {
        self.custom_responses.insert(trigger.into(), response.into());
        self
    }

    pub fn with_auth_error(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::AuthError(message.into()));
        self
    }

    /// Only requests for `model` fail; other models still get answers.
    pub fn with_model_not_found(mut self, model: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::ModelNotFound(model.into()));
        self
    }

    pub fn with_rate_limit(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::RateLimit(message.into()));
        self
    }

    pub fn with_internal_error(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::InternalError(message.into()));
        self
    }

    pub fn with_malformed_body(mut self) -> Self {
        self.error_type = Some(ErrorType::MalformedBody);
        self
    }

    pub fn with_no_choices(mut self) -> Self {
        self.error_type = Some(ErrorType::NoChoices);
        self
    }

    /// Starts the mock on a random local port.
    pub async fn spawn(self) -> anyhow::Result<MockUpstream> {
        let received = Arc::new(Mutex::new(Vec::new()));

        let state = Arc::new(MockState {
            custom_responses: self.custom_responses,
            error_type: self.error_type,
            received: received.clone(),
        });

        let app = Router::new()
            .route(&format!("{}/chat/completions", self.base_path), post(chat_completions))
            .layer(DefaultBodyLimit::disable())
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(MockUpstream {
            address,
            base_path: self.base_path,
            received,
        })
    }
}

impl Default for OpenAIMock {
    fn default() -> Self {
        Self::new()
    }
}

/// A running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    address: SocketAddr,
    base_path: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockUpstream {
    /// The value to configure as the provider's `base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.address, self.base_path)
    }

    /// Every chat-completion request received so far.
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

/// What the service sent upstream.
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

struct MockState {
    custom_responses: HashMap<String, String>,
    error_type: Option<ErrorType>,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

fn openai_error(status: StatusCode, message: &str, kind: &str) -> Response {
    let body = json!({
        "error": {
            "message": message,
            "type": kind,
        }
    });

    (status, Json(body)).into_response()
}

async fn chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    state.received.lock().unwrap().push(ReceivedRequest {
        authorization,
        body: body.clone(),
    });

    let request: ChatCompletionRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return openai_error(StatusCode::BAD_REQUEST, &e.to_string(), "invalid_request_error"),
    };

    if let Some(error_type) = &state.error_type {
        match error_type {
            ErrorType::AuthError(message) => {
                return openai_error(StatusCode::UNAUTHORIZED, message, "invalid_request_error");
            }
            ErrorType::ModelNotFound(model) if request.model == *model => {
                let message = format!("The model `{model}` does not exist or you do not have access to it.");
                return openai_error(StatusCode::NOT_FOUND, &message, "invalid_request_error");
            }
            ErrorType::ModelNotFound(_) => (),
            ErrorType::RateLimit(message) => {
                return openai_error(StatusCode::TOO_MANY_REQUESTS, message, "rate_limit_exceeded");
            }
            ErrorType::InternalError(message) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, message.clone()).into_response();
            }
            ErrorType::MalformedBody => return (StatusCode::OK, "this is not json").into_response(),
            ErrorType::NoChoices => return completion(&request.model, Vec::new()),
        }
    }

    let reply = request
        .messages
        .iter()
        .find_map(|message| {
            state
                .custom_responses
                .iter()
                .find(|(trigger, _)| message.content.contains(trigger.as_str()))
                .map(|(_, response)| response.clone())
        })
        .unwrap_or_else(|| "This is a test response from the mock LLM server".to_string());

    let choices = vec![json!({
        "index": 0,
        "message": {
            "role": "assistant",
            "content": reply,
        },
        "finish_reason": "stop",
    })];

    completion(&request.model, choices)
}

fn completion(model: &str, choices: Vec<serde_json::Value>) -> Response {
    let body = json!({
        "id": format!("chatcmpl-test-{}", uuid::Uuid::new_v4()),
        "object": "chat.completion",
        "created": 1677651200,
        "model": model,
        "choices": choices,
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 15,
            "total_tokens": 25,
        },
    });

    Json(body).into_response()
}
