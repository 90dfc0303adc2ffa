pub mod llms;

use std::fmt::Write;
use std::net::SocketAddr;
use std::time::Duration;

use config::Config;
use llms::{MockUpstream, OpenAIMock};
use server::ServeConfig;
use tokio::net::TcpListener;

/// Test client for making HTTP requests to the test server
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    /// Create a new test client for the given base URL
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Send a POST request to the given path with JSON body
    pub async fn post<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
    }

    /// Send a POST request with a raw body and no content type
    pub async fn post_raw(&self, path: &str, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .body(body)
            .send()
            .await
            .unwrap()
    }

    /// Send a GET request to the given path
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    /// Start building an arbitrary request
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }
}

/// Client for the chat endpoint
pub struct ChatClient<'a> {
    client: &'a TestClient,
    path: String,
}

impl ChatClient<'_> {
    /// Send a chat request and return the parsed body, expecting a 200 response
    pub async fn chat(&self, request: serde_json::Value) -> serde_json::Value {
        let response = self.chat_raw(request).await;
        assert_eq!(response.status(), 200);

        response.json().await.unwrap()
    }

    /// Send a chat request and return the raw response
    pub async fn chat_raw(&self, request: serde_json::Value) -> reqwest::Response {
        self.client.post(&self.path, &request).await.unwrap()
    }
}

/// Collects mock upstreams before the server starts, so their addresses land in the configuration
#[derive(Default)]
pub struct TestServerBuilder {
    provider_config: String,
}

impl TestServerBuilder {
    /// Spawn a mock upstream and point `provider` at it with a test API key
    pub async fn spawn_upstream(&mut self, provider: &str, mock: OpenAIMock) -> MockUpstream {
        self.spawn(provider, mock, Some("test-key")).await
    }

    /// Spawn a mock upstream and point `provider` at it without any API key
    pub async fn spawn_upstream_without_key(&mut self, provider: &str, mock: OpenAIMock) -> MockUpstream {
        self.spawn(provider, mock, None).await
    }

    async fn spawn(&mut self, provider: &str, mock: OpenAIMock, api_key: Option<&str>) -> MockUpstream {
        let upstream = mock.spawn().await.unwrap();

        writeln!(self.provider_config, "\n[chat.providers.{provider}]").unwrap();
        writeln!(self.provider_config, "base_url = \"{}\"", upstream.base_url()).unwrap();

        if let Some(api_key) = api_key {
            writeln!(self.provider_config, "api_key = \"{api_key}\"").unwrap();
        }

        upstream
    }

    /// Start the server with the given TOML configuration plus the spawned upstreams
    pub async fn build(self, config_toml: &str) -> TestServer {
        let config = format!("{config_toml}\n{}", self.provider_config);
        TestServer::start(&config).await
    }
}

/// Test server that manages the lifecycle of a server instance
pub struct TestServer {
    pub client: TestClient,
    pub address: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder::default()
    }

    /// Start a new test server with the given TOML configuration
    pub async fn start(config_toml: &str) -> Self {
        let config = Config::parse(config_toml).unwrap();

        // Find an available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let serve_config = ServeConfig {
            listen_address: address,
            config,
        };

        let (tx, mut rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            // Drop the listener so the server can bind to the address
            drop(listener);

            let result = server::serve(serve_config).await;
            let _ = tx.send(result);
        });

        let base_url = format!("http://{address}");
        let probe = reqwest::Client::new();

        for _ in 0..20 {
            if let Ok(Err(e)) = rx.try_recv() {
                eprintln!("Server failed to start: {e}");
                std::process::exit(1);
            }

            if probe.get(format!("{base_url}/")).send().await.is_ok() {
                break;
            }

            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestServer {
            client: TestClient::new(base_url),
            address,
            _handle: handle,
        }
    }

    /// A client for the chat endpoint mounted at `path`
    pub fn chat_client(&self, path: &str) -> ChatClient<'_> {
        ChatClient {
            client: &self.client,
            path: path.to_string(),
        }
    }
}
