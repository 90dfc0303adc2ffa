use indoc::indoc;
use integration_tests::{TestServer, llms::OpenAIMock};
use serde_json::json;

fn request(provider: &str, model: &str) -> serde_json::Value {
    json!({
        "model_name": model,
        "model_provider": provider,
        "system_prompt": "Be brief",
        "messages": ["Hi"],
        "allow_search": false
    })
}

#[tokio::test]
async fn unsupported_provider_makes_no_upstream_call() {
    let mut builder = TestServer::builder();
    let openai = builder.spawn_upstream("openai", OpenAIMock::new()).await;
    let groq = builder.spawn_upstream("groq", OpenAIMock::groq()).await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("anthropic", "claude")).await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "error": "Unsupported model provider: anthropic"
    }
    "#);

    assert_eq!(openai.request_count(), 0);
    assert_eq!(groq.request_count(), 0);
}

#[tokio::test]
async fn missing_field_is_a_validation_error() {
    let mut builder = TestServer::builder();
    let openai = builder.spawn_upstream("openai", OpenAIMock::new()).await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat
        .chat(json!({
            "model_name": "gpt-4o-mini",
            "model_provider": "openai",
            "system_prompt": "Be brief",
            "allow_search": false
        }))
        .await;

    let error = response["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid request format: missing field `messages`"), "{error}");

    assert_eq!(openai.request_count(), 0);
}

#[tokio::test]
async fn wrongly_typed_field_is_a_validation_error() {
    let server = TestServer::builder().build("").await;
    let chat = server.chat_client("/chat");

    let mut body = request("openai", "gpt-4o-mini");
    body["messages"] = json!("Hi");

    let response = chat.chat(body).await;

    let error = response["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid request format: invalid type: string"), "{error}");
}

#[tokio::test]
async fn non_json_body_is_a_validation_error() {
    let server = TestServer::builder().build("").await;

    let response = server.client.post_raw("/chat", "model_provider=openai").await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();

    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid request format: "), "{error}");
}

#[tokio::test]
async fn authentication_failure() {
    let mut builder = TestServer::builder();
    builder
        .spawn_upstream("openai", OpenAIMock::new().with_auth_error("Incorrect API key provided"))
        .await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("openai", "gpt-4o-mini")).await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "error": "API call failed: Authentication failed: Incorrect API key provided"
    }
    "#);
}

#[tokio::test]
async fn failed_call_does_not_affect_next_request() {
    let mut builder = TestServer::builder();
    let upstream = builder
        .spawn_upstream("openai", OpenAIMock::new().with_model_not_found("gpt-5-preview"))
        .await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("openai", "gpt-5-preview")).await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "error": "API call failed: Model not found: The model `gpt-5-preview` does not exist or you do not have access to it."
    }
    "#);

    let response = chat.chat(request("openai", "gpt-4o-mini")).await;
    assert_eq!(response["message"], "This is a test response from the mock LLM server");

    assert_eq!(upstream.request_count(), 2);
}

#[tokio::test]
async fn rate_limit() {
    let mut builder = TestServer::builder();
    builder
        .spawn_upstream("groq", OpenAIMock::groq().with_rate_limit("Rate limit reached for model"))
        .await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("groq", "llama-3.1-8b-instant")).await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "error": "API call failed: Rate limit exceeded: Rate limit reached for model"
    }
    "#);
}

#[tokio::test]
async fn upstream_server_error_with_plain_text_body() {
    let mut builder = TestServer::builder();
    builder
        .spawn_upstream("openai", OpenAIMock::new().with_internal_error("upstream exploded"))
        .await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("openai", "gpt-4o-mini")).await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "error": "API call failed: Provider API error (500): upstream exploded"
    }
    "#);
}

#[tokio::test]
async fn completion_without_choices() {
    let mut builder = TestServer::builder();
    builder.spawn_upstream("openai", OpenAIMock::new().with_no_choices()).await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("openai", "gpt-4o-mini")).await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "error": "API call failed: Invalid response: completion contained no choices"
    }
    "#);
}

#[tokio::test]
async fn undecodable_completion() {
    let mut builder = TestServer::builder();
    builder.spawn_upstream("openai", OpenAIMock::new().with_malformed_body()).await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("openai", "gpt-4o-mini")).await;

    let error = response["error"].as_str().unwrap();
    assert!(
        error.starts_with("API call failed: Invalid response: could not decode the completion: "),
        "{error}"
    );
}

#[tokio::test]
async fn unreachable_upstream() {
    // Nothing listens on the discard port locally
    let config = indoc! {r#"
        [chat.providers.openai]
        api_key = "test-key"
        base_url = "http://127.0.0.1:9/v1"
    "#};

    let server = TestServer::builder().build(config).await;
    let chat = server.chat_client("/chat");

    let response = chat.chat(request("openai", "gpt-4o-mini")).await;

    let error = response["error"].as_str().unwrap();
    assert!(
        error.starts_with("API call failed: Connection error: Failed to send request to openai: "),
        "{error}"
    );
}

#[tokio::test]
async fn status_signaling() {
    let config = indoc! {r#"
        [chat]
        error_signaling = "status"
    "#};

    let mut builder = TestServer::builder();
    builder
        .spawn_upstream("openai", OpenAIMock::new().with_auth_error("Incorrect API key provided"))
        .await;

    let server = builder.build(config).await;
    let chat = server.chat_client("/chat");

    let response = chat.chat_raw(request("mistral", "mistral-large")).await;
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    insta::assert_json_snapshot!(body, @r#"
    {
      "error": "Unsupported model provider: mistral"
    }
    "#);

    let response = chat.chat_raw(json!({ "model_name": "gpt-4o-mini" })).await;
    assert_eq!(response.status(), 400);

    let response = chat.chat_raw(request("openai", "gpt-4o-mini")).await;
    assert_eq!(response.status(), 502);

    let body: serde_json::Value = response.json().await.unwrap();
    insta::assert_json_snapshot!(body, @r#"
    {
      "error": "API call failed: Authentication failed: Incorrect API key provided"
    }
    "#);
}
