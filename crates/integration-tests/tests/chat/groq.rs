use integration_tests::{TestServer, llms::OpenAIMock};
use serde_json::json;

#[tokio::test]
async fn groq_is_routed_to_groq() {
    let mut builder = TestServer::builder();
    let openai = builder.spawn_upstream("openai", OpenAIMock::new()).await;
    let groq = builder
        .spawn_upstream("groq", OpenAIMock::groq().with_response("Hi", "Hello from Groq"))
        .await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    let response = chat
        .chat(json!({
            "model_name": "llama-3.3-70b-versatile",
            "model_provider": "Groq",
            "system_prompt": "Be brief",
            "messages": ["Hi"],
            "allow_search": false
        }))
        .await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "model": "llama-3.3-70b-versatile",
      "provider": "Groq",
      "message": "Hello from Groq",
      "prompt": "Be brief",
      "history": [
        "Hi",
        "Hello from Groq"
      ]
    }
    "#);

    assert_eq!(groq.request_count(), 1);
    assert_eq!(openai.request_count(), 0);
}

#[tokio::test]
async fn provider_name_is_case_insensitive() {
    let mut builder = TestServer::builder();
    let openai = builder.spawn_upstream("openai", OpenAIMock::new()).await;
    let groq = builder.spawn_upstream("groq", OpenAIMock::groq()).await;

    let server = builder.build("").await;
    let chat = server.chat_client("/chat");

    for provider in ["GROQ", "groq", "gRoQ"] {
        let response = chat
            .chat(json!({
                "model_name": "llama-3.1-8b-instant",
                "model_provider": provider,
                "system_prompt": "",
                "messages": ["Hi"],
                "allow_search": false
            }))
            .await;

        assert_eq!(response["provider"], provider);
    }

    for provider in ["OPENAI", "OpenAi"] {
        let response = chat
            .chat(json!({
                "model_name": "gpt-4o-mini",
                "model_provider": provider,
                "system_prompt": "",
                "messages": ["Hi"],
                "allow_search": false
            }))
            .await;

        assert_eq!(response["provider"], provider);
    }

    assert_eq!(groq.request_count(), 3);
    assert_eq!(openai.request_count(), 2);
}

#[tokio::test]
async fn groq_uses_its_own_key() {
    let mut builder = TestServer::builder();
    builder.spawn_upstream_without_key("openai", OpenAIMock::new()).await;
    let groq = builder.spawn_upstream("groq", OpenAIMock::groq()).await;

    let server = builder.build("").await;

    server
        .chat_client("/chat")
        .chat(json!({
            "model_name": "llama-3.1-8b-instant",
            "model_provider": "groq",
            "system_prompt": "",
            "messages": ["Hi"],
            "allow_search": false
        }))
        .await;

    assert_eq!(groq.received()[0].authorization.as_deref(), Some("Bearer test-key"));
}
