use indoc::indoc;
use integration_tests::TestServer;
use reqwest::Method;

async fn preflight(server: &TestServer, origin: &str) -> reqwest::Response {
    server
        .client
        .request(Method::OPTIONS, "/chat")
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap()
}

fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn permissive_by_default() {
    let server = TestServer::builder().build("").await;

    let response = preflight(&server, "https://any.example.com").await;
    assert_eq!(response.status(), 200);

    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&response, "access-control-allow-methods"), Some("*"));
    assert_eq!(header(&response, "access-control-allow-headers"), Some("*"));
}

#[tokio::test]
async fn explicit_origins() {
    let config = indoc! {r#"
        [server.cors]
        allow_origins = ["https://app.example.com"]
        allow_methods = ["POST"]
        allow_headers = ["content-type"]
        max_age = "1h"
    "#};

    let server = TestServer::builder().build(config).await;

    let response = preflight(&server, "https://app.example.com").await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        header(&response, "access-control-allow-origin"),
        Some("https://app.example.com")
    );
    assert_eq!(header(&response, "access-control-max-age"), Some("3600"));

    let response = preflight(&server, "https://evil.example.com").await;
    assert_eq!(header(&response, "access-control-allow-origin"), None);
}

#[tokio::test]
async fn simple_request_carries_allow_origin() {
    let server = TestServer::builder().build("").await;

    let response = server
        .client
        .request(Method::GET, "/health")
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
}
