//! HTTP-level behaviour of the chat-completions client against a mock server.

use plumb_config::OpenAiConfig;
use plumb_core::case::Case;
use plumb_core::evidence::Evidence;
use plumb_core::rules::RuleBook;
use plumb_diagnosis::{DiagnosisClient, DiagnosisError, OpenAiClient};
use plumb_prompt::composer;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, api_key: &str) -> OpenAiConfig {
    OpenAiConfig {
        api_key: api_key.into(),
        base_url: format!("{}/v1", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("## The Forensic Profile")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(config(&server, "sk-test")).unwrap();
    let doc = composer::diagnosis(&Case::default(), &RuleBook::new());
    let report = client.complete(&doc).await.unwrap();
    assert_eq!(report, "## The Forensic Profile");
}

#[tokio::test]
async fn missing_credential_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(config(&server, "")).unwrap();
    let doc = composer::diagnosis(&Case::default(), &RuleBook::new());
    let err = client.complete(&doc).await.unwrap_err();

    assert!(matches!(err, DiagnosisError::MissingCredential));
    assert!(err.user_message().starts_with("Error: Please provide an OpenAI API key"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn image_and_json_format_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(r#"{"questions": ["q"]}"#)),
        )
        .mount(&server)
        .await;

    let case = Case {
        media: Some(Evidence::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg")),
        ..Default::default()
    };
    let client = OpenAiClient::new(config(&server, "sk-test")).unwrap();
    client
        .complete(&composer::questions(&case, &RuleBook::new()))
        .await
        .unwrap();

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["response_format"], json!({"type": "json_object"}));
    assert_eq!(body["messages"][1]["content"][1]["type"], "image_url");
    assert_eq!(
        body["messages"][1]["content"][1]["image_url"]["url"],
        "data:image/jpeg;base64,/9j/"
    );
}

#[tokio::test]
async fn server_error_becomes_displayable_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"error": {"message": "The server is overloaded"}})),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new(config(&server, "sk-test")).unwrap();
    let doc = composer::diagnosis(&Case::default(), &RuleBook::new());
    let err = client.complete(&doc).await.unwrap_err();

    assert!(matches!(err, DiagnosisError::Api { status: 503, .. }));
    assert_eq!(
        err.user_message(),
        "API Error: API error (503): The server is overloaded"
    );
}

#[tokio::test]
async fn empty_choices_are_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(config(&server, "sk-test")).unwrap();
    let doc = composer::diagnosis(&Case::default(), &RuleBook::new());
    let err = client.complete(&doc).await.unwrap_err();
    assert!(matches!(err, DiagnosisError::EmptyResponse));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let config = OpenAiConfig {
        api_key: "sk-test".into(),
        base_url: "http://127.0.0.1:9/v1".into(),
        timeout_secs: 2,
        ..Default::default()
    };
    let client = OpenAiClient::new(config).unwrap();
    let doc = composer::diagnosis(&Case::default(), &RuleBook::new());
    let err = client.complete(&doc).await.unwrap_err();
    assert!(matches!(err, DiagnosisError::Http(_)));
    assert!(err.user_message().starts_with("API Error: HTTP error"));
}
