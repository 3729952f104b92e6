//! Integration tests for the chat-completion entry point against a mock
//! HTTP server.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use infuzu_rs::{
    Client, ContentPart, Error, Message, MessageContent, ModelParams, ModelSelector, Role,
    API_KEY_ENV,
};
use mockito::Matcher;
use serde_json::json;

/// Serializes tests that touch process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const CHAT_PATH: &str = "/v1/chat/completions";

fn test_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url_override(base_url)
        .build()
        .expect("failed to build test client")
}

#[test]
fn test_fills_defaults_when_server_omits_metadata() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{
                    "index": 0,
                    "finish_reason": "stop",
                    "message": {"role": "assistant", "content": "Paris."}
                }],
                "usage": {"prompt_tokens": 9, "completion_tokens": 3}
            }"#,
        )
        .create();

    let client = test_client(&server.url());
    let before = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let completion = client
        .create_chat_completion(&[Message::user("What is the capital of France?")], None)
        .unwrap();
    mock.assert();

    let id = completion.id.clone().unwrap();
    assert!(id.starts_with("chatcmpl-"), "unexpected id {id:?}");
    assert_eq!(id.len(), "chatcmpl-".len() + 36, "expected a uuid suffix");

    let created = completion.created.unwrap();
    assert!(created >= before && created <= before + 5);

    assert_eq!(completion.model.as_deref(), Some("infuzu-ims"));
    assert_eq!(completion.object.as_deref(), Some("chat.completion"));
    assert_eq!(completion.first_content(), Some("Paris."));
}

#[test]
fn test_preserves_explicit_metadata() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "chatcmpl-from-server",
                "created": 1700000000,
                "model": "openai/gpt-4o",
                "object": "chat.completion",
                "system_fingerprint": "fp_123",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hello"},
                    "model": {"ref": "openai/gpt-4o", "rank": 1},
                    "latency": {"start_latency": 120, "end_latency": 940}
                }]
            }"#,
        )
        .create();

    let client = test_client(&server.url());
    let completion = client
        .create_chat_completion(&[Message::user("hi")], None)
        .unwrap();

    assert_eq!(completion.id.as_deref(), Some("chatcmpl-from-server"));
    assert_eq!(completion.created, Some(1_700_000_000));
    assert_eq!(completion.model.as_deref(), Some("openai/gpt-4o"));
    assert_eq!(completion.object.as_deref(), Some("chat.completion"));
    assert_eq!(
        completion.system_fingerprint.as_deref(),
        Some("fp_123")
    );

    let choice = &completion.choices[0];
    let latency = choice.latency.as_ref().unwrap();
    assert_eq!(latency.start, Some(120));
    assert_eq!(latency.end, Some(940));
    assert_eq!(
        choice.model.as_ref().unwrap().ref_.as_deref(),
        Some("openai/gpt-4o")
    );
}

#[test]
fn test_sends_aliased_payload_and_headers() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_header("content-type", "application/json")
        .match_header("infuzu-api-key", "test-key")
        .match_header(
            "user-agent",
            Matcher::Regex(r"^infuzu-rust/0\.1\.0 \(rust .+; reqwest/.+\)$".to_string()),
        )
        .match_body(Matcher::Json(json!({
            "messages": [
                {"role": "system", "content": "You are terse."},
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "what is in this image?"},
                        {"type": "image_url", "image_url": "https://example.com/cat.png"},
                    ],
                    "name": "alice"
                },
            ],
            "model": {"llms": ["openai/gpt-4o"], "imsn": 2},
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create();

    let messages = vec![
        Message::system("You are terse."),
        Message::with_content(
            Role::User,
            MessageContent::parts(vec![
                ContentPart::text("what is in this image?"),
                ContentPart::image_url("https://example.com/cat.png"),
            ]),
        )
        .with_name("alice"),
    ];
    let model = ModelSelector::from(
        ModelParams::new()
            .llms(vec!["openai/gpt-4o".to_string()])
            .imsn(2),
    );

    let client = test_client(&server.url());
    client
        .create_chat_completion(&messages, Some(&model))
        .unwrap();
    mock.assert();
}

#[test]
fn test_model_omitted_from_payload_when_none() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", CHAT_PATH)
        .match_body(Matcher::Json(json!({
            "messages": [{"role": "user", "content": "hi"}],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create();

    let client = test_client(&server.url());
    client
        .create_chat_completion(&[Message::user("hi")], None)
        .unwrap();
    mock.assert();
}

#[test]
fn test_missing_api_key_is_configuration_error_before_any_request() {
    let _guard = ENV_LOCK.lock().unwrap();
    let saved = std::env::var(API_KEY_ENV).ok();
    std::env::remove_var(API_KEY_ENV);

    let mut server = mockito::Server::new();
    let mock = server.mock("POST", CHAT_PATH).expect(0).create();

    let result = Client::builder().base_url_override(server.url()).build();
    let err = result.err().expect("expected a configuration error");
    assert!(matches!(err, Error::Configuration { .. }), "got {err:?}");
    mock.assert();

    if let Some(value) = saved {
        std::env::set_var(API_KEY_ENV, value);
    }
}

#[test]
fn test_http_error_maps_to_api_error_with_status_and_body() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "bad request"}"#)
        .create();

    let client = test_client(&server.url());
    let err = client
        .create_chat_completion(&[Message::user("hi")], None)
        .unwrap_err();

    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, r#"{"error": "bad request"}"#);
        }
        other => panic!("expected Error::Api, got {other:?}"),
    }
}

#[test]
fn test_unreachable_server_maps_to_transport_error() {
    // Port 1 is reserved and not listening; the connection is refused before
    // any HTTP exchange takes place.
    let client = test_client("http://127.0.0.1:1");
    let err = client
        .create_chat_completion(&[Message::user("hi")], None)
        .unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}

#[test]
fn test_malformed_response_body_is_validation_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", CHAT_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": "not-a-list"}"#)
        .create();

    let client = test_client(&server.url());
    let err = client
        .create_chat_completion(&[Message::user("hi")], None)
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
}
