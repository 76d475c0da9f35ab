use super::*;
use crate::analysis::test_utils::{JPEG_DATA_URI, RecordingSleep, jpeg_payload};
use crate::analysis::{Analyzer, RetryPolicy};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

const PATH: &str = "/models/gemini-test:generateContent";

fn client_for(server: &mockito::ServerGuard) -> Client {
    Client::new(
        Some("test-key".to_string()),
        "gemini-test".to_string(),
        server.url(),
    )
}

fn reply_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_sends_prompt_and_image() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{
                "parts": [
                    { "text": "solve this" },
                    { "inline_data": { "mime_type": "image/jpeg", "data": "/9j/4AAQSkZJRg==" } }
                ]
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply_body("## 정답\nX=5"))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let reply = client
        .generate("solve this", &jpeg_payload())
        .await
        .unwrap();

    assert_eq!(reply, "## 정답\nX=5");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_png_keeps_its_mime_type_on_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::PartialJson(json!({
            "contents": [{
                "parts": [
                    { "text": "p" },
                    { "inline_data": { "mime_type": "image/png", "data": "iVBORw0KGgo=" } }
                ]
            }]
        })))
        .with_status(200)
        .with_body(reply_body("ok"))
        .create_async()
        .await;

    let image = ImagePayload::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
    let reply = client_for(&server).generate("p", &image).await.unwrap();

    assert_eq!(reply, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_unavailable_is_transient() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body(r#"{"error":{"code":503,"message":"The model is overloaded. Please try again later.","status":"UNAVAILABLE"}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .generate("p", &jpeg_payload())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Status { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE));
    assert!(err.is_transient_overload());
}

#[tokio::test]
async fn test_bad_request_is_permanent() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(400)
        .with_body(r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .generate("p", &jpeg_payload())
        .await
        .unwrap_err();

    assert!(!err.is_transient_overload());
    assert!(err.to_string().starts_with("[400 Bad Request]"));
}

#[tokio::test]
async fn test_missing_credential_makes_no_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(reply_body("unused"))
        .expect(0)
        .create_async()
        .await;

    let client = Client::new(None, "gemini-test".to_string(), server.url());
    let err = client.generate("p", &jpeg_payload()).await.unwrap_err();

    assert!(matches!(err, ProviderError::MissingCredential));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_reply_is_a_transport_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server)
        .generate("p", &jpeg_payload())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
    assert!(!err.is_transient_overload());
}

#[test]
fn test_url_ignores_trailing_slash() {
    let client = Client::new(None, "m".to_string(), "http://host/v1beta/".to_string());
    assert_eq!(client.url(), "http://host/v1beta/models/m:generateContent");
    assert_eq!(client.model(), "m");
}

#[tokio::test]
async fn test_analyzer_retries_overloaded_endpoint_three_times() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(3)
        .create_async()
        .await;

    let sleep = RecordingSleep::default();
    let analyzer = Analyzer::new(client_for(&server), &sleep, RetryPolicy::default());
    let image = ImagePayload::from_data_uri(JPEG_DATA_URI).unwrap();
    let solution = analyzer.analyze(&image).await;

    assert!(solution.is_overloaded());
    assert_eq!(
        sleep.delays(),
        vec![Duration::from_millis(2000), Duration::from_millis(4000)]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_analyzer_end_to_end_success() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(reply_body("## 정답\nX=5\n## 신뢰도\n확실한 답변"))
        .create_async()
        .await;

    let sleep = RecordingSleep::default();
    let analyzer = Analyzer::new(client_for(&server), &sleep, RetryPolicy::default());
    let solution = analyzer.analyze(&jpeg_payload()).await;

    assert_eq!(solution.answer.as_deref(), Some("X=5"));
    assert_eq!(solution.confidence.as_deref(), Some("확실한 답변"));
    assert!(sleep.delays().is_empty());
}
