//! Gemini 클라이언트를 모의 서버에 붙여 실제 HTTP 요청/응답 경로를 확인한다.
use std::time::Duration;

use bolletta_chiara::advice::{AdviceError, AdviceProvider, GeminiClient};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const MODEL: &str = "m1";
const API_KEY: &str = "SECRET";

/// 모의 서버가 기대하는 요청 형태로만 응답하도록 등록한다.
async fn mount(server: &MockServer, reply: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:generateContent")))
        .and(query_param("key", API_KEY))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "ciao" }] }]
        })))
        .respond_with(reply)
        .expect(1)
        .mount(server)
        .await;
}

/// blocking 클라이언트는 런타임 스레드 밖에서 만들고 버려야 한다.
async fn generate(base_url: String) -> Result<Option<String>, AdviceError> {
    tokio::task::spawn_blocking(move || {
        let client = GeminiClient::new(&base_url, MODEL, API_KEY, Duration::from_secs(5));
        client.generate("ciao")
    })
    .await
    .expect("blocking task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn candidate_text_is_returned() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "ok" }] },
                "finishReason": "STOP"
            }]
        })),
    )
    .await;

    let text = generate(server.uri()).await.unwrap();
    assert_eq!(text.as_deref(), Some("ok"));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_body_yields_no_text() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    assert!(matches!(generate(server.uri()).await, Ok(None)));
}

#[tokio::test(flavor = "multi_thread")]
async fn error_status_maps_to_upstream() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(429).set_body_string("quota exceeded"),
    )
    .await;

    match generate(server.uri()).await {
        Err(AdviceError::Upstream { status, message }) => {
            assert_eq!(status, reqwest::StatusCode::TOO_MANY_REQUESTS);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_maps_to_upstream() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "overloaded" }
        })),
    )
    .await;

    let err = generate(server.uri()).await.unwrap_err();
    assert!(
        matches!(&err, AdviceError::Upstream { status, message }
            if status.as_u16() == 503 && message.contains("overloaded")),
        "unexpected error: {err}"
    );
}
