//! Integration tests for the parley-web crate.
//!
//! REST endpoints are driven in-process through `tower::ServiceExt::oneshot`;
//! the WebSocket endpoint is exercised against a real listener on an
//! ephemeral port with a `tokio-tungstenite` client.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::{SinkExt, StreamExt};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;
use tower::ServiceExt;

use parley_agent::{
    FallbackChain, ProviderId, ProviderSettings, Variant, WebLookup, WebLookupConfig, build_chain,
};
use parley_intent::{FixedPicker, Intent, TemplateStore};
use parley_store::ConversationHistory;
use parley_web::server::router;
use parley_web::{AppState, Dispatcher, WebConfig};

fn rules_state() -> Arc<AppState> {
    let mut settings = ProviderSettings::default();
    settings.daemon.enabled = false;
    let chain = build_chain(Variant::Rules, &settings, Arc::new(FixedPicker(0))).unwrap();
    Arc::new(AppState::new(Variant::Rules, chain, WebConfig::default()).unwrap())
}

fn state_for(variant: Variant) -> Arc<AppState> {
    let chain = FallbackChain::new(Box::new(TemplateStore::new(Arc::new(FixedPicker(0)))));
    Arc::new(AppState::new(variant, chain, WebConfig::default()).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ═══════════════════════════════════════════════════════════════════════
//  REST
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn root_reports_variant() {
    let (status, body) = get(router(rules_state()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["variant"], "rules");
    assert!(body["message"].as_str().unwrap().ends_with("is running"));
    assert!(body["features"].as_array().unwrap().len() > 1);
}

#[tokio::test]
async fn chat_answers_from_rule_store() {
    let (status, body) = post_chat(
        router(rules_state()),
        &json!({ "message": "What is the capital of France?" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "question");
    assert_eq!(body["language"], "english");
    assert_eq!(body["confidence"], 0.8);
    assert_eq!(body["model_used"], "Rule Engine");
    assert!(
        body["response"]
            .as_str()
            .unwrap()
            .contains("'What is the capital of France?...'")
    );
    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}

#[tokio::test]
async fn chat_rejects_malformed_bodies() {
    let state = rules_state();

    for raw in ["{not json", r#"{"text": "hi"}"#, r#"{"message": 5}"#] {
        let (status, body) = post_chat(router(Arc::clone(&state)), raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        assert_eq!(body["error"], "Invalid JSON format");
    }

    assert!(state.history().is_empty());
}

#[tokio::test]
async fn chat_answers_empty_message_asking_for_detail() {
    let state = rules_state();

    let (status, body) = post_chat(router(Arc::clone(&state)), r#"{"message": ""}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "statement");
    assert_eq!(body["language"], "english");
    assert_eq!(body["model_used"], "Rule Engine");
    assert!(
        body["response"]
            .as_str()
            .unwrap()
            .starts_with("Could you tell me a bit more")
    );
    assert_eq!(state.history().len(), 1);
}

#[tokio::test]
async fn history_follows_chat_oldest_first() {
    let state = rules_state();
    for msg in ["hello", "thanks a lot", "bye"] {
        let (status, _) = post_chat(
            router(Arc::clone(&state)),
            &json!({ "message": msg }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get(router(state), "/conversation/history").await;
    let history = body["history"].as_array().unwrap();
    let messages: Vec<&str> = history.iter().map(|t| t["message"].as_str().unwrap()).collect();
    assert_eq!(messages, ["hello", "thanks a lot", "bye"]);
    assert!(history[0]["response"].is_string());
    assert!(history[0]["timestamp"].is_string());
}

#[tokio::test]
async fn models_reflect_the_chain() {
    let (_, body) = get(router(rules_state()), "/models").await;
    assert_eq!(body["variant"], "rules");
    assert_eq!(body["hosted_inference_enabled"], false);
    assert_eq!(body["local_daemon_enabled"], false);
    assert_eq!(body["local_model_loaded"], false);
    assert_eq!(body["web_search_enabled"], false);
    assert_eq!(
        body["supported_languages"],
        json!(["english", "spanish", "french", "german", "portuguese", "italian"])
    );
}

#[tokio::test]
async fn intents_lists_capabilities() {
    let (_, body) = get(router(state_for(Variant::Demo)), "/intents").await;
    let caps = body["capabilities"].as_array().unwrap();
    assert_eq!(caps.len(), 10);
    assert_eq!(caps[0], "greeting");
    assert_eq!(caps[9], "statement");
    assert!(body["technology"].is_string());
}

#[tokio::test]
async fn sessions_start_empty() {
    let (_, body) = get(router(rules_state()), "/sessions").await;
    assert_eq!(body["active"], 0);
    assert_eq!(body["sessions"], json!([]));
}

#[tokio::test]
async fn cors_allows_configured_origins_only() {
    let app = router(rules_state());
    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let denied = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn search_variant_looks_up_topical_messages() {
    let mut server = mockito::Server::new_async().await;
    let wiki = server
        .mock(
            "GET",
            mockito::Matcher::Regex(r"^/en/api/rest_v1/page/summary/".into()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"extract":"A summary long enough to be a usable answer."}"#)
        .expect(2)
        .create_async()
        .await;

    let lookup = WebLookup::new(&WebLookupConfig {
        wikipedia_url: format!("{}/{{lang}}", server.url()),
        duckduckgo_url: format!("{}/ddg/", server.url()),
        ..WebLookupConfig::default()
    })
    .unwrap();
    let chain = FallbackChain::new(Box::new(TemplateStore::new(Arc::new(FixedPicker(0)))))
        .with_stage(Box::new(lookup));
    let dispatcher =
        Dispatcher::new(Variant::Search, chain, ConversationHistory::default()).unwrap();

    let explain = dispatcher.dispatch("Can you explain photosynthesis").await;
    assert_eq!(explain.intent, Intent::Question);
    assert_eq!(explain.model_used, ProviderId::WebLookup.label());
    assert_eq!(explain.confidence, 0.9);

    let topical = dispatcher.dispatch("Tell me about python programming").await;
    assert_eq!(topical.intent, Intent::Statement);
    assert_eq!(topical.model_used, ProviderId::WebLookup.label());
    assert!(topical.response.starts_with("According to my web search: "));

    wiki.assert_async().await;
}

// ═══════════════════════════════════════════════════════════════════════
//  WebSocket
// ═══════════════════════════════════════════════════════════════════════

async fn spawn_server(state: Arc<AppState>) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("frame in time")
        .expect("stream open")
        .expect("valid frame");
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

#[tokio::test]
async fn malformed_frame_keeps_session_usable() {
    let state = rules_state();
    let addr = spawn_server(Arc::clone(&state)).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();

    ws.send(Message::Text("this is not json".into())).await.unwrap();
    assert_eq!(next_json(&mut ws).await, json!({ "error": "Invalid JSON format" }));

    ws.send(Message::Text(r#"{"message": "Hola, ¿cómo estás?"}"#.into()))
        .await
        .unwrap();
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["language"], "spanish");
    assert_eq!(reply["intent"], "greeting");
    assert_eq!(reply["confidence"], 0.9);

    assert_eq!(state.sessions.count(), 1);
    assert_eq!(state.sessions.snapshot()[0].messages, 1);
    assert_eq!(state.history().len(), 1);

    ws.close(None).await.unwrap();
    for _ in 0..50 {
        if state.sessions.count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(state.sessions.count(), 0);
}

#[tokio::test]
async fn search_variant_sends_typing_then_reply() {
    let state = state_for(Variant::Search);
    let addr = spawn_server(Arc::clone(&state)).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();

    // Empty messages are ignored, so the first frame back belongs to "hello".
    ws.send(Message::Text(r#"{"message": ""}"#.into())).await.unwrap();
    ws.send(Message::Text(r#"{"message": "hello"}"#.into())).await.unwrap();

    assert_eq!(next_json(&mut ws).await, json!({ "typing": true }));
    let reply = next_json(&mut ws).await;
    assert_eq!(reply["intent"], "greeting");
    assert_eq!(reply["response"], "Hello! How can I assist you today?");
    assert_eq!(state.history().len(), 1);
}
