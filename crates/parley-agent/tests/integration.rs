//! Integration tests for the parley-agent crate.
//!
//! Every HTTP provider is pointed at a local `mockito` server, so these
//! tests exercise the real request/response handling without the network.

use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use parley_agent::{
    DaemonConfig, FallbackChain, HostedConfig, HostedInference, LocalDaemon, LocalModel,
    LocalModelConfig, MarkovModel, ProviderId, ProviderSettings, Turn, Variant, WebLookup,
    WebLookupConfig, build_chain,
};
use parley_intent::{FixedPicker, IntentClassifier, LanguageDetector, TemplateStore};

fn templates() -> Box<TemplateStore> {
    Box::new(TemplateStore::new(Arc::new(FixedPicker(0))))
}

/// Detect and classify `text` the way the dispatcher does.
fn turn(text: &str) -> Turn<'_> {
    let language = LanguageDetector::new().unwrap().detect(text);
    let classification = IntentClassifier::new().unwrap().classify(text);
    Turn::new(text, language, classification)
}

fn daemon_config(server: &mockito::Server) -> DaemonConfig {
    DaemonConfig {
        base_url: server.url(),
        ..DaemonConfig::default()
    }
}

fn lookup_config(server: &mockito::Server) -> WebLookupConfig {
    WebLookupConfig {
        wikipedia_url: format!("{}/{{lang}}", server.url()),
        duckduckgo_url: format!("{}/ddg/", server.url()),
        ..WebLookupConfig::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Rules variant
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn hosted_inference_answers_and_prompt_is_stripped() {
    let mut server = mockito::Server::new_async().await;
    let hosted = server
        .mock("POST", "/models/dialog")
        .match_header("authorization", "Bearer hf_test")
        .match_body(Matcher::Json(json!({ "inputs": "Respond in English. hello there" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"generated_text":"Respond in English. hello there General greetings to you, friend."}]"#)
        .create_async()
        .await;

    let stage = HostedInference::new(&HostedConfig {
        endpoint: format!("{}/models/dialog", server.url()),
        api_key: Some("hf_test".into()),
        ..HostedConfig::default()
    })
    .unwrap();
    let chain = FallbackChain::new(templates()).with_stage(Box::new(stage));

    let reply = chain.respond(&turn("hello there")).await;
    hosted.assert_async().await;
    assert_eq!(reply.provider, ProviderId::HostedInference);
    assert_eq!(reply.text, "General greetings to you, friend.");
    assert_eq!(reply.confidence, None);
}

#[tokio::test]
async fn hosted_failure_falls_through_to_daemon() {
    let mut server = mockito::Server::new_async().await;
    let hosted = server
        .mock("POST", "/models/dialog")
        .with_status(503)
        .create_async()
        .await;
    let daemon = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama2",
            "stream": false,
            "options": { "num_predict": 150 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"  Paris is the capital of France.  ","done":true}"#)
        .create_async()
        .await;

    let hosted_stage = HostedInference::new(&HostedConfig {
        endpoint: format!("{}/models/dialog", server.url()),
        api_key: Some("hf_test".into()),
        ..HostedConfig::default()
    })
    .unwrap();
    let daemon_stage = LocalDaemon::new(&daemon_config(&server)).unwrap();
    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(hosted_stage))
        .with_stage(Box::new(daemon_stage));

    let reply = chain.respond(&turn("What is the capital of France?")).await;
    hosted.assert_async().await;
    daemon.assert_async().await;
    assert_eq!(reply.provider, ProviderId::LocalDaemon);
    assert_eq!(reply.text, "Paris is the capital of France.");
}

#[tokio::test]
async fn daemon_prompt_uses_detected_language() {
    let mut server = mockito::Server::new_async().await;
    let daemon = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Regex("Eres un asistente IA".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"¡Hola! Estoy muy bien, gracias por preguntar."}"#)
        .create_async()
        .await;

    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(LocalDaemon::new(&daemon_config(&server)).unwrap()));

    let reply = chain.respond(&turn("Hola, ¿cómo estás?")).await;
    daemon.assert_async().await;
    assert_eq!(reply.provider, ProviderId::LocalDaemon);
}

#[tokio::test]
async fn short_daemon_answer_ends_at_templates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"Paris."}"#)
        .create_async()
        .await;

    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(LocalDaemon::new(&daemon_config(&server)).unwrap()));

    let reply = chain.respond(&turn("What is the capital of France?")).await;
    assert_eq!(reply.provider, ProviderId::Rules);
    assert!(reply.text.contains("'What is the capital of France?...'"));
}

#[tokio::test]
async fn rules_chain_without_remote_providers_uses_question_template() {
    let mut settings = ProviderSettings::default();
    settings.daemon.enabled = false;

    let chain = build_chain(Variant::Rules, &settings, Arc::new(FixedPicker(0))).unwrap();
    let reply = chain.respond(&turn("What is the capital of France?")).await;

    assert_eq!(reply.provider, ProviderId::Rules);
    assert!(reply.text.starts_with(
        "That's a great question! Based on your query about 'What is the capital of France?...'"
    ));
}

#[tokio::test]
async fn unreachable_daemon_is_skipped() {
    let mut settings = ProviderSettings::default();
    // Nothing listens on the discard port.
    settings.daemon.base_url = "http://127.0.0.1:9".into();

    let chain = build_chain(Variant::Rules, &settings, Arc::new(FixedPicker(0))).unwrap();
    let reply = chain.respond(&turn("hello")).await;
    assert_eq!(reply.provider, ProviderId::Rules);
    assert_eq!(reply.text, "Hello! How can I assist you today?");
}

#[tokio::test]
async fn local_model_generates_from_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.txt");
    std::fs::write(
        &path,
        "Rust programs are fast and reliable. Reliable software takes careful design.",
    )
    .unwrap();

    let config = LocalModelConfig {
        corpus_path: Some(path.clone()),
        ..LocalModelConfig::default()
    };
    let model = Arc::new(MarkovModel::load(&path).unwrap());
    let chain =
        FallbackChain::new(templates()).with_stage(Box::new(LocalModel::new(model, &config)));

    // Every successor of "rust" is unique up to the first full stop.
    let reply = chain.respond(&turn("tell me about rust")).await;
    assert_eq!(reply.provider, ProviderId::LocalModel);
    assert_eq!(reply.text, "programs are fast and reliable.");
}

// ═══════════════════════════════════════════════════════════════════════
//  Search variant
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn wikipedia_hit_is_prefixed_and_confident() {
    let mut server = mockito::Server::new_async().await;
    let wiki = server
        .mock("GET", "/en/api/rest_v1/page/summary/capital_of_france")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"title":"Paris","extract":"Paris is the capital and largest city of France."}"#)
        .create_async()
        .await;

    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(WebLookup::new(&lookup_config(&server)).unwrap()));

    let reply = chain.respond(&turn("What is the capital of France?")).await;
    wiki.assert_async().await;
    assert_eq!(reply.provider, ProviderId::WebLookup);
    assert_eq!(
        reply.text,
        "According to my web search: Paris is the capital and largest city of France."
    );
    assert_eq!(reply.confidence, Some(0.9));
}

#[tokio::test]
async fn wikipedia_miss_falls_back_to_duckduckgo() {
    let mut server = mockito::Server::new_async().await;
    let wiki = server
        .mock("GET", "/en/api/rest_v1/page/summary/ada_lovelace")
        .with_status(404)
        .create_async()
        .await;
    let ddg = server
        .mock("GET", "/ddg/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Who was Ada Lovelace?".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("no_html".into(), "1".into()),
            Matcher::UrlEncoded("skip_disambig".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/x-javascript")
        .with_body(r#"{"AbstractText":"Ada Lovelace was an English mathematician.","Heading":"Ada Lovelace"}"#)
        .create_async()
        .await;

    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(WebLookup::new(&lookup_config(&server)).unwrap()));

    let reply = chain.respond(&turn("Who was Ada Lovelace?")).await;
    wiki.assert_async().await;
    ddg.assert_async().await;
    assert_eq!(reply.provider, ProviderId::WebLookup);
    assert_eq!(
        reply.text,
        "According to my web search: Ada Lovelace was an English mathematician."
    );
}

#[tokio::test]
async fn empty_lookups_decline_to_templates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/en/api/rest_v1/page/summary/".into()))
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/ddg/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"AbstractText":""}"#)
        .create_async()
        .await;

    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(WebLookup::new(&lookup_config(&server)).unwrap()));

    let reply = chain.respond(&turn("What is the capital of France?")).await;
    assert_eq!(reply.provider, ProviderId::Rules);
    assert_eq!(reply.confidence, None);
}

#[tokio::test]
async fn greetings_skip_the_lookup() {
    let mut server = mockito::Server::new_async().await;
    let wiki = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(WebLookup::new(&lookup_config(&server)).unwrap()));

    let reply = chain.respond(&turn("hello")).await;
    wiki.assert_async().await;
    assert_eq!(reply.provider, ProviderId::Rules);
}

#[tokio::test]
async fn spanish_question_uses_spanish_wiki_and_intro() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock(
            "GET",
            Matcher::Regex("^/es/api/rest_v1/page/summary/la_fotos".into()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"extract":"La fotosíntesis es la conversión de materia inorgánica."}"#)
        .create_async()
        .await;

    let chain = FallbackChain::new(templates())
        .with_stage(Box::new(WebLookup::new(&lookup_config(&server)).unwrap()));

    let reply = chain.respond(&turn("¿Qué es la fotosíntesis?")).await;
    assert_eq!(reply.provider, ProviderId::WebLookup);
    assert!(reply.text.starts_with("Según mi búsqueda en la web: La fotosíntesis"));
}
