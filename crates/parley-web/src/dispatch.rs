//! Per-message pipeline shared by the HTTP and WebSocket front ends.
//!
//! detect language -> classify intent -> walk the fallback chain -> build the
//! reply envelope -> append to history.  A panic inside the chain is caught
//! and turned into an apology reply so one bad message never takes a
//! session down.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use parley_agent::{ChainReply, FallbackChain, ProviderId, Turn, Variant};
use parley_intent::{Intent, IntentClassifier, Language, LanguageDetector};
use parley_store::ConversationHistory;

use crate::error::Result;

/// Error text for inbound frames that are not `{"message": string}`.
pub const INVALID_JSON: &str = "Invalid JSON format";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Inbound chat message, for both `POST /chat` and WebSocket frames.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub intent: Intent,
    pub confidence: f64,
    pub language: Language,
    /// Label of the stage that produced `response`.
    pub model_used: String,
}

/// One frame sent back over a duplex session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Typing { typing: bool },
    Reply(ChatReply),
    Error { error: String },
}

impl Outbound {
    pub fn typing() -> Self {
        Self::Typing { typing: true }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error { error: msg.into() }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Runs the full pipeline for one message.
pub struct Dispatcher {
    variant: Variant,
    detector: LanguageDetector,
    classifier: IntentClassifier,
    chain: FallbackChain,
    history: ConversationHistory,
}

impl Dispatcher {
    /// The search variant classifies with the conversational rule set so
    /// topical messages fall below the lookup threshold.
    pub fn new(
        variant: Variant,
        chain: FallbackChain,
        history: ConversationHistory,
    ) -> Result<Self> {
        let classifier = match variant {
            Variant::Search => IntentClassifier::conversational()?,
            Variant::Rules | Variant::Demo => IntentClassifier::new()?,
        };

        Ok(Self {
            variant,
            detector: LanguageDetector::new()?,
            classifier,
            chain,
            history,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Answer one message and record the exchange.
    pub async fn dispatch(&self, message: &str) -> ChatReply {
        let language = self.detector.detect(message);
        let classification = self.classifier.classify(message);
        let turn = Turn::new(message, language, classification);

        debug!(
            %language,
            intent = %classification.intent,
            confidence = classification.confidence,
            "message classified"
        );

        let reply = match AssertUnwindSafe(self.chain.respond(&turn))
            .catch_unwind()
            .await
        {
            Ok(reply) => reply,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                error!(reason = %reason, "panic while generating a reply");
                ChainReply {
                    text: format!(
                        "I'm sorry, I encountered an error while processing your message: {reason}"
                    ),
                    provider: ProviderId::Rules,
                    confidence: None,
                }
            }
        };

        self.history.record(message, reply.text.as_str());

        ChatReply {
            response: reply.text,
            timestamp: Utc::now(),
            intent: classification.intent,
            confidence: reply.confidence.unwrap_or(classification.confidence),
            language,
            model_used: reply.provider.label().to_owned(),
        }
    }

    /// Turn one raw inbound duplex frame into the frames to send back.
    ///
    /// Malformed input yields an error frame.  The search variant ignores
    /// empty messages; the others answer them like any other text.
    pub async fn handle_frame(&self, raw: &str) -> Vec<Outbound> {
        let request: ChatRequest = match serde_json::from_str(raw) {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "rejecting malformed frame");
                return vec![Outbound::error(INVALID_JSON)];
            }
        };

        if self.variant == Variant::Search && request.message.trim().is_empty() {
            return Vec::new();
        }

        let mut frames = Vec::with_capacity(2);
        if self.variant.sends_typing_indicator() {
            frames.push(Outbound::typing());
        }
        frames.push(Outbound::Reply(self.dispatch(&request.message).await));
        frames
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parley_agent::{Answer, ResponseProvider};
    use parley_intent::{FixedPicker, TemplateStore};

    use super::*;

    struct Exploding;

    #[async_trait]
    impl ResponseProvider for Exploding {
        fn id(&self) -> ProviderId {
            ProviderId::LocalModel
        }

        async fn attempt(&self, _turn: &Turn<'_>) -> parley_agent::Result<Option<Answer>> {
            panic!("model weights missing");
        }
    }

    fn dispatcher(variant: Variant, chain: FallbackChain) -> Dispatcher {
        Dispatcher::new(variant, chain, ConversationHistory::default()).unwrap()
    }

    fn rules_chain() -> FallbackChain {
        FallbackChain::new(Box::new(TemplateStore::new(Arc::new(FixedPicker(0)))))
    }

    #[tokio::test]
    async fn spanish_greeting_reply() {
        let d = dispatcher(Variant::Rules, rules_chain());
        let reply = d.dispatch("Hola, ¿cómo estás?").await;
        assert_eq!(reply.language, Language::Spanish);
        assert_eq!(reply.intent, Intent::Greeting);
        assert_eq!(reply.confidence, 0.9);
        assert_eq!(reply.model_used, "Rule Engine");
        assert_eq!(d.history().len(), 1);
    }

    #[tokio::test]
    async fn panic_becomes_apology() {
        let chain = rules_chain().with_stage(Box::new(Exploding));
        let d = dispatcher(Variant::Rules, chain);

        let reply = d.dispatch("hello").await;
        assert!(reply.response.starts_with("I'm sorry"));
        assert!(reply.response.contains("model weights missing"));
        assert_eq!(reply.model_used, "Rule Engine");
        assert_eq!(reply.intent, Intent::Greeting);

        // The dispatcher is still usable afterwards.
        let again = d.dispatch("thanks").await;
        assert!(again.response.contains("model weights missing"));
        assert_eq!(d.history().len(), 2);
    }

    #[tokio::test]
    async fn malformed_frames_get_error_frame() {
        let d = dispatcher(Variant::Rules, rules_chain());
        for raw in ["not json", "{}", r#"{"message": 5}"#, "[]"] {
            let frames = d.handle_frame(raw).await;
            assert_eq!(frames, vec![Outbound::error(INVALID_JSON)], "{raw}");
        }
        assert!(d.history().is_empty());
    }

    #[tokio::test]
    async fn search_variant_ignores_empty_messages() {
        let d = dispatcher(Variant::Search, rules_chain());
        assert!(d.handle_frame(r#"{"message": ""}"#).await.is_empty());
        assert!(d.handle_frame(r#"{"message": "   "}"#).await.is_empty());
        assert!(d.history().is_empty());
    }

    #[tokio::test]
    async fn rules_variant_answers_empty_messages() {
        let d = dispatcher(Variant::Rules, rules_chain());
        let frames = d.handle_frame(r#"{"message": ""}"#).await;
        assert_eq!(frames.len(), 1);
        let Outbound::Reply(reply) = &frames[0] else {
            panic!("expected a reply frame, got {:?}", frames[0]);
        };
        assert_eq!(reply.intent, Intent::Statement);
        assert!(reply.response.starts_with("Could you tell me a bit more"));
        assert_eq!(d.history().len(), 1);
    }

    #[tokio::test]
    async fn search_variant_uses_conversational_rules() {
        let d = dispatcher(Variant::Search, rules_chain());
        let reply = d.dispatch("Tell me about python programming").await;
        assert_eq!(reply.intent, Intent::Statement);
        assert_eq!(reply.confidence, 0.6);

        let d = dispatcher(Variant::Rules, rules_chain());
        let reply = d.dispatch("Tell me about python programming").await;
        assert_eq!(reply.intent, Intent::Technology);
    }

    #[tokio::test]
    async fn search_variant_sends_typing_first() {
        let d = dispatcher(Variant::Search, rules_chain());
        let frames = d.handle_frame(r#"{"message": "hello"}"#).await;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].to_json().unwrap(), r#"{"typing":true}"#);
        assert!(matches!(frames[1], Outbound::Reply(_)));

        let d = dispatcher(Variant::Rules, rules_chain());
        assert_eq!(d.handle_frame(r#"{"message": "hello"}"#).await.len(), 1);
    }

    #[test]
    fn error_frame_shape() {
        assert_eq!(
            Outbound::error(INVALID_JSON).to_json().unwrap(),
            r#"{"error":"Invalid JSON format"}"#
        );
    }

    #[tokio::test]
    async fn reply_envelope_fields() {
        let d = dispatcher(Variant::Rules, rules_chain());
        let reply = d.dispatch("What is the capital of France?").await;
        let v = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["intent"], "question");
        assert_eq!(v["language"], "english");
        assert_eq!(v["confidence"], 0.8);
        assert!(v["timestamp"].as_str().is_some());
        assert!(v["response"].as_str().unwrap().contains("'What is the capital of France?...'"));
    }
}
