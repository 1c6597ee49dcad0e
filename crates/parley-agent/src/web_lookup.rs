//! Web lookup stage.
//!
//! Only answers questions, or turns the classifier was unsure about
//! (confidence below [`LOOKUP_CONFIDENCE_THRESHOLD`]).  Lookup order:
//!
//!   1. Wikipedia REST page summary in the detected language, keyed by the
//!      cleaned query.
//!   2. DuckDuckGo instant answer for the raw message.
//!
//! A hit is prefixed with a per-language intro and reported at
//! [`LOOKUP_CONFIDENCE`].  Anything else declines.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use parley_intent::{Intent, Language, truncate_chars};

use crate::config::WebLookupConfig;
use crate::error::{AgentError, Result};
use crate::prompts;
use crate::provider::{Answer, ProviderId, ResponseProvider, Turn};

const ID: ProviderId = ProviderId::WebLookup;

// ═══════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════

/// Turns classified below this confidence are looked up regardless of intent.
pub const LOOKUP_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Confidence reported for a successful lookup.
pub const LOOKUP_CONFIDENCE: f64 = 0.9;

/// Longest cleaned query sent to Wikipedia.
pub const MAX_QUERY_CHARS: usize = 50;

const MAX_EXTRACT_CHARS: usize = 500;
const MAX_DESCRIPTION_CHARS: usize = 300;
const MAX_ABSTRACT_CHARS: usize = 500;

/// Question words and fillers dropped from lookup queries.
const STOP_WORDS: &[&str] = &[
    // english
    "what",
    "who",
    "where",
    "when",
    "why",
    "how",
    "which",
    "is",
    "are",
    "was",
    "were",
    "the",
    "a",
    "an",
    "do",
    "does",
    "did",
    "tell",
    "me",
    "about",
    "please",
    // spanish
    "qué",
    "quién",
    "quiénes",
    "dónde",
    "cuándo",
    "cómo",
    "cuál",
    "es",
    "son",
    // french
    "comment",
    "où",
    "qui",
    "quoi",
    "quel",
    "quelle",
    "est",
    // german
    "wie",
    "wer",
    "wo",
    "wann",
    "warum",
    "ist",
    // portuguese
    "quem",
    "onde",
    "quando",
    // italian
    "chi",
    "dove",
    "perché",
];

// ═══════════════════════════════════════════════════════════════════════
//  Stage
// ═══════════════════════════════════════════════════════════════════════

/// Wikipedia / DuckDuckGo knowledge lookup.
pub struct WebLookup {
    client: reqwest::Client,
    wikipedia_url: String,
    duckduckgo_url: url::Url,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct WikiSummary {
    extract: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText")]
    abstract_text: Option<String>,
}

impl WebLookup {
    pub fn new(config: &WebLookupConfig) -> Result<Self> {
        // Validate the Wikipedia template once so lookups cannot fail on it.
        url::Url::parse(&config.wikipedia_url.replace("{lang}", "en"))?;
        let duckduckgo_url = url::Url::parse(&config.duckduckgo_url)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AgentError::request(ID, e))?;

        Ok(Self {
            client,
            wikipedia_url: config.wikipedia_url.clone(),
            duckduckgo_url,
            timeout: config.timeout(),
        })
    }

    /// Summary URL for `title` on the `language` wiki.
    pub fn wikipedia_summary_url(&self, language: Language, title: &str) -> Result<url::Url> {
        let base = self.wikipedia_url.replace("{lang}", language.wiki_code());
        let mut url = url::Url::parse(&base)?;
        url.path_segments_mut()
            .map_err(|()| AgentError::Config {
                reason: format!("wikipedia url cannot be a base: {base}"),
            })?
            .pop_if_empty()
            .extend(["api", "rest_v1", "page", "summary", title]);
        Ok(url)
    }

    // ───────────────────────────────────────────────────────────────────
    //  Wikipedia
    // ───────────────────────────────────────────────────────────────────

    async fn search_wikipedia(&self, query: &str, language: Language) -> Result<Option<String>> {
        let title = query.replace(' ', "_");
        let url = self.wikipedia_summary_url(language, &title)?;
        debug!(%url, "wikipedia lookup");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AgentError::request(ID, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AgentError::BadStatus {
                provider: ID,
                status: status.as_u16(),
            });
        }

        let summary: WikiSummary = response
            .json()
            .await
            .map_err(|e| AgentError::parse(ID, e))?;

        Ok(summary_text(summary))
    }

    // ───────────────────────────────────────────────────────────────────
    //  DuckDuckGo instant answer
    // ───────────────────────────────────────────────────────────────────

    async fn search_duckduckgo(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.duckduckgo_url.clone())
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| AgentError::request(ID, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::BadStatus {
                provider: ID,
                status: status.as_u16(),
            });
        }

        // Served as javascript, so decode from text rather than `.json()`.
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::request(ID, e))?;
        let answer: InstantAnswer =
            serde_json::from_str(&body).map_err(|e| AgentError::parse(ID, e))?;

        Ok(non_empty(answer.abstract_text, MAX_ABSTRACT_CHARS))
    }
}

#[async_trait]
impl ResponseProvider for WebLookup {
    fn id(&self) -> ProviderId {
        ID
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, turn: &Turn<'_>) -> Result<Option<Answer>> {
        if !should_lookup(turn) {
            debug!(intent = %turn.intent(), "web lookup skipped");
            return Ok(None);
        }

        let query = clean_query(turn.utterance);
        if !query.is_empty() {
            match self.search_wikipedia(&query, turn.language).await {
                Ok(Some(text)) => return Ok(Some(format_hit(&text, turn.language))),
                Ok(None) => debug!(query = %query, "wikipedia had no summary"),
                Err(e) => warn!(error = %e, "wikipedia lookup failed, trying duckduckgo"),
            }
        }

        let hit = self.search_duckduckgo(turn.utterance.trim()).await?;
        Ok(hit.map(|text| format_hit(&text, turn.language)))
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Helpers
// ═══════════════════════════════════════════════════════════════════════

/// Whether a turn qualifies for a lookup.
pub fn should_lookup(turn: &Turn<'_>) -> bool {
    turn.intent() == Intent::Question || turn.confidence() < LOOKUP_CONFIDENCE_THRESHOLD
}

/// Reduce a message to a short topic string.
///
/// Lower-cases, deletes punctuation, drops question words and fillers as
/// whole words, collapses whitespace and truncates to [`MAX_QUERY_CHARS`].
pub fn clean_query(message: &str) -> String {
    let stripped: String = message
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    let joined = stripped
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&joined, MAX_QUERY_CHARS).trim_end().to_owned()
}

fn summary_text(summary: WikiSummary) -> Option<String> {
    non_empty(summary.extract, MAX_EXTRACT_CHARS)
        .or_else(|| non_empty(summary.description, MAX_DESCRIPTION_CHARS))
}

fn non_empty(text: Option<String>, max_chars: usize) -> Option<String> {
    let text = text?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_chars(trimmed, max_chars).to_owned())
}

fn format_hit(text: &str, language: Language) -> Answer {
    Answer::new(format!("{}: {text}", prompts::web_intro(language)))
        .with_confidence(LOOKUP_CONFIDENCE)
}
