//! Hosted inference stage (Hugging Face inference API).
//!
//! Sends the message prefixed with a per-language instruction and expects a
//! JSON array whose first element carries `generated_text`.  Conversational
//! models echo the prompt back, so the prompt is cut out of the result.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::HostedConfig;
use crate::error::{AgentError, Result};
use crate::prompts;
use crate::provider::{Answer, ProviderId, ResponseProvider, Turn};

const ID: ProviderId = ProviderId::HostedInference;

/// Client for a hosted text-generation endpoint.
pub struct HostedInference {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: Option<String>,
}

impl HostedInference {
    /// Build the stage.  Fails when the config carries no API key.
    pub fn new(config: &HostedConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AgentError::Config {
                reason: "hosted inference requires an API key".into(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::request(ID, e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl ResponseProvider for HostedInference {
    fn id(&self) -> ProviderId {
        ID
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, turn: &Turn<'_>) -> Result<Option<Answer>> {
        let prompt = format!(
            "{}{}",
            prompts::hosted_instruction(turn.language),
            turn.utterance
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "inputs": prompt }))
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

        let generations: Vec<Generation> = response
            .json()
            .await
            .map_err(|e| AgentError::parse(ID, e))?;

        let Some(generated) = generations.into_iter().next().and_then(|g| g.generated_text)
        else {
            debug!("hosted inference returned no generated_text");
            return Ok(None);
        };

        Ok(Some(Answer::new(strip_prompt(&generated, &prompt))))
    }
}

/// Remove every echo of `prompt` from `generated` and trim.
fn strip_prompt(generated: &str, prompt: &str) -> String {
    generated.replace(prompt, "").trim().to_owned()
}
