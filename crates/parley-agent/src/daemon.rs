//! Local inference daemon stage (Ollama).
//!
//! Non-streaming `POST {base_url}/api/generate`; the reply is the `response`
//! field of the returned object.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::DaemonConfig;
use crate::error::{AgentError, Result};
use crate::prompts;
use crate::provider::{Answer, ProviderId, ResponseProvider, Turn};

const ID: ProviderId = ProviderId::LocalDaemon;

/// Client for a local Ollama daemon.
pub struct LocalDaemon {
    client: reqwest::Client,
    generate_url: url::Url,
    model: String,
    temperature: f32,
    num_predict: u32,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl LocalDaemon {
    pub fn new(config: &DaemonConfig) -> Result<Self> {
        let generate_url = url::Url::parse(&config.base_url)?.join("api/generate")?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::request(ID, e))?;

        Ok(Self {
            client,
            generate_url,
            model: config.model.clone(),
            temperature: config.temperature,
            num_predict: config.num_predict,
            timeout: config.timeout(),
        })
    }

    /// The resolved generate endpoint.
    pub fn generate_url(&self) -> &url::Url {
        &self.generate_url
    }
}

#[async_trait]
impl ResponseProvider for LocalDaemon {
    fn id(&self) -> ProviderId {
        ID
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, turn: &Turn<'_>) -> Result<Option<Answer>> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: prompts::daemon_prompt(turn.language, turn.utterance),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
        };

        let response = self
            .client
            .post(self.generate_url.clone())
            .json(&body)
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

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgentError::parse(ID, e))?;

        Ok(parsed.response.map(|text| Answer::new(text.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_joins_base() {
        let d = LocalDaemon::new(&DaemonConfig::default()).unwrap();
        assert_eq!(d.generate_url().as_str(), "http://localhost:11434/api/generate");

        let d = LocalDaemon::new(&DaemonConfig {
            base_url: "http://10.0.0.5:9000/".into(),
            ..DaemonConfig::default()
        })
        .unwrap();
        assert_eq!(d.generate_url().as_str(), "http://10.0.0.5:9000/api/generate");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let config = DaemonConfig {
            base_url: "not a url".into(),
            ..DaemonConfig::default()
        };
        assert!(matches!(LocalDaemon::new(&config), Err(AgentError::Url(_))));
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            model: "llama2",
            prompt: "p".into(),
            stream: false,
            options: GenerateOptions {
                temperature: 0.5,
                num_predict: 150,
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "llama2");
        assert_eq!(v["stream"], false);
        assert_eq!(v["options"]["num_predict"], 150);
        assert_eq!(v["options"]["temperature"], 0.5);
    }
}
