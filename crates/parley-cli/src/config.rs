//! Process configuration.
//!
//! Layered lowest to highest: built-in defaults, `config/default.toml` (or
//! the file passed with `--config`), environment variables, then CLI flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use parley_agent::{ProviderSettings, Variant};
use parley_web::WebConfig;

/// Config file read when `--config` is not given.  Optional.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variables that override the config file.
pub const ENV_HF_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const ENV_OLLAMA_URL: &str = "PARLEY_OLLAMA_URL";
pub const ENV_OLLAMA_MODEL: &str = "PARLEY_OLLAMA_MODEL";
pub const ENV_CORPUS_PATH: &str = "PARLEY_CORPUS_PATH";
pub const ENV_BIND: &str = "PARLEY_BIND";
pub const ENV_PORT: &str = "PARLEY_PORT";

/// Everything the binary reads from `config/default.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub providers: ProviderSettings,
}

/// The `[server]` table.  The port is optional so the variant default can
/// apply.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_addr: String,
    pub port: Option<u16>,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        let web = WebConfig::default();
        Self {
            bind_addr: web.bind_addr,
            port: None,
            allowed_origins: web.allowed_origins,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_PATH`] if it exists.
    ///
    /// An explicitly given file must exist; the default one may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides.  `lookup` returns `None` for unset (or
    /// empty) variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        // The API key only ever comes from the environment.
        self.providers.hosted.api_key = lookup(ENV_HF_API_KEY);

        if let Some(url) = lookup(ENV_OLLAMA_URL) {
            self.providers.daemon.base_url = url;
        }
        if let Some(model) = lookup(ENV_OLLAMA_MODEL) {
            self.providers.daemon.model = model;
        }
        if let Some(path) = lookup(ENV_CORPUS_PATH) {
            self.providers.local_model.corpus_path = Some(PathBuf::from(path));
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.server.bind_addr = bind;
        }
        if let Some(port) = lookup(ENV_PORT) {
            let port = port
                .parse()
                .with_context(|| format!("{ENV_PORT} is not a valid port: {port}"))?;
            self.server.port = Some(port);
        }
        Ok(())
    }

    /// Final server settings for `variant`, after CLI flags.
    pub fn web_config(
        &self,
        variant: Variant,
        bind: Option<String>,
        port: Option<u16>,
    ) -> WebConfig {
        WebConfig {
            bind_addr: bind.unwrap_or_else(|| self.server.bind_addr.clone()),
            port: port
                .or(self.server.port)
                .unwrap_or_else(|| variant.default_port()),
            allowed_origins: self.server.allowed_origins.clone(),
        }
    }
}
