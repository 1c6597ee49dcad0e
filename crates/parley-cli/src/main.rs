//! CLI entry point for parley.
//!
//! This binary provides the `parley` command with subcommands for running
//! the chat server, answering a single message, and inspecting detection.

mod cli;
mod config;
mod helpers;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use parley_agent::{Variant, build_chain};
use parley_intent::{IntentClassifier, LanguageDetector, ThreadRngPicker};
use parley_store::ConversationHistory;
use parley_web::{AppState, Dispatcher, WebServer};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::helpers::{env_non_empty, init_tracing};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            variant,
            config,
            bind,
            port,
        } => cmd_serve(variant, config.as_deref(), bind, port).await,
        Commands::Ask {
            message,
            variant,
            config,
        } => cmd_ask(&message, variant, config.as_deref()).await,
        Commands::Detect { text } => cmd_detect(&text),
    }
}

/// Load the config file and layer environment overrides on top.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::load(path)?;
    config.apply_env(env_non_empty)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(
    variant: Variant,
    config_path: Option<&Path>,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    init_tracing("info");

    info!(%variant, "starting parley");

    let config = load_config(config_path)?;
    let web_config = config.web_config(variant, bind, port);

    let chain = build_chain(variant, &config.providers, Arc::new(ThreadRngPicker))
        .context("failed to assemble the provider chain")?;
    info!(stages = ?chain.stage_ids(), terminal = %chain.terminal_id(), "provider chain ready");

    let state = AppState::new(variant, chain, web_config).context("failed to build app state")?;

    WebServer::new(state)
        .start()
        .await
        .context("web server exited with an error")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: ask
// ---------------------------------------------------------------------------

async fn cmd_ask(message: &str, variant: Variant, config_path: Option<&Path>) -> Result<()> {
    init_tracing("warn");

    let config = load_config(config_path)?;
    let chain = build_chain(variant, &config.providers, Arc::new(ThreadRngPicker))
        .context("failed to assemble the provider chain")?;
    let dispatcher = Dispatcher::new(variant, chain, ConversationHistory::default())?;

    let reply = dispatcher.dispatch(message).await;
    println!("{}", serde_json::to_string_pretty(&reply)?);

    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: detect
// ---------------------------------------------------------------------------

fn cmd_detect(text: &str) -> Result<()> {
    let detector = LanguageDetector::new()?;
    let classifier = IntentClassifier::new()?;

    let language = detector.detect(text);
    let classification = classifier.classify(text);

    println!("language:   {language}");
    println!(
        "intent:     {} ({:.2})",
        classification.intent, classification.confidence
    );

    Ok(())
}
