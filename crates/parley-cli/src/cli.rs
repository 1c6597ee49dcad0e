//! CLI argument definitions for parley.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parley_agent::Variant;

/// parley -- a multilingual chat service with provider fallback.
#[derive(Parser)]
#[command(
    name = "parley",
    version,
    about = "parley -- multilingual chat service with provider fallback",
    long_about = "Answers chat messages in six languages by walking a chain of \
                  response providers (hosted inference, a local daemon, a local \
                  model or a web lookup) and falling back to rule-based templates."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP and WebSocket server.
    Serve {
        /// Which provider chain to run: rules, search or demo.
        #[arg(long, default_value = "rules")]
        variant: Variant,

        /// Path to the TOML config file.
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Address to bind the HTTP server to.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (defaults per variant: rules 8002, search 8006,
        /// demo 8000).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Answer one message and print the reply envelope.
    Ask {
        /// The message to answer.
        message: String,

        /// Which provider chain to run: rules, search or demo.
        #[arg(long, default_value = "rules")]
        variant: Variant,

        /// Path to the TOML config file.
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Print the detected language and intent of a text.
    Detect {
        /// The text to analyse.
        text: String,
    },
}
