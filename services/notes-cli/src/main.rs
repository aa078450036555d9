//! Notes CLI
//!
//! Command-line client for the notes API:
//! 1. Loads `notes.toml` (or `--config` / `NOTES_CONFIG`)
//! 2. Keeps the session tokens in a private JSON file
//! 3. Runs one subcommand through the authenticated client

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notes_auth::FileTokenStore;
use notes_client::{AuthenticatedHttpClient, Navigator, Session};

use crate::cli::Cli;
use crate::config::Config;

/// Tells the user to log in again once the stored session is gone.
struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect_to_login(&self) {
        eprintln!("Session expired. Run `notes login <email>` to sign in again.");
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries command output, so logs go to stderr
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_path = Config::resolve_path(cli.config.as_deref());
    debug!(path = %config_path.path.display(), "loading configuration");

    let config = Config::load(&config_path).with_context(|| {
        format!(
            "failed to load config from {}",
            config_path.path.display()
        )
    })?;

    let token_file = config.token_file();
    info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout_secs,
        token_file = %token_file.display(),
        "configuration loaded"
    );

    let store = FileTokenStore::load(token_file.clone())
        .await
        .with_context(|| format!("failed to open token file {}", token_file.display()))?;

    let client = AuthenticatedHttpClient::new(
        &config.client_config(),
        Arc::new(store),
        Arc::new(CliNavigator),
    )
    .context("failed to build API client")?;

    commands::run(&Session::new(client), cli.command).await
}
