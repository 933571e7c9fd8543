//! Prowbot CLI entrypoint: runs one bot task per invocation.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prowbot::{BotConfig, BotError, OctocrabTracker, PersonalAccessToken, TrackerError};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "task failed");
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, `info` by
/// default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), BotError> {
    let config = load_config()?;
    config.validate()?;

    let locator = config.repository_locator()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let tracker = OctocrabTracker::for_token(&token, &locator)?;
    tracing::info!(
        owner = locator.owner().as_str(),
        repository = locator.repository().as_str(),
        mode = ?config.operation_mode(),
        "running"
    );

    let mut stdout = io::stdout().lock();
    cli::run_operation(&config, &tracker, &mut stdout).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`TrackerError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<BotConfig, BotError> {
    BotConfig::load().map_err(|error| {
        BotError::Tracker(TrackerError::Configuration {
            message: error.to_string(),
        })
    })
}
