mod commands;

use std::{
    fs::{self, OpenOptions},
    sync::Arc,
};

use anyhow::{Context, Result};
use campuslend_core::{
    config::{self, AppConfig},
    FileStore, KeyValueStore, Repository, SessionStore,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => config::ensure_default_config_at(path)?,
        None => config::ensure_default_config()?,
    };
    let config = AppConfig::load_from(&config_path)?;
    init_logging(&config, cli.log_level.as_deref())?;
    info!(
        "campuslend v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config_path.display()
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::new(config.storage_dir())
            .with_context(|| format!("failed to open {}", config.storage_dir().display()))?,
    );
    let repository = Repository::load(store.clone()).await;
    let session = SessionStore::new(store);
    session.restore().await;

    let name = cli.command.name();
    info!(command = name, "dispatching command");
    let result = commands::run(cli.command, &repository, &session).await;
    if let Err(err) = &result {
        warn!(command = name, "command failed: {err:#}");
    }
    repository.flush().await;
    result
}

fn init_logging(config: &AppConfig, override_level: Option<&str>) -> Result<()> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("campuslend.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let directive = override_level.unwrap_or(&config.log_level);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
