pub mod activity;
pub mod ai;
pub mod capture;
pub mod config;
pub mod server;
pub mod service;

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use crate::activity::ActivityStore;
use crate::config::AppConfig;
use crate::service::ActivityService;

/// Overrides taken from the command line; they win over file and environment settings.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub bind_addr: Option<String>,
}

pub async fn run(options: RunOptions) -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = AppConfig::load(options.config_path.as_deref());
    if let Some(addr) = options.bind_addr {
        config.bind_addr = addr;
    }

    // ─── State ───────────────────────────────────────────────────────
    let store = Arc::new(ActivityStore::new());
    let service = Arc::new(
        ActivityService::new(&config, store).context("Failed to build Ollama client")?,
    );

    log::info!(
        "Using Ollama model {} at {}",
        service.client().model(),
        service.client().url()
    );

    // ─── HTTP ────────────────────────────────────────────────────────
    let app = server::router(service, config.max_body_bytes);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    log::info!("Activity server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
