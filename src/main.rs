//! Application entry point: Korean ↔ Thai translation relay.
//!
//! # Startup sequence
//!
//! 1. Load `.env` (optional).
//! 2. Initialise logging, `info` unless `RUST_LOG` says otherwise.
//! 3. Load [`AppConfig`] from `settings.toml` plus environment overrides;
//!    raise logging to `debug` when `debug_logging` is set.
//! 4. Validate credentials; missing ones abort startup.
//! 5. Build the completion backend, reply client and orchestrator.
//! 6. Serve the axum router until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use log::LevelFilter;

use korthai::config::AppConfig;
use korthai::llm::{ApiCompletionBackend, CompletionBackend};
use korthai::pipeline::PipelineOrchestrator;
use korthai::reply::{MessagingApiClient, ReplyClient};
use korthai::server::{build_app_with_state, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env
    let dotenv = dotenvy::dotenv();

    // 2. Logging. The logger passes debug records so the `debug_logging`
    //    toggle only has to move the global max level.
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    if !rust_log_set {
        log::set_max_level(LevelFilter::Info);
    }
    log::info!("korthai {} starting up", env!("CARGO_PKG_VERSION"));

    // 3. Configuration
    let config = AppConfig::load().context("failed to load configuration")?;
    if config.debug_logging && !rust_log_set {
        log::set_max_level(LevelFilter::Debug);
    }
    if let Ok(path) = dotenv {
        log::debug!("loaded environment from {}", path.display());
    }

    // 4. Credentials
    config.validate()?;

    log::info!(
        "models: {} (fallback {}), back-translation {}, polite particle {}",
        config.style.target_model,
        config.style.fallback_model,
        if config.style.include_back_translation { "on" } else { "off" },
        if config.style.enforce_honorific { "enforced" } else { "not enforced" },
    );

    // 5. Pipeline
    let config = Arc::new(config);
    let backend: Arc<dyn CompletionBackend> = Arc::new(ApiCompletionBackend::from_config(&config.llm));
    let replier: Arc<dyn ReplyClient> = Arc::new(MessagingApiClient::from_config(&config.messaging));
    let orchestrator = Arc::new(PipelineOrchestrator::new(Arc::clone(&config), backend, replier));

    // 6. Server
    let app = build_app_with_state(ServerState::new(orchestrator));
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;

    log::info!(
        "listening on {} (webhook path {})",
        config.server.bind_addr,
        config.server.webhook_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
