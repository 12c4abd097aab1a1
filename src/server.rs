//! HTTP server initialization.
//!
//! [`serve`] wires the database, the LLM client and the router into a running
//! axum server.

use crate::api::{self, AppState};
use crate::chat::{ChatStore, SqliteChatStore};
use crate::config::StudyBotConfig;
use crate::db;
use crate::llm::{groq::GroqClient, LlmClient};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Shared setup: validate config, open the DB, build the LLM client.
pub fn setup_shared_state(config: &StudyBotConfig) -> Result<AppState> {
    config.validate_for_serving()?;

    let conn = db::open_database(
        &config.storage.database_url,
        Duration::from_millis(config.storage.connect_timeout_ms),
    )?;
    let store: Arc<dyn ChatStore> = Arc::new(SqliteChatStore::new(conn));
    tracing::info!("chat store ready");

    let client = GroqClient::new(&config.llm)?;
    tracing::info!(endpoint = %client.endpoint(), model = %client.model(), "LLM client ready");
    let llm: Arc<dyn LlmClient> = Arc::new(client);

    Ok(AppState::new(store, llm, config.llm.system_prompt.as_str()))
}

/// Start the HTTP API and run until Ctrl-C.
pub async fn serve(config: StudyBotConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "starting Study Bot API");

    let state = setup_shared_state(&config)?;
    let router = api::build_router(
        state,
        api::cors_layer(config.server.cors_allowed_origins.as_deref()),
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
