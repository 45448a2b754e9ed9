//! Incident relay service binary.
//!
//! Standalone HTTP service: reads configuration from the environment,
//! wires the pipeline to its downstream clients and the audit store, and
//! serves the webhook until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use audit::BlobStore;
use relay::server::{build_router, AppState};
use relay::{Config, IncidentRelay, JiraClient, WebexClient};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("relay=info".parse()?)
                .add_directive("audit=info".parse()?),
        )
        .init();

    info!("Starting incident relay...");

    let config = Config::from_env().context("Incomplete relay configuration")?;

    let jira = JiraClient::new(&config.jira)?;
    info!(
        base_url = %config.jira.base_url,
        project_key = %config.jira.project_key,
        issue_type = %config.jira.issue_type,
        "Jira client configured"
    );

    let webex = WebexClient::new(&config.webex)?;
    info!(room_id = %config.webex.room_id, "Webex client configured");

    let mut store = BlobStore::new(
        &config.log_store.url,
        &config.log_store.bucket,
        &config.log_store.prefix,
    )?;
    if let Some(token) = &config.log_store.token {
        store = store.with_token(token);
    }
    info!(
        bucket = %config.log_store.bucket,
        prefix = %config.log_store.prefix,
        "Audit log store configured"
    );

    let relay = IncidentRelay::new(jira, webex, Arc::new(store));
    let app = build_router(AppState {
        relay: Arc::new(relay),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind listen address")?;

    info!(port = config.port, "Incident relay listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
