//! Inbound webhook receiver (HTTP, single port).
//!
//! Accepts Commune's inbound-email POSTs, acknowledges immediately, and hands
//! the normalized record to the item consumer off the request path; the
//! response never waits on workflow completion. On startup the inbox webhook
//! is registered (idempotently); on shutdown it is removed.

use crate::client::CommuneClient;
use crate::config::{self, Config};
use crate::host::ItemConsumer;
use crate::trigger::{normalize_inbound, InboxWebhook};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Path Commune POSTs inbound events to (appended to the public URL).
pub const INBOUND_PATH: &str = "/commune/inbound";

const SIGNATURE_HEADER: &str = "X-Commune-Signature";

/// Shared state for the receiver (config, inbound hand-off).
#[derive(Clone)]
pub struct ReceiverState {
    pub config: Arc<Config>,
    /// Sender for normalized inbound records. The consumer task receives.
    pub inbound_tx: mpsc::Sender<Value>,
}

/// Build the receiver router (health + inbound endpoint).
pub fn router(state: ReceiverState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route(INBOUND_PATH, post(commune_inbound))
        .with_state(state)
}

/// Run the receiver until SIGINT/SIGTERM: register the inbox webhook, serve
/// inbound events into `consumer`, deregister on shutdown.
pub async fn run_receiver(config: Config, consumer: Arc<dyn ItemConsumer>) -> Result<()> {
    let api_key = config::resolve_api_key(&config)
        .context("no API key configured (set credentials.apiKey or COMMUNE_API_KEY)")?;
    let domain_id = config
        .trigger
        .domain_id
        .clone()
        .context("trigger.domainId is not configured")?;
    let inbox_id = config
        .trigger
        .inbox_id
        .clone()
        .context("trigger.inboxId is not configured")?;

    let callback_url = config::resolve_callback_url(&config);
    if config.receiver.public_url.is_none() {
        log::warn!(
            "receiver.publicUrl is not set; registering {} (Commune must be able to reach it)",
            callback_url
        );
    }
    if !config::is_loopback_bind(&config.receiver.bind)
        && config::resolve_webhook_secret(&config).is_none()
    {
        log::warn!(
            "receiver bound to {} without a shared secret; anyone who can reach it can inject events",
            config.receiver.bind
        );
    }

    let client = CommuneClient::new(api_key, None);
    let webhook = Arc::new(InboxWebhook::new(client, domain_id, inbox_id));
    if webhook.is_registered(&callback_url).await {
        log::info!("webhook already registered: {}", callback_url);
    } else {
        webhook
            .register(&callback_url, &config.trigger.events)
            .await
            .context("registering webhook with Commune")?;
    }

    let (inbound_tx, mut inbound_rx) = mpsc::channel::<Value>(64);
    tokio::spawn(async move {
        while let Some(item) = inbound_rx.recv().await {
            consumer.deliver(item).await;
        }
    });

    let bind_addr = format!("{}:{}", config.receiver.bind, config.receiver.port);
    let state = ReceiverState {
        config: Arc::new(config),
        inbound_tx,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("receiver listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(webhook))
        .await
        .context("receiver server exited")?;
    log::info!("receiver stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM),
/// after removing the webhook registration.
async fn shutdown_signal(webhook: Arc<InboxWebhook>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, removing webhook registration");
    webhook.deregister().await;
}

/// POST /commune/inbound: verifies the optional shared secret, normalizes the
/// event per the configured output mode, queues it, and acknowledges.
async fn commune_inbound(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(ref expected) = config::resolve_webhook_secret(&state.config) {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if provided != expected.as_str() {
            return StatusCode::FORBIDDEN;
        }
    }
    let event: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) => return StatusCode::BAD_REQUEST,
    };
    let record = normalize_inbound(&event, state.config.trigger.output);
    let delivery_id = uuid::Uuid::new_v4();
    if state.inbound_tx.send(record).await.is_err() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    log::debug!("inbound email event {} accepted", delivery_id);
    StatusCode::OK
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<ReceiverState>) -> Json<Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.receiver.port,
    }))
}
