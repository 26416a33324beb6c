// system-tests/tests/helpers/app.rs
// ============================================================================
// Module: Fixture App Helpers
// Description: Host-side HTTP apps receiving Dapr sidecar deliveries.
// Purpose: Capture delivered event payloads for suite assertions.
// Dependencies: axum, tokio, serde_json
// ============================================================================

//! ## Overview
//! The sidecar delivers subscribed events to an application channel over
//! HTTP. These helpers spawn that application on the host: a CloudEvent
//! receiver for declarative subscriptions and a variant additionally serving
//! `/dapr/subscribe` for programmatic routing. Delivered `data` payloads are
//! forwarded over a channel for assertions.
//!
//! Apps bind `0.0.0.0` so sidecar containers reach them through the Docker
//! host gateway.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

/// A running fixture app bound on the host.
pub struct AppFixture {
    /// Host port the app listens on.
    pub port: u16,
    /// Delivered CloudEvent `data` payloads, in arrival order.
    pub events: mpsc::Receiver<Value>,
    /// Trigger for graceful shutdown.
    shutdown: oneshot::Sender<()>,
}

impl AppFixture {
    /// Shuts the app down.
    pub fn shutdown(self) {
        let _ = self.shutdown.send(());
    }
}

/// Extracts `data` from a CloudEvent envelope and forwards it.
async fn deliver(
    State(tx): State<mpsc::Sender<Value>>,
    Json(envelope): Json<Value>,
) -> StatusCode {
    let data = envelope.get("data").cloned().unwrap_or(Value::Null);
    let _ = tx.send(data).await;
    StatusCode::OK
}

/// Spawns an app receiving declaratively routed events on `event_path`.
pub async fn spawn_event_app(event_path: &str) -> Result<AppFixture, String> {
    let (tx, events) = mpsc::channel::<Value>(8);
    let router = Router::new().route(event_path, post(deliver)).with_state(tx);
    serve(router, events).await
}

/// Spawns an app announcing one programmatic subscription via
/// `/dapr/subscribe` and receiving its events on `event_path`.
pub async fn spawn_programmatic_app(
    pubsub_name: &str,
    topic: &str,
    event_path: &str,
) -> Result<AppFixture, String> {
    let (tx, events) = mpsc::channel::<Value>(8);
    let subscriptions = json!([
        {
            "pubsubname": pubsub_name,
            "topic": topic,
            "routes": { "default": event_path },
        }
    ]);
    let router = Router::new()
        .route("/dapr/subscribe", get(move || async move { Json(subscriptions) }))
        .route(event_path, post(deliver))
        .with_state(tx);
    serve(router, events).await
}

/// Binds the router on an ephemeral port and serves it in the background.
async fn serve(router: Router, events: mpsc::Receiver<Value>) -> Result<AppFixture, String> {
    let listener = tokio::net::TcpListener::bind("0.0.0.0:0")
        .await
        .map_err(|err| format!("failed to bind fixture app: {err}"))?;
    let port = listener
        .local_addr()
        .map_err(|err| format!("failed to read fixture app address: {err}"))?
        .port();
    let (shutdown, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    Ok(AppFixture {
        port,
        events,
        shutdown,
    })
}
