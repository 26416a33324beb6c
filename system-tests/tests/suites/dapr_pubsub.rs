// system-tests/tests/suites/dapr_pubsub.rs
// ============================================================================
// Module: Dapr Pub/Sub Suite
// Description: End-to-end Dapr/Kafka pub/sub interop tests.
// Purpose: Validate declarative and programmatic subscription delivery.
// Dependencies: dapr-resources, dapr-testcontainers, axum helpers
// ============================================================================

//! Dapr/Kafka pub/sub interop: a sidecar wired to a broker on a shared
//! network delivers published events to an app bound on the host, once via a
//! declarative subscription document and once via programmatic
//! `/dapr/subscribe` routing.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::path::Path;
use std::time::Duration;

use dapr_resources::Component;
use dapr_resources::Subscription;
use dapr_testcontainers::DaprContainer;
use dapr_testcontainers::DaprHttpClient;
use dapr_testcontainers::DaprLogLevel;
use dapr_testcontainers::HOST_GATEWAY_ALIAS;
use dapr_testcontainers::KafkaContainer;
use dapr_testcontainers::StartedKafkaContainer;
use dapr_testcontainers::unique_name;
use serde_json::Value;
use serde_json::json;
use system_tests::config::resolve_timeout;

use crate::helpers::app::AppFixture;
use crate::helpers::app::spawn_event_app;
use crate::helpers::app::spawn_programmatic_app;

/// Pub/sub component fixture shared by both tests.
const PUBSUB_FIXTURE: &str = "tests/fixtures/pubsub.yaml";
/// Component name declared in the fixture.
const PUBSUB_NAME: &str = "kafka-pubsub-noauth";
/// Topic both tests publish on.
const TOPIC: &str = "test-topic";

/// Starts a broker on `network`, reachable in-network under a fresh alias.
async fn start_kafka(network: &str) -> Result<StartedKafkaContainer, Box<dyn std::error::Error>> {
    let kafka = KafkaContainer::from_env()?
        .with_network(network)
        .with_network_alias(unique_name("kafka"))
        .start()
        .await?;
    Ok(kafka)
}

/// Loads the pub/sub component fixture, pointed at the given broker address.
fn pubsub_component(brokers: &str) -> Result<Component, Box<dyn std::error::Error>> {
    let mut component = Component::from_path(Path::new(PUBSUB_FIXTURE))?;
    assert_eq!(component.name(), PUBSUB_NAME);
    component.set_metadata("brokers", brokers);
    Ok(component)
}

/// Awaits the next delivered event payload within the suite timeout.
async fn next_event(app: &mut AppFixture) -> Result<Value, Box<dyn std::error::Error>> {
    let timeout = resolve_timeout(Duration::from_secs(60))?;
    let event = tokio::time::timeout(timeout, app.events.recv())
        .await
        .map_err(|_| "timed out waiting for an event delivery")?
        .ok_or("event app closed before delivering an event")?;
    Ok(event)
}

#[tokio::test(flavor = "multi_thread")]
async fn declarative_subscription_delivers_published_event()
-> Result<(), Box<dyn std::error::Error>> {
    let mut app = spawn_event_app("/events").await?;

    let network = unique_name("dapr-net");
    let kafka = start_kafka(&network).await?;
    let component = pubsub_component(&kafka.internal_bootstrap_servers())?;
    let subscription = Subscription::new("my-subscription", PUBSUB_NAME, TOPIC, "/events");

    let sidecar = DaprContainer::from_env()?
        .with_app_id("declarative-app")
        .with_app_port(app.port)
        .with_app_channel_address(HOST_GATEWAY_ALIAS)
        .with_log_level(DaprLogLevel::Info)
        .with_api_logging(true)
        .with_network(&network)
        .with_component(component)
        .with_subscription(subscription);
    assert_eq!(sidecar.components().len(), 1);
    assert_eq!(sidecar.subscriptions().len(), 1);
    let sidecar = sidecar.start().await?;

    let client = DaprHttpClient::new(sidecar.host(), sidecar.http_port())?;
    client.wait_healthy(resolve_timeout(Duration::from_secs(60))?).await?;

    let payload = json!({ "key": "key", "value": "value" });
    client.publish(PUBSUB_NAME, TOPIC, &payload).await?;

    let delivered = next_event(&mut app).await?;
    assert_eq!(delivered, payload);

    sidecar.stop().await?;
    kafka.stop().await?;
    app.shutdown();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn programmatic_subscription_delivers_published_event()
-> Result<(), Box<dyn std::error::Error>> {
    let mut app = spawn_programmatic_app(PUBSUB_NAME, TOPIC, "/programmatic-events").await?;

    let network = unique_name("dapr-net");
    let kafka = start_kafka(&network).await?;
    let component = pubsub_component(&kafka.internal_bootstrap_servers())?;

    let sidecar = DaprContainer::from_env()?
        .with_app_id("programmatic-app")
        .with_app_port(app.port)
        .with_app_channel_address(HOST_GATEWAY_ALIAS)
        .with_log_level(DaprLogLevel::Info)
        .with_network(&network)
        .with_component(component)
        .start()
        .await?;

    let client = DaprHttpClient::new(sidecar.host(), sidecar.http_port())?;
    client.wait_healthy(resolve_timeout(Duration::from_secs(60))?).await?;

    // The sidecar learned the route from /dapr/subscribe; the metadata
    // endpoint confirms the component registered.
    let metadata = client.metadata().await?;
    let components = metadata
        .get("components")
        .and_then(Value::as_array)
        .ok_or("metadata response carried no components array")?;
    assert!(components.iter().any(|entry| entry.get("name").and_then(Value::as_str)
        == Some(PUBSUB_NAME)));

    let payload = json!({ "key": "key", "value": "value" });
    client.publish(PUBSUB_NAME, TOPIC, &payload).await?;

    let delivered = next_event(&mut app).await?;
    assert_eq!(delivered, payload);

    sidecar.stop().await?;
    kafka.stop().await?;
    app.shutdown();
    Ok(())
}
