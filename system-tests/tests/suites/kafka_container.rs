// system-tests/tests/suites/kafka_container.rs
// ============================================================================
// Module: Kafka Container Suite
// Description: Broker fixture coverage with real Kafka clients.
// Purpose: Validate listener topology, custom networks, and reuse.
// Dependencies: dapr-testcontainers, rdkafka, system-tests helpers
// ============================================================================

//! Kafka broker fixture coverage: host connectivity, custom networks, and
//! container reuse.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::time::Duration;

use dapr_testcontainers::KafkaContainer;
use dapr_testcontainers::allocate_host_port;
use dapr_testcontainers::unique_name;
use system_tests::config::resolve_timeout;

use crate::helpers::kafka::assert_message_produced_and_consumed;

#[tokio::test(flavor = "multi_thread")]
async fn kafka_accepts_produce_and_consume() -> Result<(), Box<dyn std::error::Error>> {
    let kafka = KafkaContainer::from_env()?.start().await?;

    let timeout = resolve_timeout(Duration::from_secs(60))?;
    assert_message_produced_and_consumed(&kafka.bootstrap_servers(), timeout).await?;

    kafka.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn kafka_connects_on_custom_network() -> Result<(), Box<dyn std::error::Error>> {
    let network = unique_name("kafka-net");
    let alias = unique_name("kafka");
    let kafka = KafkaContainer::from_env()?
        .with_network(&network)
        .with_network_alias(&alias)
        .start()
        .await?;

    assert_eq!(kafka.internal_bootstrap_servers(), format!("{alias}:9092"));

    let timeout = resolve_timeout(Duration::from_secs(60))?;
    assert_message_produced_and_consumed(&kafka.bootstrap_servers(), timeout).await?;

    kafka.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reusable_containers_share_one_instance() -> Result<(), Box<dyn std::error::Error>> {
    // Reuse matches on the container definition, so both starts must
    // advertise the same host port.
    let port = allocate_host_port()?;
    let first = KafkaContainer::from_env()?.with_host_port(port).with_reuse().start().await?;
    let second = KafkaContainer::from_env()?.with_host_port(port).with_reuse().start().await?;

    assert_eq!(first.id(), second.id());

    let timeout = resolve_timeout(Duration::from_secs(60))?;
    assert_message_produced_and_consumed(&first.bootstrap_servers(), timeout).await?;
    // Deliberately not stopped: a reused container stays up so later
    // reusable starts can attach to it.
    Ok(())
}
