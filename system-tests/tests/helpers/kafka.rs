// system-tests/tests/helpers/kafka.rs
// ============================================================================
// Module: Kafka Assertion Helpers
// Description: Produce/consume round-trip assertion against a broker.
// Purpose: Verify a Kafka fixture accepts real client traffic.
// Dependencies: rdkafka, tokio, dapr-testcontainers
// ============================================================================

//! ## Overview
//! Produces one message to a fresh topic and consumes it back with a fresh
//! consumer group, asserting payload equality. Topic auto-creation is
//! enabled on the fixture, so no admin client is needed.

use std::time::Duration;

use dapr_testcontainers::unique_name;
use rdkafka::ClientConfig;
use rdkafka::Message;
use rdkafka::consumer::Consumer;
use rdkafka::consumer::StreamConsumer;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;

/// Deadline for the produce call.
const PRODUCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces one message and consumes it back, asserting payload equality.
pub async fn assert_message_produced_and_consumed(
    bootstrap_servers: &str,
    consume_timeout: Duration,
) -> Result<(), String> {
    let topic = unique_name("interop-topic");
    let group = unique_name("interop-group");
    let payload = format!("ping-{topic}");

    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", bootstrap_servers)
        .set("group.id", &group)
        .set("auto.offset.reset", "earliest")
        .set("enable.partition.eof", "false")
        .create()
        .map_err(|err| format!("failed to create consumer: {err}"))?;
    consumer
        .subscribe(&[&topic])
        .map_err(|err| format!("failed to subscribe to {topic}: {err}"))?;

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", bootstrap_servers)
        .set("message.timeout.ms", "30000")
        .create()
        .map_err(|err| format!("failed to create producer: {err}"))?;
    producer
        .send(FutureRecord::to(&topic).key("key").payload(&payload), PRODUCE_TIMEOUT)
        .await
        .map_err(|(err, _)| format!("produce to {topic} failed: {err}"))?;

    let message = tokio::time::timeout(consume_timeout, consumer.recv())
        .await
        .map_err(|_| format!("consume from {topic} timed out"))?
        .map_err(|err| format!("consume from {topic} failed: {err}"))?;
    let received = message
        .payload()
        .map(|bytes| String::from_utf8_lossy(bytes).to_string())
        .unwrap_or_default();
    if received != payload {
        return Err(format!("payload mismatch: sent {payload}, received {received}"));
    }
    Ok(())
}
