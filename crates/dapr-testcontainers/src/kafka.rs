// crates/dapr-testcontainers/src/kafka.rs
// ============================================================================
// Module: Kafka Container Fixture
// Description: Single-node KRaft Kafka broker for integration tests.
// Purpose: Provide host- and network-reachable Kafka bootstrap endpoints.
// Dependencies: testcontainers, rand
// ============================================================================

//! ## Overview
//! [`KafkaContainer`] starts a Confluent `cp-kafka` image as a single-node
//! KRaft cluster with two client listeners: `PLAINTEXT` for the host on a
//! pre-allocated mapped port and `BROKER` on 9092 for containers sharing a
//! network. Because the host port is reserved before start, advertised
//! listeners are correct up front and no post-start reconfiguration is
//! needed.
//! Invariants:
//! - Replication and ISR factors are 1; topic auto-creation is enabled.
//! - Startup gates on the broker's `Kafka Server started` log line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;

use testcontainers::ContainerAsync;
use testcontainers::GenericImage;
use testcontainers::ImageExt;
use testcontainers::ReuseDirective;
use testcontainers::core::IntoContainerPort;
use testcontainers::core::WaitFor;
use testcontainers::runners::AsyncRunner;

use crate::docker::allocate_host_port;
use crate::docker::ensure_docker_available;
use crate::docker::unique_name;
use crate::error::FixtureError;
use crate::image::ImageRef;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// In-container port of the host-facing `PLAINTEXT` listener.
pub const KAFKA_PORT: u16 = 9093;
/// In-container port of the in-network `BROKER` listener.
pub const BROKER_PORT: u16 = 9092;
/// In-container port of the KRaft controller listener.
const CONTROLLER_PORT: u16 = 9094;
/// Image used when no override is configured.
const DEFAULT_KAFKA_IMAGE: &str = "confluentinc/cp-kafka:8.1.0";
/// Environment variable overriding the broker image.
const KAFKA_IMAGE_ENV: &str = "DAPR_TC_KAFKA_IMAGE";
/// Log line marking broker readiness.
const READY_LOG: &str = "Kafka Server started";
/// Fixed KRaft cluster id; any valid base64 uuid works for a test broker.
const CLUSTER_ID: &str = "MkU3OEVBNTcwNTJENDM2Qk";

// ============================================================================
// SECTION: Kafka Fixture
// ============================================================================

/// Builder for a single-node KRaft Kafka broker container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaContainer {
    /// Broker image reference.
    image: ImageRef,
    /// Docker network to attach to, when set.
    network: Option<String>,
    /// In-network DNS name; doubles as the container name.
    alias: Option<String>,
    /// Fixed host port for the `PLAINTEXT` listener, when set.
    host_port: Option<u16>,
    /// Whether the container definition is reusable across starts.
    reuse: bool,
}

impl KafkaContainer {
    /// Creates a fixture from a `repository:tag` image string.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] for malformed image strings.
    pub fn new(image: &str) -> Result<Self, FixtureError> {
        Ok(Self {
            image: ImageRef::parse(image)?,
            network: None,
            alias: None,
            host_port: None,
            reuse: false,
        })
    }

    /// Creates a fixture from `DAPR_TC_KAFKA_IMAGE` or the default image.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] when the override is malformed.
    pub fn from_env() -> Result<Self, FixtureError> {
        let image = env::var(KAFKA_IMAGE_ENV).unwrap_or_else(|_| DEFAULT_KAFKA_IMAGE.to_string());
        Self::new(&image)
    }

    /// Attaches the broker to a Docker network.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Sets the in-network DNS name other containers use to reach the broker.
    ///
    /// The alias is used as the container name, so it must be unique per
    /// Docker daemon; see [`unique_name`]. An alias is only meaningful on a
    /// Docker network; [`KafkaContainer::start`] rejects an alias without
    /// [`KafkaContainer::with_network`].
    #[must_use]
    pub fn with_network_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Fixes the host port of the `PLAINTEXT` listener instead of reserving
    /// one at start.
    ///
    /// Required for reusable containers: reuse matches on the container
    /// definition, so every start must advertise the same port.
    #[must_use]
    pub fn with_host_port(mut self, port: u16) -> Self {
        self.host_port = Some(port);
        self
    }

    /// Marks the container definition reusable across starts.
    #[must_use]
    pub fn with_reuse(mut self) -> Self {
        self.reuse = true;
        self
    }

    /// Assembles the broker environment for the given alias and host port.
    pub(crate) fn broker_env(alias: &str, host_port: u16) -> Vec<(String, String)> {
        let advertised = format!(
            "PLAINTEXT://localhost:{host_port},BROKER://{alias}:{BROKER_PORT}"
        );
        vec![
            ("CLUSTER_ID".to_string(), CLUSTER_ID.to_string()),
            ("KAFKA_NODE_ID".to_string(), "1".to_string()),
            ("KAFKA_PROCESS_ROLES".to_string(), "broker,controller".to_string()),
            (
                "KAFKA_CONTROLLER_QUORUM_VOTERS".to_string(),
                format!("1@localhost:{CONTROLLER_PORT}"),
            ),
            ("KAFKA_CONTROLLER_LISTENER_NAMES".to_string(), "CONTROLLER".to_string()),
            (
                "KAFKA_LISTENERS".to_string(),
                format!(
                    "PLAINTEXT://0.0.0.0:{KAFKA_PORT},BROKER://0.0.0.0:{BROKER_PORT},CONTROLLER://0.0.0.0:{CONTROLLER_PORT}"
                ),
            ),
            ("KAFKA_ADVERTISED_LISTENERS".to_string(), advertised),
            (
                "KAFKA_LISTENER_SECURITY_PROTOCOL_MAP".to_string(),
                "PLAINTEXT:PLAINTEXT,BROKER:PLAINTEXT,CONTROLLER:PLAINTEXT".to_string(),
            ),
            ("KAFKA_INTER_BROKER_LISTENER_NAME".to_string(), "BROKER".to_string()),
            ("KAFKA_OFFSETS_TOPIC_REPLICATION_FACTOR".to_string(), "1".to_string()),
            ("KAFKA_TRANSACTION_STATE_LOG_REPLICATION_FACTOR".to_string(), "1".to_string()),
            ("KAFKA_TRANSACTION_STATE_LOG_MIN_ISR".to_string(), "1".to_string()),
            ("KAFKA_GROUP_INITIAL_REBALANCE_DELAY_MS".to_string(), "0".to_string()),
            ("KAFKA_AUTO_CREATE_TOPICS_ENABLE".to_string(), "true".to_string()),
        ]
    }

    /// Starts the broker and waits for its ready log line.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] for an alias without a network,
    /// and [`FixtureError`] when Docker is unavailable, the host port
    /// cannot be reserved, or the container fails to start.
    pub async fn start(self) -> Result<StartedKafkaContainer, FixtureError> {
        if self.alias.is_some() && self.network.is_none() {
            return Err(FixtureError::Invalid(
                "a network alias requires a network".to_string(),
            ));
        }
        ensure_docker_available()?;
        let host_port = match self.host_port {
            Some(port) => port,
            None => allocate_host_port()?,
        };
        let alias = self.alias.clone().unwrap_or_else(|| unique_name("kafka"));
        // Inter-broker traffic stays inside the container when no network
        // alias is published.
        let broker_host =
            if self.network.is_some() { alias.clone() } else { "localhost".to_string() };

        let image = GenericImage::new(self.image.repository(), self.image.tag())
            .with_exposed_port(KAFKA_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout(READY_LOG));

        let mut request = image.with_mapped_port(host_port, KAFKA_PORT.tcp());
        for (key, value) in Self::broker_env(&broker_host, host_port) {
            request = request.with_env_var(key, value);
        }
        if let Some(network) = &self.network {
            request = request.with_network(network).with_container_name(&alias);
        }
        if self.reuse {
            request = request.with_reuse(ReuseDirective::Always);
        }

        let container = request.start().await?;
        Ok(StartedKafkaContainer {
            container,
            host_port,
            broker_host,
        })
    }
}

// ============================================================================
// SECTION: Started Handle
// ============================================================================

/// A running Kafka broker container.
#[derive(Debug)]
pub struct StartedKafkaContainer {
    /// Underlying container handle; dropped containers are cleaned up.
    container: ContainerAsync<GenericImage>,
    /// Host port mapped onto the `PLAINTEXT` listener.
    host_port: u16,
    /// Hostname advertised on the `BROKER` listener.
    broker_host: String,
}

impl StartedKafkaContainer {
    /// Returns the container id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.container.id()
    }

    /// Returns the host-reachable bootstrap address.
    #[must_use]
    pub fn bootstrap_servers(&self) -> String {
        format!("localhost:{}", self.host_port)
    }

    /// Returns the bootstrap address for containers on the same network.
    #[must_use]
    pub fn internal_bootstrap_servers(&self) -> String {
        format!("{}:{BROKER_PORT}", self.broker_host)
    }

    /// Stops the broker container.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Container`] when the runtime refuses the stop.
    pub async fn stop(&self) -> Result<(), FixtureError> {
        self.container.stop().await?;
        Ok(())
    }
}
