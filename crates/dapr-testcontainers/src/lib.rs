// crates/dapr-testcontainers/src/lib.rs
// ============================================================================
// Module: Dapr Testcontainers Library
// Description: Container fixtures for daprd sidecars and Kafka brokers.
// Purpose: Start disposable Dapr infrastructure for integration tests.
// Dependencies: dapr-resources, testcontainers, reqwest, tokio
// ============================================================================

//! ## Overview
//! `dapr-testcontainers` provides disposable infrastructure fixtures for
//! integration tests: a [`DaprContainer`] running the daprd sidecar with
//! resource documents copied in before start, a [`KafkaContainer`] running a
//! single-node KRaft broker with host and in-network listeners, and a
//! [`DaprHttpClient`] for readiness probes and event publishing.
//! Invariants:
//! - Resource documents are validated before any container is created.
//! - Container startup gates on the runtime's ready log line, never on
//!   arbitrary sleeps.
//!
//! Fixtures require a reachable Docker daemon; [`ensure_docker_available`]
//! reports a usable error when one is missing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod daprd;
pub mod docker;
pub mod error;
pub mod image;
pub mod kafka;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ClientError;
pub use client::DaprHttpClient;
pub use daprd::DAPR_GRPC_PORT;
pub use daprd::DAPR_HTTP_PORT;
pub use daprd::DaprContainer;
pub use daprd::DaprLogLevel;
pub use daprd::HOST_GATEWAY_ALIAS;
pub use daprd::StartedDaprContainer;
pub use docker::allocate_host_port;
pub use docker::ensure_docker_available;
pub use docker::unique_name;
pub use error::FixtureError;
pub use image::ImageRef;
pub use kafka::BROKER_PORT;
pub use kafka::KAFKA_PORT;
pub use kafka::KafkaContainer;
pub use kafka::StartedKafkaContainer;
