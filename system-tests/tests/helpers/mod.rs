// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Dapr interop system-tests.
// Purpose: Provide fixture apps and broker assertions for the suites.
// Dependencies: system-tests, dapr-testcontainers, axum, rdkafka
// ============================================================================

//! ## Overview
//! Shared helpers for the Dapr interop system-tests: host-side fixture apps
//! receiving sidecar deliveries and the Kafka produce/consume assertion.
//! Invariants:
//! - Helpers fail with descriptive errors instead of panicking.
//! - Readiness is gated on probes, never on arbitrary sleeps.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod app;
pub mod kafka;
