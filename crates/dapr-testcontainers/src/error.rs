// crates/dapr-testcontainers/src/error.rs
// ============================================================================
// Module: Fixture Errors
// Description: Error types for container fixture construction and startup.
// Purpose: Fail-closed error reporting for test infrastructure.
// Dependencies: dapr-resources, testcontainers, thiserror
// ============================================================================

//! ## Overview
//! Errors raised while configuring or starting container fixtures. Variants
//! are stable for programmatic handling; startup never panics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dapr_resources::ResourceError;
use testcontainers::TestcontainersError;
use thiserror::Error;

// ============================================================================
// SECTION: Error Types
// ============================================================================

/// Errors emitted by container fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// No usable Docker daemon was found.
    #[error("docker unavailable: {0}")]
    DockerUnavailable(String),
    /// The container runtime reported an error.
    #[error("container runtime error: {0}")]
    Container(#[from] TestcontainersError),
    /// A resource document failed to load or validate.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// The fixture was configured inconsistently.
    #[error("invalid fixture configuration: {0}")]
    Invalid(String),
    /// Reserving a host port for an advertised listener failed.
    #[error("failed to reserve host port: {0}")]
    PortAllocation(String),
}
