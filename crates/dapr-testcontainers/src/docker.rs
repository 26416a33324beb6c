// crates/dapr-testcontainers/src/docker.rs
// ============================================================================
// Module: Docker Host Helpers
// Description: Daemon probing, host port reservation, and unique naming.
// Purpose: Keep host-side docker plumbing out of the fixture builders.
// Dependencies: rand, std
// ============================================================================

//! ## Overview
//! Host-side helpers shared by the container fixtures: probing the Docker
//! daemon before attempting a start, reserving a loopback port so advertised
//! listeners can be fixed up front, and generating unique names so parallel
//! suites never collide on container names or networks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::TcpListener;
use std::process::Command;

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::error::FixtureError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of the random suffix appended by [`unique_name`].
const NAME_SUFFIX_LEN: usize = 8;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Verifies that a Docker daemon is reachable.
///
/// # Errors
///
/// Returns [`FixtureError::DockerUnavailable`] with the daemon's stderr when
/// `docker info` fails.
pub fn ensure_docker_available() -> Result<(), FixtureError> {
    let output = Command::new("docker")
        .arg("info")
        .output()
        .map_err(|err| FixtureError::DockerUnavailable(format!("docker info failed: {err}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FixtureError::DockerUnavailable(format!("docker info failed: {stderr}")));
    }
    Ok(())
}

/// Reserves a free host port by briefly binding the loopback interface.
///
/// The port is released before returning, so a small window exists in which
/// another process could claim it. Acceptable for test fixtures.
///
/// # Errors
///
/// Returns [`FixtureError::PortAllocation`] when binding fails.
pub fn allocate_host_port() -> Result<u16, FixtureError> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| FixtureError::PortAllocation(format!("failed to bind loopback: {err}")))?;
    let port = listener
        .local_addr()
        .map_err(|err| {
            FixtureError::PortAllocation(format!("failed to read listener address: {err}"))
        })?
        .port();
    drop(listener);
    Ok(port)
}

/// Returns `{prefix}-{random}` with a lowercase alphanumeric suffix.
///
/// Suitable for container names, network names, topics, and consumer groups.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NAME_SUFFIX_LEN)
        .map(|byte| char::from(byte.to_ascii_lowercase()))
        .collect();
    format!("{prefix}-{suffix}")
}
