// system-tests/src/config.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout configuration with env overrides.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Container pulls and broker startup dominate system-test runtime, so every
//! suite resolves its deadlines through [`resolve_timeout`]. A slow CI host
//! can raise them globally via `DAPR_TC_SYSTEM_TEST_TIMEOUT_SEC`; the
//! override acts as a minimum and never shortens an explicitly longer
//! timeout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable raising every suite timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "DAPR_TC_SYSTEM_TEST_TIMEOUT_SEC";

// ============================================================================
// SECTION: Timeout Resolution
// ============================================================================

/// Returns the effective timeout, honoring the env override when set.
///
/// # Errors
///
/// Returns a description of the malformed override; suites fail closed
/// rather than running with a silently ignored setting.
pub fn resolve_timeout(requested: Duration) -> Result<Duration, String> {
    match env::var(ENV_TIMEOUT_SECS) {
        Ok(raw) => {
            let override_timeout =
                parse_timeout_secs(&raw).map_err(|err| format!("{ENV_TIMEOUT_SECS} {err}"))?;
            Ok(std::cmp::max(requested, override_timeout))
        }
        Err(_) => Ok(requested),
    }
}

/// Parses a whole-second timeout value.
fn parse_timeout_secs(raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("must be a positive integer number of seconds".to_string());
    }
    let secs: u64 =
        trimmed.parse().map_err(|_| "must be a positive integer number of seconds".to_string())?;
    if secs == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}
