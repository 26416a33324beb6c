// crates/dapr-resources/src/error.rs
// ============================================================================
// Module: Dapr Resource Errors
// Description: Error types for resource parsing and validation.
// Purpose: Fail-closed error reporting for resource documents.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Errors raised while reading, parsing, rendering, or validating Dapr
//! resource documents. Variants are stable for programmatic handling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Types
// ============================================================================

/// Errors emitted by resource document operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Reading a resource file from disk failed.
    #[error("failed to read resource file {path}: {source}")]
    Io {
        /// Path of the file that could not be read.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// YAML serialization or deserialization failed.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The document violates a structural invariant.
    #[error("invalid resource: {0}")]
    Invalid(String),
}
