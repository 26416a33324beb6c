// crates/dapr-resources/src/lib.rs
// ============================================================================
// Module: Dapr Resources Library
// Description: Typed Dapr self-hosted resource documents with YAML support.
// Purpose: Build, parse, and validate Component and Subscription documents.
// Dependencies: serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! `dapr-resources` models the YAML resource documents a daprd sidecar loads
//! from its resources path: [`Component`] (`dapr.io/v1alpha1`) and
//! [`Subscription`] (`dapr.io/v2alpha1`). Documents are built
//! programmatically or parsed from fixture files, validated fail-closed, and
//! rendered back to the Dapr wire format.
//! Invariants:
//! - Serialization round-trips losslessly for every valid document.
//! - Documents that fail [`Component::validate`] or
//!   [`Subscription::validate`] are never handed to a container.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod component;
pub mod error;
pub mod subscription;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use component::Component;
pub use component::ComponentAuth;
pub use component::ComponentSpec;
pub use component::MetadataEntry;
pub use error::ResourceError;
pub use subscription::RouteRule;
pub use subscription::Subscription;
pub use subscription::SubscriptionRoutes;
pub use subscription::SubscriptionSpec;
