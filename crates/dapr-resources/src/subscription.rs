// crates/dapr-resources/src/subscription.rs
// ============================================================================
// Module: Dapr Subscription Documents
// Description: Typed model for dapr.io/v2alpha1 Subscription resources.
// Purpose: Build, parse, and validate declarative pub/sub subscriptions.
// Dependencies: serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! A [`Subscription`] declaratively routes messages from a pub/sub component
//! topic to an application endpoint. The model follows the `v2alpha1` routing
//! format: an ordered rule list plus a default route.
//! Invariants:
//! - `apiVersion` and `kind` are fixed to the Dapr Subscription values.
//! - Every route path starts with `/`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::component::ResourceMetadata;
use crate::error::ResourceError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// API version carried by every Subscription document.
pub const SUBSCRIPTION_API_VERSION: &str = "dapr.io/v2alpha1";
/// Kind carried by every Subscription document.
pub const SUBSCRIPTION_KIND: &str = "Subscription";

// ============================================================================
// SECTION: Subscription Types
// ============================================================================

/// One CEL-matched routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRule {
    /// CEL expression evaluated against the CloudEvent envelope.
    #[serde(rename = "match")]
    pub match_expr: String,
    /// Application endpoint receiving matching events.
    pub path: String,
}

/// The `spec.routes` block of a Subscription document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionRoutes {
    /// Ordered match rules, evaluated first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RouteRule>,
    /// Endpoint receiving events no rule matched.
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_route: Option<String>,
}

/// The `spec` block of a Subscription document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionSpec {
    /// Name of the pub/sub component the subscription binds to.
    pubsubname: String,
    /// Topic the subscription consumes.
    topic: String,
    /// Optional consumer metadata forwarded to the component.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
    /// Event routing table.
    routes: SubscriptionRoutes,
}

/// A `dapr.io/v2alpha1` Subscription document.
///
/// # Invariants
/// - [`Subscription::validate`] holds before the document is rendered for a
///   container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Subscription {
    /// Always [`SUBSCRIPTION_API_VERSION`].
    api_version: String,
    /// Always [`SUBSCRIPTION_KIND`].
    kind: String,
    /// Resource metadata (name).
    metadata: ResourceMetadata,
    /// Subscription specification.
    spec: SubscriptionSpec,
    /// Optional app-id scopes limiting which apps receive the subscription.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<String>,
}

impl Subscription {
    /// Creates a subscription routing every event on `topic` to `route`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        pubsub_name: impl Into<String>,
        topic: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            api_version: SUBSCRIPTION_API_VERSION.to_string(),
            kind: SUBSCRIPTION_KIND.to_string(),
            metadata: ResourceMetadata {
                name: name.into(),
            },
            spec: SubscriptionSpec {
                pubsubname: pubsub_name.into(),
                topic: topic.into(),
                metadata: BTreeMap::new(),
                routes: SubscriptionRoutes {
                    rules: Vec::new(),
                    default_route: Some(route.into()),
                },
            },
            scopes: Vec::new(),
        }
    }

    /// Appends a CEL match rule ahead of the default route.
    #[must_use]
    pub fn with_rule(mut self, match_expr: impl Into<String>, path: impl Into<String>) -> Self {
        self.spec.routes.rules.push(RouteRule {
            match_expr: match_expr.into(),
            path: path.into(),
        });
        self
    }

    /// Inserts a consumer metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.metadata.insert(name.into(), value.into());
        self
    }

    /// Appends an app-id scope.
    #[must_use]
    pub fn with_scope(mut self, app_id: impl Into<String>) -> Self {
        self.scopes.push(app_id.into());
        self
    }

    /// Returns the subscription name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the bound pub/sub component name.
    #[must_use]
    pub fn pubsub_name(&self) -> &str {
        &self.spec.pubsubname
    }

    /// Returns the consumed topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.spec.topic
    }

    /// Returns the routing table.
    #[must_use]
    pub fn routes(&self) -> &SubscriptionRoutes {
        &self.spec.routes
    }

    /// Parses a subscription from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Yaml`] on malformed YAML and
    /// [`ResourceError::Invalid`] when the document fails validation.
    pub fn from_yaml(text: &str) -> Result<Self, ResourceError> {
        let subscription: Self = serde_yaml::from_str(text)?;
        subscription.validate()?;
        Ok(subscription)
    }

    /// Reads and parses a subscription from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] when the file cannot be read, plus the
    /// errors of [`Subscription::from_yaml`].
    pub fn from_path(path: &Path) -> Result<Self, ResourceError> {
        let text = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Renders the subscription as Dapr wire-format YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Invalid`] when validation fails and
    /// [`ResourceError::Yaml`] when serialization fails.
    pub fn to_yaml(&self) -> Result<String, ResourceError> {
        self.validate()?;
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validates the structural invariants of the document.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Invalid`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.api_version != SUBSCRIPTION_API_VERSION {
            return Err(ResourceError::Invalid(format!(
                "subscription apiVersion must be {SUBSCRIPTION_API_VERSION}, got {}",
                self.api_version
            )));
        }
        if self.kind != SUBSCRIPTION_KIND {
            return Err(ResourceError::Invalid(format!(
                "subscription kind must be {SUBSCRIPTION_KIND}, got {}",
                self.kind
            )));
        }
        if self.metadata.name.trim().is_empty() {
            return Err(ResourceError::Invalid(
                "subscription name must not be empty".to_string(),
            ));
        }
        if self.spec.pubsubname.trim().is_empty() {
            return Err(ResourceError::Invalid(
                "subscription pubsubname must not be empty".to_string(),
            ));
        }
        if self.spec.topic.trim().is_empty() {
            return Err(ResourceError::Invalid(
                "subscription topic must not be empty".to_string(),
            ));
        }
        if self.spec.routes.rules.is_empty() && self.spec.routes.default_route.is_none() {
            return Err(ResourceError::Invalid(
                "subscription must declare at least one route".to_string(),
            ));
        }
        for rule in &self.spec.routes.rules {
            validate_route_path(&rule.path)?;
        }
        if let Some(route) = &self.spec.routes.default_route {
            validate_route_path(route)?;
        }
        Ok(())
    }
}

/// Checks that a route path is non-empty and absolute.
fn validate_route_path(path: &str) -> Result<(), ResourceError> {
    if !path.starts_with('/') {
        return Err(ResourceError::Invalid(format!(
            "subscription route path must start with '/', got {path}"
        )));
    }
    Ok(())
}
