// crates/dapr-resources/src/component.rs
// ============================================================================
// Module: Dapr Component Documents
// Description: Typed model for dapr.io/v1alpha1 Component resources.
// Purpose: Build, parse, and validate pluggable-component definitions.
// Dependencies: serde, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! A [`Component`] describes one Dapr building block instance (for example a
//! `pubsub.kafka` component) in the self-hosted resource format. Field names
//! follow the Dapr wire format (`apiVersion`, camel-cased keys); unknown
//! fields are rejected so fixture typos fail fast.
//! Invariants:
//! - `apiVersion` and `kind` are fixed to the Dapr Component values.
//! - Metadata values are strings on the wire; non-string scalars must be
//!   quoted in YAML sources.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ResourceError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// API version carried by every Component document.
pub const COMPONENT_API_VERSION: &str = "dapr.io/v1alpha1";
/// Kind carried by every Component document.
pub const COMPONENT_KIND: &str = "Component";

// ============================================================================
// SECTION: Component Types
// ============================================================================

/// Resource metadata block shared by Dapr documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ResourceMetadata {
    /// Resource name, unique within a resources directory.
    pub(crate) name: String,
}

/// One name/value pair in a component's `spec.metadata` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataEntry {
    /// Metadata key, as documented by the component type.
    pub name: String,
    /// Metadata value; always a string on the wire.
    pub value: String,
}

/// The `auth` block referencing the secret store backing `secretKeyRef`
/// metadata entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ComponentAuth {
    /// Name of the secret store component.
    pub secret_store: String,
}

/// The `spec` block of a Component document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    /// Component type, for example `pubsub.kafka`.
    #[serde(rename = "type")]
    pub component_type: String,
    /// Component type version, usually `v1`.
    pub version: String,
    /// Component configuration entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataEntry>,
}

/// A `dapr.io/v1alpha1` Component document.
///
/// # Invariants
/// - [`Component::validate`] holds before the document is rendered for a
///   container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Component {
    /// Always [`COMPONENT_API_VERSION`].
    api_version: String,
    /// Always [`COMPONENT_KIND`].
    kind: String,
    /// Resource metadata (name).
    metadata: ResourceMetadata,
    /// Component specification.
    spec: ComponentSpec,
    /// Optional secret store reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth: Option<ComponentAuth>,
    /// Optional app-id scopes limiting which apps load the component.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<String>,
}

impl Component {
    /// Creates a component with an empty metadata list.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        component_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            api_version: COMPONENT_API_VERSION.to_string(),
            kind: COMPONENT_KIND.to_string(),
            metadata: ResourceMetadata {
                name: name.into(),
            },
            spec: ComponentSpec {
                component_type: component_type.into(),
                version: version.into(),
                metadata: Vec::new(),
            },
            auth: None,
            scopes: Vec::new(),
        }
    }

    /// Sets the secret store backing `secretKeyRef` metadata entries.
    #[must_use]
    pub fn with_secret_store(mut self, secret_store: impl Into<String>) -> Self {
        self.auth = Some(ComponentAuth {
            secret_store: secret_store.into(),
        });
        self
    }

    /// Appends a `spec.metadata` entry.
    #[must_use]
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.metadata.push(MetadataEntry {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Appends an app-id scope.
    #[must_use]
    pub fn with_scope(mut self, app_id: impl Into<String>) -> Self {
        self.scopes.push(app_id.into());
        self
    }

    /// Replaces the value of a metadata entry, appending it when absent.
    pub fn set_metadata(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.spec.metadata.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.value = value,
            None => self.spec.metadata.push(MetadataEntry {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Returns the value of a metadata entry when present.
    #[must_use]
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.spec
            .metadata
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the component spec.
    #[must_use]
    pub fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    /// Returns the secret store reference when present.
    #[must_use]
    pub fn secret_store(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.secret_store.as_str())
    }

    /// Returns the app-id scopes.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Parses a component from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Yaml`] on malformed YAML and
    /// [`ResourceError::Invalid`] when the document fails validation.
    pub fn from_yaml(text: &str) -> Result<Self, ResourceError> {
        let component: Self = serde_yaml::from_str(text)?;
        component.validate()?;
        Ok(component)
    }

    /// Reads and parses a component from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] when the file cannot be read, plus the
    /// errors of [`Component::from_yaml`].
    pub fn from_path(path: &Path) -> Result<Self, ResourceError> {
        let text = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Renders the component as Dapr wire-format YAML.
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
        if self.api_version != COMPONENT_API_VERSION {
            return Err(ResourceError::Invalid(format!(
                "component apiVersion must be {COMPONENT_API_VERSION}, got {}",
                self.api_version
            )));
        }
        if self.kind != COMPONENT_KIND {
            return Err(ResourceError::Invalid(format!(
                "component kind must be {COMPONENT_KIND}, got {}",
                self.kind
            )));
        }
        if self.metadata.name.trim().is_empty() {
            return Err(ResourceError::Invalid("component name must not be empty".to_string()));
        }
        if self.spec.component_type.trim().is_empty() {
            return Err(ResourceError::Invalid("component type must not be empty".to_string()));
        }
        if self.spec.version.trim().is_empty() {
            return Err(ResourceError::Invalid("component version must not be empty".to_string()));
        }
        for entry in &self.spec.metadata {
            if entry.name.trim().is_empty() {
                return Err(ResourceError::Invalid(
                    "component metadata entry name must not be empty".to_string(),
                ));
            }
        }
        if let Some(auth) = &self.auth
            && auth.secret_store.trim().is_empty()
        {
            return Err(ResourceError::Invalid(
                "component auth secretStore must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
