// crates/dapr-testcontainers/src/daprd.rs
// ============================================================================
// Module: Dapr Sidecar Fixture
// Description: daprd container with resource documents copied in at start.
// Purpose: Run a disposable Dapr sidecar wired to test apps and brokers.
// Dependencies: dapr-resources, testcontainers
// ============================================================================

//! ## Overview
//! [`DaprContainer`] builds a daprd sidecar: resource documents
//! ([`Component`] and [`Subscription`]) are validated, rendered to YAML, and
//! copied into the container under the resources path before daprd starts.
//! The host gateway is mapped onto `host.docker.internal` so the sidecar can
//! call application servers bound on the host.
//! Invariants:
//! - Resource names are unique per sidecar.
//! - An app channel address is required whenever an app port is set.
//! - Startup gates on the `dapr initialized` log line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::path::Path;

use dapr_resources::Component;
use dapr_resources::Subscription;
use testcontainers::ContainerAsync;
use testcontainers::GenericImage;
use testcontainers::ImageExt;
use testcontainers::core::Host;
use testcontainers::core::IntoContainerPort;
use testcontainers::core::WaitFor;
use testcontainers::runners::AsyncRunner;

use crate::docker::ensure_docker_available;
use crate::error::FixtureError;
use crate::image::ImageRef;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// In-container Dapr HTTP API port.
pub const DAPR_HTTP_PORT: u16 = 3500;
/// In-container Dapr gRPC API port.
pub const DAPR_GRPC_PORT: u16 = 50001;
/// Hostname containers use to reach servers bound on the host.
pub const HOST_GATEWAY_ALIAS: &str = "host.docker.internal";
/// Image used when no override is configured.
const DEFAULT_DAPRD_IMAGE: &str = "daprio/daprd:1.16.4";
/// Environment variable overriding the sidecar image.
const DAPRD_IMAGE_ENV: &str = "DAPR_TC_DAPRD_IMAGE";
/// In-container directory daprd loads resource documents from.
const RESOURCES_PATH: &str = "/dapr-resources";
/// Log line marking sidecar readiness.
const READY_LOG: &str = "dapr initialized";

// ============================================================================
// SECTION: Log Level
// ============================================================================

/// daprd log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaprLogLevel {
    /// Verbose debugging output.
    Debug,
    /// Standard informational output.
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
}

impl DaprLogLevel {
    /// Returns the daprd CLI spelling of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// SECTION: Sidecar Fixture
// ============================================================================

/// Builder for a daprd sidecar container.
#[derive(Debug, Clone)]
pub struct DaprContainer {
    /// Sidecar image reference.
    image: ImageRef,
    /// Dapr app id announced by the sidecar.
    app_id: String,
    /// Application HTTP port on the app channel, when set.
    app_port: Option<u16>,
    /// Hostname of the application channel, when set.
    app_channel_address: Option<String>,
    /// daprd log level, when overridden.
    log_level: Option<DaprLogLevel>,
    /// Whether Dapr API call logging is enabled.
    api_logging: bool,
    /// Docker network to attach to, when set.
    network: Option<String>,
    /// Component documents copied in before start.
    components: Vec<Component>,
    /// Subscription documents copied in before start.
    subscriptions: Vec<Subscription>,
}

impl DaprContainer {
    /// Creates a fixture from a `repository:tag` image string.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] for malformed image strings.
    pub fn new(image: &str) -> Result<Self, FixtureError> {
        Ok(Self {
            image: ImageRef::parse(image)?,
            app_id: "dapr-test-app".to_string(),
            app_port: None,
            app_channel_address: None,
            log_level: None,
            api_logging: false,
            network: None,
            components: Vec::new(),
            subscriptions: Vec::new(),
        })
    }

    /// Creates a fixture from `DAPR_TC_DAPRD_IMAGE` or the default image.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] when the override is malformed.
    pub fn from_env() -> Result<Self, FixtureError> {
        let image = env::var(DAPRD_IMAGE_ENV).unwrap_or_else(|_| DEFAULT_DAPRD_IMAGE.to_string());
        Self::new(&image)
    }

    /// Sets the Dapr app id.
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Sets the application port on the app channel.
    #[must_use]
    pub fn with_app_port(mut self, port: u16) -> Self {
        self.app_port = Some(port);
        self
    }

    /// Sets the application channel hostname, commonly
    /// [`HOST_GATEWAY_ALIAS`] for apps bound on the host.
    #[must_use]
    pub fn with_app_channel_address(mut self, address: impl Into<String>) -> Self {
        self.app_channel_address = Some(address.into());
        self
    }

    /// Overrides the daprd log level.
    #[must_use]
    pub fn with_log_level(mut self, level: DaprLogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Enables or disables Dapr API call logging.
    #[must_use]
    pub fn with_api_logging(mut self, enabled: bool) -> Self {
        self.api_logging = enabled;
        self
    }

    /// Attaches the sidecar to a Docker network.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Adds a component document.
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Parses a component document from a YAML file and adds it.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Resource`] when the file is missing,
    /// malformed, or fails validation.
    pub fn with_component_from_path(mut self, path: &Path) -> Result<Self, FixtureError> {
        self.components.push(Component::from_path(path)?);
        Ok(self)
    }

    /// Adds a declarative subscription document.
    #[must_use]
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    /// Returns the component documents added so far.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns the subscription documents added so far.
    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Assembles the daprd argument vector.
    pub(crate) fn command(&self) -> Vec<String> {
        let mut args = vec![
            "--app-id".to_string(),
            self.app_id.clone(),
            "--dapr-http-port".to_string(),
            DAPR_HTTP_PORT.to_string(),
            "--dapr-grpc-port".to_string(),
            DAPR_GRPC_PORT.to_string(),
            "--dapr-listen-addresses".to_string(),
            "0.0.0.0".to_string(),
            "--resources-path".to_string(),
            RESOURCES_PATH.to_string(),
        ];
        if let Some(port) = self.app_port {
            args.push("--app-port".to_string());
            args.push(port.to_string());
        }
        if let Some(address) = &self.app_channel_address {
            args.push("--app-channel-address".to_string());
            args.push(address.clone());
        }
        if let Some(level) = self.log_level {
            args.push("--log-level".to_string());
            args.push(level.as_str().to_string());
        }
        if self.api_logging {
            args.push("--enable-api-logging".to_string());
        }
        args
    }

    /// Validates and renders all resource documents as
    /// `(container path, yaml)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Invalid`] for duplicate resource names or a
    /// missing app channel address, and [`FixtureError::Resource`] when a
    /// document fails validation.
    pub(crate) fn resource_documents(&self) -> Result<Vec<(String, String)>, FixtureError> {
        if self.app_id.trim().is_empty() {
            return Err(FixtureError::Invalid("app id must not be empty".to_string()));
        }
        if self.app_port.is_some() && self.app_channel_address.is_none() {
            return Err(FixtureError::Invalid(
                "an app channel address is required when an app port is set".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        let mut documents = Vec::new();
        for component in &self.components {
            if !seen.insert(component.name().to_string()) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate resource name: {}",
                    component.name()
                )));
            }
            documents
                .push((format!("{RESOURCES_PATH}/{}.yaml", component.name()), component.to_yaml()?));
        }
        for subscription in &self.subscriptions {
            if !seen.insert(subscription.name().to_string()) {
                return Err(FixtureError::Invalid(format!(
                    "duplicate resource name: {}",
                    subscription.name()
                )));
            }
            documents.push((
                format!("{RESOURCES_PATH}/{}.yaml", subscription.name()),
                subscription.to_yaml()?,
            ));
        }
        Ok(documents)
    }

    /// Starts the sidecar and waits for its ready log line.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when Docker is unavailable, a resource
    /// document is invalid, or the container fails to start.
    pub async fn start(self) -> Result<StartedDaprContainer, FixtureError> {
        ensure_docker_available()?;
        let documents = self.resource_documents()?;

        let image = GenericImage::new(self.image.repository(), self.image.tag())
            .with_exposed_port(DAPR_HTTP_PORT.tcp())
            .with_exposed_port(DAPR_GRPC_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout(READY_LOG));

        let mut request = image
            .with_cmd(self.command())
            .with_host(HOST_GATEWAY_ALIAS, Host::HostGateway);
        for (target, yaml) in documents {
            request = request.with_copy_to(target, yaml.into_bytes());
        }
        if let Some(network) = &self.network {
            request = request.with_network(network);
        }

        let container = request.start().await?;
        let host = container.get_host().await?.to_string();
        let http_port = container.get_host_port_ipv4(DAPR_HTTP_PORT.tcp()).await?;
        let grpc_port = container.get_host_port_ipv4(DAPR_GRPC_PORT.tcp()).await?;
        Ok(StartedDaprContainer {
            container,
            host,
            http_port,
            grpc_port,
        })
    }
}

// ============================================================================
// SECTION: Started Handle
// ============================================================================

/// A running daprd sidecar container.
pub struct StartedDaprContainer {
    /// Underlying container handle; dropped containers are cleaned up.
    container: ContainerAsync<GenericImage>,
    /// Host address the Dapr HTTP API is reachable on.
    host: String,
    /// Mapped host port of the Dapr HTTP API.
    http_port: u16,
    /// Mapped host port of the Dapr gRPC API.
    grpc_port: u16,
}

impl StartedDaprContainer {
    /// Returns the container id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.container.id()
    }

    /// Returns the host address of the Dapr HTTP API.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the mapped host port of the Dapr HTTP API.
    #[must_use]
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Returns the mapped host port of the Dapr gRPC API.
    #[must_use]
    pub fn grpc_port(&self) -> u16 {
        self.grpc_port
    }

    /// Stops the sidecar container.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Container`] when the runtime refuses the stop.
    pub async fn stop(&self) -> Result<(), FixtureError> {
        self.container.stop().await?;
        Ok(())
    }
}
