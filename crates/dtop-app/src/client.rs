//! Deployment data and mutation transport.
//!
//! The application consumes two operations behind one trait: a query for
//! the deployment document and a mutation that requests a node power
//! state. Implementations here are local (a built-in fixture and a JSON
//! file); both run inside `Cmd::task` closures, so blocking is fine.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use tracing::info;

use dtop_graph::{Deployment, DeploymentNode, NodeFeatures};

use crate::power::PowerState;

/// Transport failure with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub message: String,
}

impl ClientError {
    /// Create an error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClientError {}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Query and mutation surface for one deployment backend.
pub trait DeploymentClient {
    /// Fetch the deployment document.
    fn fetch_deployment(&self, id: &str) -> Result<Deployment, ClientError>;

    /// Request a power state for one node. The boolean is the remote
    /// "applied" result; `Ok(false)` means the command completed but was
    /// not applied.
    fn set_node_power(&self, node_id: &str, state: PowerState) -> Result<bool, ClientError>;
}

/// Scripted mutation behavior for [`StaticClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerBehavior {
    /// Report the command as applied.
    Applied,
    /// Complete but report not applied (soft failure).
    Rejected,
    /// Fail with a message.
    Fail(String),
}

/// In-memory client serving a fixed deployment.
///
/// Used for the standalone demo and for tests; latency and outcomes are
/// configurable, and mutation calls are counted.
#[derive(Debug)]
pub struct StaticClient {
    deployment: Deployment,
    latency: Duration,
    fetch_error: Option<String>,
    power: PowerBehavior,
    power_calls: AtomicUsize,
}

impl StaticClient {
    /// Serve the built-in demo deployment.
    #[must_use]
    pub fn demo(latency: Duration) -> Self {
        Self::with_deployment(demo_deployment(), latency)
    }

    /// Serve an explicit deployment.
    #[must_use]
    pub fn with_deployment(deployment: Deployment, latency: Duration) -> Self {
        Self {
            deployment,
            latency,
            fetch_error: None,
            power: PowerBehavior::Applied,
            power_calls: AtomicUsize::new(0),
        }
    }

    /// Make every fetch fail with the given message.
    #[must_use]
    pub fn failing_fetch(mut self, message: impl Into<String>) -> Self {
        self.fetch_error = Some(message.into());
        self
    }

    /// Script the mutation outcome.
    #[must_use]
    pub fn power_behavior(mut self, behavior: PowerBehavior) -> Self {
        self.power = behavior;
        self
    }

    /// Number of mutation calls issued so far.
    #[must_use]
    pub fn power_call_count(&self) -> usize {
        self.power_calls.load(Ordering::SeqCst)
    }
}

impl DeploymentClient for StaticClient {
    fn fetch_deployment(&self, id: &str) -> Result<Deployment, ClientError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        if let Some(message) = &self.fetch_error {
            return Err(ClientError::new(message.clone()));
        }
        info!(%id, "serving fixture deployment");
        Ok(self.deployment.clone())
    }

    fn set_node_power(&self, node_id: &str, state: PowerState) -> Result<bool, ClientError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        self.power_calls.fetch_add(1, Ordering::SeqCst);
        info!(%node_id, %state, "power command issued");
        match &self.power {
            PowerBehavior::Applied => Ok(true),
            PowerBehavior::Rejected => Ok(false),
            PowerBehavior::Fail(message) => Err(ClientError::new(message.clone())),
        }
    }
}

/// Client reading a deployment document from a JSON file.
///
/// The document shape matches the query result:
/// `{id, name, deploymentNodes: [...]}`. Mutations are acknowledged
/// locally since there is no live backend behind a file.
#[derive(Debug)]
pub struct FileClient {
    path: PathBuf,
    latency: Duration,
}

impl FileClient {
    /// Create a client over the given document path.
    #[must_use]
    pub fn new(path: PathBuf, latency: Duration) -> Self {
        Self { path, latency }
    }
}

impl DeploymentClient for FileClient {
    fn fetch_deployment(&self, _id: &str) -> Result<Deployment, ClientError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let raw = fs::read_to_string(&self.path)?;
        let deployment = serde_json::from_str(&raw)?;
        Ok(deployment)
    }

    fn set_node_power(&self, node_id: &str, state: PowerState) -> Result<bool, ClientError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        info!(%node_id, %state, "power command acknowledged locally");
        Ok(true)
    }
}

/// The built-in demo deployment: a small rack with a mixed capability set.
#[must_use]
pub fn demo_deployment() -> Deployment {
    let nodes = vec![
        DeploymentNode::new("gw-0", "edge-gateway")
            .features(NodeFeatures::POWER | NodeFeatures::CONSOLE)
            .next("sw-0"),
        DeploymentNode::new("sw-0", "core-switch")
            .features(NodeFeatures::CONSOLE)
            .next("srv-0")
            .next("srv-1")
            .next("pdu-0"),
        DeploymentNode::new("srv-0", "compute-01")
            .features(NodeFeatures::POWER | NodeFeatures::CONSOLE)
            .next("nas-0"),
        DeploymentNode::new("srv-1", "compute-02")
            .features(NodeFeatures::POWER | NodeFeatures::CONSOLE)
            .next("nas-0"),
        DeploymentNode::new("nas-0", "storage-01").features(NodeFeatures::POWER),
        DeploymentNode::new("pdu-0", "rack-pdu"),
    ];
    Deployment {
        id: "demo".into(),
        name: "edge-rack-12".into(),
        deployment_nodes: nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn demo_deployment_is_well_formed() {
        let dep = demo_deployment();
        assert!(dtop_graph::build_graph(&dep.deployment_nodes).is_ok());
        assert!(
            dep.deployment_nodes
                .iter()
                .any(|n| !n.features.has_power()),
            "fixture needs a node without power control"
        );
    }

    #[test]
    fn static_client_serves_fixture() {
        let client = StaticClient::demo(Duration::ZERO);
        let dep = client.fetch_deployment("demo").unwrap();
        assert_eq!(dep.name, "edge-rack-12");
    }

    #[test]
    fn static_client_failure_injection() {
        let client = StaticClient::demo(Duration::ZERO).failing_fetch("network down");
        let err = client.fetch_deployment("demo").unwrap_err();
        assert_eq!(err.message, "network down");
    }

    #[test]
    fn static_client_counts_power_calls() {
        let client = StaticClient::demo(Duration::ZERO);
        assert_eq!(client.power_call_count(), 0);
        assert_eq!(client.set_node_power("srv-0", PowerState::On), Ok(true));
        assert_eq!(client.power_call_count(), 1);
    }

    #[test]
    fn static_client_scripted_outcomes() {
        let rejected = StaticClient::demo(Duration::ZERO).power_behavior(PowerBehavior::Rejected);
        assert_eq!(rejected.set_node_power("x", PowerState::Off), Ok(false));

        let failing = StaticClient::demo(Duration::ZERO)
            .power_behavior(PowerBehavior::Fail("bmc timeout".into()));
        let err = failing.set_node_power("x", PowerState::Reset).unwrap_err();
        assert_eq!(err.message, "bmc timeout");
    }

    #[test]
    fn file_client_parses_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"id":"d1","name":"lab","deploymentNodes":[
                {{"id":"a","resourceKey":"srv","features":{{"power":true,"console":false}},"nextNodeIds":[]}}
            ]}}"#
        )
        .unwrap();
        let client = FileClient::new(file.path().to_path_buf(), Duration::ZERO);
        let dep = client.fetch_deployment("d1").unwrap();
        assert_eq!(dep.name, "lab");
        assert!(dep.deployment_nodes[0].features.has_power());
    }

    #[test]
    fn file_client_missing_file_errors() {
        let client = FileClient::new(PathBuf::from("/nonexistent/dep.json"), Duration::ZERO);
        assert!(client.fetch_deployment("d1").is_err());
    }
}
