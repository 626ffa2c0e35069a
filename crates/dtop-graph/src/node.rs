//! Wire-level deployment records.
//!
//! These types mirror the deployment query result:
//! `{id, name, deploymentNodes: [{id, resourceKey, features, nextNodeIds}]}`.
//! They are immutable for the duration of a render cycle and replaced
//! wholesale on refetch.

use bitflags::bitflags;
use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Capability set for a deployment node.
    ///
    /// Capabilities are additive and orthogonal, not exclusive variants:
    /// a node may have power control, a console, both, or neither.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFeatures: u8 {
        /// The node accepts power commands (on/off/reset).
        const POWER = 0b01;
        /// The node exposes a console.
        const CONSOLE = 0b10;
    }
}

impl NodeFeatures {
    /// True if the node accepts power commands.
    #[must_use]
    pub const fn has_power(self) -> bool {
        self.contains(Self::POWER)
    }

    /// True if the node exposes a console.
    #[must_use]
    pub const fn has_console(self) -> bool {
        self.contains(Self::CONSOLE)
    }
}

// The wire format is a record of booleans (`{"power": true, "console":
// false}`), not a bit pattern, so the serde impls map by hand.

#[derive(Deserialize)]
struct FeaturesWire {
    #[serde(default)]
    power: bool,
    #[serde(default)]
    console: bool,
}

impl Serialize for NodeFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("NodeFeatures", 2)?;
        s.serialize_field("power", &self.has_power())?;
        s.serialize_field("console", &self.has_console())?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for NodeFeatures {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = FeaturesWire::deserialize(deserializer)?;
        let mut features = NodeFeatures::empty();
        if wire.power {
            features |= NodeFeatures::POWER;
        }
        if wire.console {
            features |= NodeFeatures::CONSOLE;
        }
        Ok(features)
    }
}

/// One resource participating in a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentNode {
    /// Opaque unique identifier, stable across refetches.
    pub id: String,
    /// Human-readable label.
    pub resource_key: String,
    /// Capability flags.
    #[serde(default)]
    pub features: NodeFeatures,
    /// Ids this node transitions to; each entry defines a directed edge
    /// `this -> next`. Entries must reference ids present in the same
    /// deployment's node collection.
    #[serde(default)]
    pub next_node_ids: Vec<String>,
}

impl DeploymentNode {
    /// Create a node with no capabilities and no successors.
    #[must_use]
    pub fn new(id: impl Into<String>, resource_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_key: resource_key.into(),
            features: NodeFeatures::empty(),
            next_node_ids: Vec::new(),
        }
    }

    /// Set the capability flags.
    #[must_use]
    pub fn features(mut self, features: NodeFeatures) -> Self {
        self.features = features;
        self
    }

    /// Append a successor id.
    #[must_use]
    pub fn next(mut self, id: impl Into<String>) -> Self {
        self.next_node_ids.push(id.into());
        self
    }
}

/// A deployment fetch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub deployment_nodes: Vec<DeploymentNode>,
}
