//! The component-catalog document format.
//!
//! A document describes one component per file: the (domain, type, name) key
//! plus a list of versions, each carrying sub-components, edges,
//! configuration blobs and interfaces. Serialization is YAML via serde; the
//! wire keys are camelCase (`defaultConfiguration`, `linkToNode`).
//!
//! Parsing is deliberately lenient: the required top-level fields
//! deserialize to their empty defaults so the import engine can report them
//! as missing instead of failing the whole parse, and every optional section
//! is a plain `Option`/empty list.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// An edge `type` with this value (or no `type` at all) marks an
/// interface-to-interface connection rather than an inter-domain relation.
pub const TYPE_NOT_SET: &str = "NOT_SET";

/// Top-level component document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub domain: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub name: String,
    /// `None` distinguishes a missing `versions` key from an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<VersionEntry>>,
}

/// One version of a component model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<ConfigEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentsSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<InterfaceEntry>,
}

/// The network of sub-components within one version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentsSection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ConfigSection>,
}

/// A sub-component: a locally named instance of some other model version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub name: String,
    pub model: ModelRef,
}

/// Reference to the model a sub-component instantiates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRef {
    pub name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub version: String,
}

/// An edge between two sub-components.
///
/// With a `type`, the edge is a fact of the named relation kind between the
/// components themselves. Without one (or with [`TYPE_NOT_SET`]), it connects
/// two interfaces and both endpoints must name one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<EndpointEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<EndpointEntry>,
}

impl EdgeEntry {
    /// Whether this edge is an inter-domain relation rather than an
    /// interface connection.
    pub fn is_inter_domain(&self) -> bool {
        self.type_name.as_deref().is_some_and(|t| t != TYPE_NOT_SET)
    }
}

/// One side of an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

/// Configuration blobs keyed by node or edge name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<ConfigEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<ConfigEntry>,
}

/// An opaque configuration blob attached to a named owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    #[serde(default)]
    pub data: String,
}

/// An interface of a version, plain or aliasing a sub-component's interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_to_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_to_interface: Option<String>,
}

impl InterfaceEntry {
    /// An interface aliases a sub-component interface when both link fields
    /// are present and non-empty.
    pub fn alias_target(&self) -> Option<(&str, &str)> {
        match (self.link_to_node.as_deref(), self.link_to_interface.as_deref()) {
            (Some(node), Some(iface)) if !node.is_empty() && !iface.is_empty() => {
                Some((node, iface))
            }
            _ => None,
        }
    }
}

impl Document {
    /// Parse a document from its YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ModelError> {
        serde_yaml::from_str(text).map_err(|source| ModelError::ParseDocument { source })
    }

    /// Serialize the document to YAML text.
    pub fn to_yaml(&self) -> Result<String, ModelError> {
        serde_yaml::to_string(self).map_err(|source| ModelError::SerializeDocument { source })
    }
}
