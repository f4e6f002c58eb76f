//! Canonical identifier construction for catalog concepts.
//!
//! Every concept the transformation touches is addressable by a deterministic
//! identifier derived from its semantic role tuple, so repeated imports
//! resolve to the same concepts instead of fabricating new ones. Identifiers
//! are `::`-separated, path-like UTF-8 strings; empty components are elided
//! from the right (a component without a version has no trailing segment).

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a concept or fact in the hypergraph.
///
/// Ordered and hashable; sets of identifiers ([`Uids`]) iterate in
/// lexicographic order, which is what makes traversal output reproducible.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Wrap a string as an identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Uid(raw.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the empty identifier (never a valid concept address).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A one-element identifier set; most adapter operations take sets.
    pub fn singleton(&self) -> Uids {
        Uids::from([self.clone()])
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(raw: &str) -> Self {
        Uid(raw.to_owned())
    }
}

impl From<String> for Uid {
    fn from(raw: String) -> Self {
        Uid(raw)
    }
}

impl Borrow<str> for Uid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A set of identifiers.
///
/// `BTreeSet` gives the set algebra of the adapter contract (`&` intersect,
/// `|` unite, `-` subtract) plus deterministic, lexicographic iteration.
pub type Uids = BTreeSet<Uid>;

// ---------------------------------------------------------------------------
// Fixed upper concepts
// ---------------------------------------------------------------------------

/// Super-class of all domain markers (`SOFTWARE`, `COMPUTATION`, ...).
pub const DOMAIN: &str = "Domain";
/// Super-class of all component classes.
pub const COMPONENT: &str = "Component";
/// Super-class of all named component types.
pub const COMPONENT_TYPE: &str = "Component::Type";
/// Super-class of all interface classes.
pub const INTERFACE: &str = "Interface";
/// Super-class of interface direction markers.
pub const INTERFACE_DIRECTION: &str = "Interface::Direction";
/// Super-class of interface type markers.
pub const INTERFACE_TYPE: &str = "Interface::Type";
/// Super-class of domain-specific edge relation kinds.
pub const RELATION: &str = "Relation";
/// Super-class of configuration blobs.
pub const CONFIGURATION: &str = "Configuration";
/// Sub-relation of `has-a` linking an owner to its configuration.
pub const HAS_CONFIG: &str = "Relation::HasConfig";
/// Sub-relation linking an alias interface to the original it represents.
pub const ALIAS_OF: &str = "Relation::AliasOf";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Join a prefix with the given segments, eliding empty segments from the
/// right.
fn join(prefix: &str, segments: &[&str]) -> Uid {
    let keep = segments
        .iter()
        .rposition(|s| !s.is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);
    let mut uid = String::from(prefix);
    for segment in &segments[..keep] {
        uid.push_str("::");
        uid.push_str(segment);
    }
    Uid(uid)
}

/// Identifier of the domain marker `Domain::<domain>`.
pub fn domain_uid(domain: &str) -> Uid {
    join(DOMAIN, &[domain])
}

/// Identifier of the component type concept `Component::Type::<type>`.
pub fn type_uid(type_name: &str) -> Uid {
    join(COMPONENT_TYPE, &[type_name])
}

/// Identifier of a component class, versioned or not:
/// `Component::<domain>::<name>` or `Component::<domain>::<name>::<version>`.
pub fn component_uid(domain: &str, name: &str, version: &str) -> Uid {
    join(COMPONENT, &[domain, name, version])
}

/// Identifier of an interface class derived from type and direction.
///
/// Either side may be empty (`Interface::<type>` / `Interface::<direction>`);
/// both empty is invalid and yields `None`.
pub fn interface_uid(type_name: &str, direction: &str) -> Option<Uid> {
    if type_name.is_empty() && direction.is_empty() {
        return None;
    }
    let mut uid = String::from(INTERFACE);
    for segment in [type_name, direction] {
        if !segment.is_empty() {
            uid.push_str("::");
            uid.push_str(segment);
        }
    }
    Some(Uid(uid))
}

/// Identifier of a domain-specific edge relation kind `Relation::<kind>`.
pub fn relation_uid(kind: &str) -> Uid {
    join(RELATION, &[kind])
}
