//! Carrier handles into the host object graph.
//!
//! # Responsibility
//! - Identify one host-managed object and the graph node it belongs to.
//! - Define the persisted wire shape of a reference target.
//!
//! # Invariants
//! - `object` is stable for the lifetime of the host object.
//! - A `Node` carrier is its own node: `object` and `node` share one UUID.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identity of one host object (node or facet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a graph node that facets attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape of the object a carrier points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierKind {
    /// Component-like object attached to a node.
    Facet,
    /// Container-like object: the node itself.
    Node,
}

/// Opaque handle to a host-managed object.
///
/// Only this value is persisted by reference types. Anything derived from it
/// (resolved capability views) is recomputed after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Carrier {
    /// Identity of the referenced object.
    pub object: ObjectId,
    /// Node the object is attached to (or is, for `CarrierKind::Node`).
    pub node: NodeId,
    pub kind: CarrierKind,
}

impl Carrier {
    /// Handle to a facet attached to `node`.
    pub fn facet(object: ObjectId, node: NodeId) -> Self {
        Self {
            object,
            node,
            kind: CarrierKind::Facet,
        }
    }

    /// Handle to a node itself.
    pub fn node(node: NodeId) -> Self {
        Self {
            object: ObjectId::from_uuid(node.as_uuid()),
            node,
            kind: CarrierKind::Node,
        }
    }

    pub fn is_node(&self) -> bool {
        self.kind == CarrierKind::Node
    }
}
