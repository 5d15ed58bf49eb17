//! In-memory host graph.
//!
//! # Responsibility
//! - Provide a self-contained `ObjectGraph` for the CLI and tests.
//! - Model nodes with ordered facets, each implementing any set of capabilities.
//!
//! # Invariants
//! - Facet order on a node is attachment order; `lookup_facet` returns the
//!   first facet implementing the requested tag with the capability's `View`
//!   type, so capabilities sharing a `NAME` do not shadow each other.
//! - A node carrier and its node share one identity.

use crate::graph::ObjectGraph;
use crate::model::capability::{Capability, CapabilityTag};
use crate::model::carrier::{Carrier, NodeId, ObjectId};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// In-memory graph mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    UnknownNode(NodeId),
    UnknownObject(ObjectId),
    NotAFacet(ObjectId),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "node not found: {id}"),
            Self::UnknownObject(id) => write!(f, "object not found: {id}"),
            Self::NotAFacet(id) => write!(f, "object is a node, not a facet: {id}"),
        }
    }
}

impl Error for GraphError {}

struct NodeEntry {
    name: String,
    facets: Vec<ObjectId>,
}

struct ObjectEntry {
    carrier: Carrier,
    views: HashMap<&'static str, Box<dyn Any>>,
}

/// Node/facet graph held entirely in memory.
#[derive(Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<NodeId, NodeEntry>,
    objects: HashMap<ObjectId, ObjectEntry>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty node and returns its node carrier.
    pub fn add_node(&mut self, name: impl Into<String>) -> Carrier {
        let carrier = Carrier::node(NodeId::new());
        self.nodes.insert(
            carrier.node,
            NodeEntry {
                name: name.into(),
                facets: Vec::new(),
            },
        );
        self.objects.insert(
            carrier.object,
            ObjectEntry {
                carrier,
                views: HashMap::new(),
            },
        );
        carrier
    }

    /// Attaches a new facet to the node behind `node` and returns its carrier.
    pub fn add_facet(&mut self, node: &Carrier) -> Result<Carrier, GraphError> {
        let entry = self
            .nodes
            .get_mut(&node.node)
            .ok_or(GraphError::UnknownNode(node.node))?;
        let carrier = Carrier::facet(ObjectId::new(), node.node);
        entry.facets.push(carrier.object);
        self.objects.insert(
            carrier.object,
            ObjectEntry {
                carrier,
                views: HashMap::new(),
            },
        );
        Ok(carrier)
    }

    /// Declares that `carrier` satisfies `C`, exposing `view` for it.
    ///
    /// Re-implementing a capability replaces the previous view.
    pub fn implement<C>(&mut self, carrier: &Carrier, view: C::View) -> Result<(), GraphError>
    where
        C: Capability,
        C::View: 'static,
    {
        let entry = self
            .objects
            .get_mut(&carrier.object)
            .ok_or(GraphError::UnknownObject(carrier.object))?;
        entry.views.insert(C::NAME, Box::new(view));
        Ok(())
    }

    /// Removes a facet from its node. Node carriers cannot be detached.
    pub fn detach(&mut self, facet: &Carrier) -> Result<(), GraphError> {
        if !self.objects.contains_key(&facet.object) {
            return Err(GraphError::UnknownObject(facet.object));
        }
        if facet.is_node() {
            return Err(GraphError::NotAFacet(facet.object));
        }
        if let Some(node) = self.nodes.get_mut(&facet.node) {
            node.facets.retain(|id| *id != facet.object);
        }
        self.objects.remove(&facet.object);
        Ok(())
    }

    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|entry| entry.name.as_str())
    }

    /// Returns facet carriers of one node in attachment order.
    pub fn facets_of(&self, node: NodeId) -> Vec<Carrier> {
        let Some(entry) = self.nodes.get(&node) else {
            return vec![];
        };
        entry
            .facets
            .iter()
            .filter_map(|id| self.objects.get(id))
            .map(|object| object.carrier)
            .collect()
    }
}

impl<C> ObjectGraph<C> for MemoryGraph
where
    C: Capability,
    C::View: 'static,
{
    fn view(&self, carrier: &Carrier) -> Option<C::View> {
        self.objects
            .get(&carrier.object)?
            .views
            .get(C::NAME)?
            .downcast_ref::<C::View>()
            .cloned()
    }

    fn lookup_facet(&self, node: NodeId, capability: CapabilityTag) -> Option<Carrier> {
        self.nodes
            .get(&node)?
            .facets
            .iter()
            .filter_map(|id| self.objects.get(id))
            .find(|object| {
                object
                    .views
                    .get(capability.as_str())
                    .is_some_and(|view| view.is::<C::View>())
            })
            .map(|object| object.carrier)
    }
}
