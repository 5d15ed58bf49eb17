//! Host object graph contract.
//!
//! # Responsibility
//! - Describe the lookups the core needs from the host: a direct capability
//!   view of one carrier, and a facet query on a carrier's node.
//!
//! # Invariants
//! - Lookups are pure queries; the core never mutates the host through them.
//! - `lookup_facet` is deterministic for an unchanged graph (first match in
//!   host attachment order).
//!
//! The graph is passed into every query instead of being stored in reference
//! types, so persisted references carry no host pointer.

pub mod memory;

use crate::model::capability::{Capability, CapabilityTag};
use crate::model::carrier::{Carrier, NodeId};

/// Host-provided capability lookups for capability `C`.
///
/// A host that supports several capabilities implements this trait once per
/// capability.
pub trait ObjectGraph<C: Capability> {
    /// Returns the capability view when `carrier` itself satisfies `C`.
    fn view(&self, carrier: &Carrier) -> Option<C::View>;

    /// Returns the first facet on `node` that satisfies `capability`.
    fn lookup_facet(&self, node: NodeId, capability: CapabilityTag) -> Option<Carrier>;
}
