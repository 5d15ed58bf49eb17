//! Reference domain model.
//!
//! # Responsibility
//! - Define carrier handles into the host object graph.
//! - Define capability contracts and the declaration-time required marker.
//!
//! # Invariants
//! - Carriers are the only persisted part of a reference.
//! - Capability views are host-owned and never persisted.

pub mod capability;
pub mod carrier;
pub mod marker;
