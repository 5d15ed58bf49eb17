//! Capability-checked object references for inspector hosts.
//!
//! A reference stores an opaque carrier into a host object graph and resolves
//! it, on demand and with caching, to a view of an object that provides a
//! required capability. The host supplies graph lookups; the core owns
//! validation, narrowing, cache coherence and classification.

pub mod config;
pub mod graph;
pub mod logging;
pub mod model;
pub mod reference;

pub use config::{default_log_level, ConfigError, CoreConfig, LoggingConfig};
pub use graph::memory::{GraphError, MemoryGraph};
pub use graph::ObjectGraph;
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::capability::{Capability, CapabilityTag};
pub use model::carrier::{Carrier, CarrierKind, NodeId, ObjectId};
pub use model::marker::RequiredMarker;
pub use reference::diagnostics::{ListIssue, RefIssue};
pub use reference::error::{RefError, RefResult, Resolution};
pub use reference::list::CapabilityRefList;
pub use reference::single::SingleCapabilityRef;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
