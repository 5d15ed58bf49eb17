//! Capability-checked references.
//!
//! # Responsibility
//! - Resolve stored carriers to capability views with lazy caching.
//! - Gate writes on capability satisfaction and narrow accepted carriers.
//! - Classify unset and mismatched references for host rendering.
//!
//! # Invariants
//! - Reads never mutate stored carriers.
//! - Writes either fully apply (carrier and cache together) or leave state
//!   untouched.
//! - Absence is reported as `Resolution::Absent`, never as an error.

pub mod diagnostics;
pub mod error;
pub mod list;
mod resolve;
pub mod single;
