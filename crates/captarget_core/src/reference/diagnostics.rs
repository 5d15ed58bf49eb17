//! Host-facing classification of reference problems.
//!
//! The core reports what is wrong; deciding whether that blocks anything
//! (error box, warning, nothing) stays with the host.

use crate::model::capability::CapabilityTag;
use std::fmt::{Display, Formatter};

/// Problem with a single reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefIssue {
    /// Required reference is unset.
    Missing,
    /// Reference is set but resolves to nothing satisfying `capability`.
    Mismatch { capability: CapabilityTag },
}

impl Display for RefIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "This field is required"),
            Self::Mismatch { capability } => write!(f, "Target must implement {capability}"),
        }
    }
}

/// Problems with a reference list, by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListIssue {
    pub capability: CapabilityTag,
    /// Whether the declaration carried an active required marker.
    pub required: bool,
    /// Positions of unset entries (reported only for required lists).
    pub missing: Vec<usize>,
    /// Positions of set entries that do not resolve.
    pub mismatched: Vec<usize>,
}

impl ListIssue {
    pub(crate) fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

impl Display for ListIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.required {
            write!(
                f,
                "All targets must implement {} and cannot be empty",
                self.capability
            )
        } else {
            write!(
                f,
                "All non-empty targets must implement {}",
                self.capability
            )
        }
    }
}
