//! Reference outcome types.

use crate::model::capability::CapabilityTag;
use crate::model::carrier::ObjectId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RefResult<T> = Result<T, RefError>;

/// Rejected reference writes.
///
/// Both variants are local to the failed call: the reference keeps its prior
/// state and stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefError {
    /// Neither the candidate nor any facet on its node satisfies `capability`.
    CapabilityMismatch {
        capability: CapabilityTag,
        object: ObjectId,
    },
    /// List edit addressed a position outside `0..len` (or `0..=len` for inserts).
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for RefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapabilityMismatch { capability, object } => {
                write!(f, "object {object} does not provide capability `{capability}`")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for list of length {len}")
            }
        }
    }
}

impl Error for RefError {}

/// Outcome of resolving one reference.
///
/// `Absent` is not a failure: it is an unset reference, kept apart from
/// `Mismatch` so hosts can render "unset" and "wrong type" differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<V> {
    Absent,
    Resolved(V),
    Mismatch,
}

impl<V> Resolution<V> {
    pub fn ok(self) -> Option<V> {
        match self {
            Self::Resolved(view) => Some(view),
            Self::Absent | Self::Mismatch => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch)
    }
}
