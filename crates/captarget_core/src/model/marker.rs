//! Declaration-time "required" marker.
//!
//! The marker is attached to a field declaration, not to a reference
//! instance. Hosts keep it next to the field (for example in a `const`) and
//! pass it to `diagnose`. A field declared without a marker is optional.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequiredMarker {
    pub is_required: bool,
}

impl RequiredMarker {
    pub const REQUIRED: Self = Self::new(true);
    pub const OPTIONAL: Self = Self::new(false);

    pub const fn new(is_required: bool) -> Self {
        Self { is_required }
    }

    /// Requirement for a declaration that may or may not carry a marker.
    pub fn applies(marker: Option<RequiredMarker>) -> bool {
        marker.is_some_and(|marker| marker.is_required)
    }
}

impl Default for RequiredMarker {
    fn default() -> Self {
        Self::REQUIRED
    }
}

#[cfg(test)]
mod tests {
    use super::RequiredMarker;

    #[test]
    fn default_marker_is_required() {
        assert!(RequiredMarker::default().is_required);
    }

    #[test]
    fn missing_marker_means_optional() {
        assert!(!RequiredMarker::applies(None));
        assert!(!RequiredMarker::applies(Some(RequiredMarker::OPTIONAL)));
        assert!(RequiredMarker::applies(Some(RequiredMarker::REQUIRED)));
    }
}
