//! Capability contracts that references are checked against.

use std::fmt::{Display, Formatter};

/// Stable name used to query a host graph for facets of one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityTag(&'static str);

impl CapabilityTag {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for CapabilityTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A named contract an object may satisfy directly or through an attached facet.
///
/// `View` is the capability-typed handle the host hands out for a satisfying
/// object, usually an `Rc<dyn Trait>` or a cheap value. The core clones it out
/// of its cache and never assumes it outlives host state.
///
/// ```ignore
/// struct Damageable;
///
/// impl Capability for Damageable {
///     const NAME: &'static str = "damageable";
///     type View = Rc<dyn DamageReceiver>;
/// }
/// ```
pub trait Capability: 'static {
    /// Tag passed to `ObjectGraph::lookup_facet`.
    const NAME: &'static str;
    type View: Clone;

    fn tag() -> CapabilityTag {
        CapabilityTag::new(Self::NAME)
    }
}
