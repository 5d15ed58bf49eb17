//! Single capability-checked reference.
//!
//! # Responsibility
//! - Hold one optional carrier and resolve it to a capability view on demand.
//! - Accept only carriers that satisfy the capability, narrowing them to the
//!   satisfying facet before storing.
//!
//! # Invariants
//! - A filled cache is the resolution of the current carrier (including a
//!   cached "no match").
//! - The cache is never filled while the carrier is absent.
//! - Every successful write replaces the cache in the same call.
//! - Only the carrier is persisted; deserialized values start uncached.

use crate::graph::ObjectGraph;
use crate::model::capability::Capability;
use crate::model::carrier::Carrier;
use crate::model::marker::RequiredMarker;
use crate::reference::diagnostics::RefIssue;
use crate::reference::error::{RefResult, Resolution};
use crate::reference::resolve::{check_candidate, narrow, resolve_carrier};
use log::debug;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Reference to one object that must provide capability `C`.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SingleCapabilityRef<C: Capability> {
    carrier: Option<Carrier>,
    #[serde(skip)]
    cache: OnceCell<Option<C::View>>,
    #[serde(skip)]
    capability: PhantomData<fn() -> C>,
}

impl<C: Capability> SingleCapabilityRef<C> {
    /// Creates an unset reference.
    pub fn new() -> Self {
        Self {
            carrier: None,
            cache: OnceCell::new(),
            capability: PhantomData,
        }
    }

    /// Creates a reference already pointing at `candidate`.
    ///
    /// # Errors
    /// - `RefError::CapabilityMismatch` when nothing reachable from
    ///   `candidate` satisfies `C`.
    pub fn with_carrier<G>(graph: &G, candidate: Carrier) -> RefResult<Self>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let mut reference = Self::new();
        reference.set_carrier(graph, Some(candidate))?;
        Ok(reference)
    }

    /// Stored carrier, for display binding.
    pub fn carrier(&self) -> Option<&Carrier> {
        self.carrier.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.carrier.is_some()
    }

    /// Whether a resolution is currently cached.
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Returns the capability view, or `None` when unset or not satisfying.
    pub fn resolve<G>(&self, graph: &G) -> Option<C::View>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        self.try_resolve(graph).ok()
    }

    /// Resolves while keeping "unset" apart from "wrong capability".
    pub fn try_resolve<G>(&self, graph: &G) -> Resolution<C::View>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let Some(carrier) = self.carrier.as_ref() else {
            return Resolution::Absent;
        };

        let resolved = match self.cache.get() {
            Some(cached) => cached.clone(),
            None => {
                // Computed outside the cell so a host lookup that re-enters
                // this reference cannot hit a half-initialized cell.
                let resolved = resolve_carrier::<C, G>(graph, carrier);
                let _ = self.cache.set(resolved.clone());
                resolved
            }
        };

        match resolved {
            Some(view) => Resolution::Resolved(view),
            None => Resolution::Mismatch,
        }
    }

    /// True when unset or when the carrier resolves.
    ///
    /// Whether "unset" is acceptable is a host decision; see `diagnose`.
    pub fn is_valid<G>(&self, graph: &G) -> bool
    where
        G: ObjectGraph<C> + ?Sized,
    {
        !self.try_resolve(graph).is_mismatch()
    }

    /// Pure dry-run of `set_carrier`: the carrier that would be stored.
    pub fn check_candidate<G>(
        &self,
        graph: &G,
        candidate: Option<Carrier>,
    ) -> RefResult<Option<Carrier>>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        check_candidate::<C, G>(graph, candidate)
    }

    /// Replaces the carrier, narrowing it to the facet that satisfies `C`.
    ///
    /// # Errors
    /// - `RefError::CapabilityMismatch` when the candidate is present and
    ///   nothing reachable from it satisfies `C`. State is left untouched.
    pub fn set_carrier<G>(&mut self, graph: &G, candidate: Option<Carrier>) -> RefResult<()>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let narrowed = check_candidate::<C, G>(graph, candidate)?;
        self.carrier = narrowed;
        self.cache = OnceCell::new();
        debug!(
            "event=ref_set module=reference status=ok capability={} object={} narrowed={}",
            C::NAME,
            narrowed.map_or_else(|| "none".to_string(), |c| c.object.to_string()),
            narrowed != candidate
        );
        Ok(())
    }

    /// Narrows the stored carrier in place when a satisfying facet exists.
    ///
    /// Returns `true` when the stored carrier changed. A carrier that does not
    /// satisfy `C` is left as-is.
    pub fn normalize<G>(&mut self, graph: &G) -> bool
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let Some(current) = self.carrier else {
            return false;
        };
        match narrow::<C, G>(graph, &current) {
            Some(narrowed) if narrowed != current => {
                self.carrier = Some(narrowed);
                self.cache = OnceCell::new();
                true
            }
            _ => false,
        }
    }

    /// Unsets the reference.
    pub fn clear(&mut self) {
        self.carrier = None;
        self.cache = OnceCell::new();
    }

    /// Post-load hook: drops any cached resolution.
    ///
    /// Hosts call this after restoring the carrier through a path other than
    /// deserialization (which already starts uncached).
    pub fn rehydrate(&mut self) {
        self.cache = OnceCell::new();
    }

    /// Classifies the reference against a declaration's required marker.
    pub fn diagnose<G>(&self, graph: &G, marker: Option<RequiredMarker>) -> Option<RefIssue>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        match self.try_resolve(graph) {
            Resolution::Absent if RequiredMarker::applies(marker) => Some(RefIssue::Missing),
            Resolution::Absent | Resolution::Resolved(_) => None,
            Resolution::Mismatch => Some(RefIssue::Mismatch {
                capability: C::tag(),
            }),
        }
    }
}

impl<C: Capability> Default for SingleCapabilityRef<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Capability> Clone for SingleCapabilityRef<C> {
    fn clone(&self) -> Self {
        Self {
            carrier: self.carrier,
            cache: self.cache.clone(),
            capability: PhantomData,
        }
    }
}

impl<C: Capability> PartialEq for SingleCapabilityRef<C> {
    fn eq(&self, other: &Self) -> bool {
        self.carrier == other.carrier
    }
}

impl<C: Capability> Debug for SingleCapabilityRef<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleCapabilityRef")
            .field("capability", &C::NAME)
            .field("carrier", &self.carrier)
            .field("cached", &self.is_cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::SingleCapabilityRef;
    use crate::graph::memory::MemoryGraph;
    use crate::model::capability::{Capability, CapabilityTag};
    use crate::model::carrier::Carrier;
    use crate::model::marker::RequiredMarker;
    use crate::reference::diagnostics::RefIssue;
    use crate::reference::error::Resolution;

    struct Trigger;

    impl Capability for Trigger {
        const NAME: &'static str = "trigger";
        type View = &'static str;
    }

    fn scene() -> (MemoryGraph, Carrier, Carrier) {
        let mut graph = MemoryGraph::new();
        let node = graph.add_node("door");
        let facet = graph.add_facet(&node).unwrap();
        graph.implement::<Trigger>(&facet, "door-trigger").unwrap();
        (graph, node, facet)
    }

    #[test]
    fn unset_reference_is_absent_and_uncached() {
        let (graph, _, _) = scene();
        let reference = SingleCapabilityRef::<Trigger>::new();

        assert_eq!(reference.try_resolve(&graph), Resolution::Absent);
        assert!(reference.is_valid(&graph));
        assert!(!reference.is_cached());
    }

    #[test]
    fn resolve_fills_cache_once() {
        let (graph, _, facet) = scene();
        let reference = SingleCapabilityRef::<Trigger>::with_carrier(&graph, facet).unwrap();

        assert!(!reference.is_cached());
        assert_eq!(reference.resolve(&graph), Some("door-trigger"));
        assert!(reference.is_cached());
    }

    #[test]
    fn cached_miss_is_not_rescanned() {
        let (mut graph, node, facet) = scene();
        let mut reference = SingleCapabilityRef::<Trigger>::with_carrier(&graph, facet).unwrap();
        graph.detach(&facet).unwrap();

        assert_eq!(reference.try_resolve(&graph), Resolution::Mismatch);

        let replacement = graph.add_facet(&node).unwrap();
        graph.implement::<Trigger>(&replacement, "late").unwrap();
        assert_eq!(reference.try_resolve(&graph), Resolution::Mismatch);

        reference.rehydrate();
        assert_eq!(reference.resolve(&graph), Some("late"));
    }

    #[test]
    fn normalize_narrows_stored_node_carrier() {
        let (graph, node, facet) = scene();
        let mut reference: SingleCapabilityRef<Trigger> =
            serde_json::from_value(serde_json::json!({ "carrier": node })).unwrap();

        assert!(reference.normalize(&graph));
        assert_eq!(reference.carrier(), Some(&facet));
        assert!(!reference.normalize(&graph));
    }

    #[test]
    fn diagnose_follows_required_marker() {
        let (mut graph, _, facet) = scene();
        let mut reference = SingleCapabilityRef::<Trigger>::new();

        assert_eq!(reference.diagnose(&graph, None), None);
        assert_eq!(
            reference.diagnose(&graph, Some(RequiredMarker::OPTIONAL)),
            None
        );
        assert_eq!(
            reference.diagnose(&graph, Some(RequiredMarker::REQUIRED)),
            Some(RefIssue::Missing)
        );

        reference.set_carrier(&graph, Some(facet)).unwrap();
        assert_eq!(reference.diagnose(&graph, Some(RequiredMarker::REQUIRED)), None);

        graph.detach(&facet).unwrap();
        reference.rehydrate();
        assert_eq!(
            reference.diagnose(&graph, None),
            Some(RefIssue::Mismatch {
                capability: CapabilityTag::new("trigger"),
            })
        );
    }
}
