//! Ordered list of capability-checked references.
//!
//! # Responsibility
//! - Hold an ordered sequence of optional carriers (holes and duplicates
//!   allowed) and resolve each entry independently.
//! - Provide positional edits with explicit bounds errors.
//!
//! # Invariants
//! - Entry order is exactly what the host inserted; nothing reorders it.
//! - The cached resolution table is positional and is dropped by every edit.
//! - Failed edits leave both entries and cache untouched.
//!
//! # Validation policy
//! - Unset entries are vacuously valid and are skipped by `resolved_view`.
//! - Set entries that do not resolve make `validate_all` false and are skipped
//!   by `resolved_view`.
//! - An empty list is valid, and `diagnose` reports nothing for it even when
//!   required: "cannot be empty" refers to unset entries.

use crate::graph::ObjectGraph;
use crate::model::capability::Capability;
use crate::model::carrier::Carrier;
use crate::model::marker::RequiredMarker;
use crate::reference::diagnostics::ListIssue;
use crate::reference::error::{RefError, RefResult, Resolution};
use crate::reference::resolve::{check_candidate, narrow, resolve_carrier};
use log::debug;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Ordered references to objects that must provide capability `C`.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CapabilityRefList<C: Capability> {
    carriers: Vec<Option<Carrier>>,
    #[serde(skip)]
    cache: OnceCell<Vec<Option<C::View>>>,
    #[serde(skip)]
    capability: PhantomData<fn() -> C>,
}

impl<C: Capability> CapabilityRefList<C> {
    pub fn new() -> Self {
        Self {
            carriers: Vec::new(),
            cache: OnceCell::new(),
            capability: PhantomData,
        }
    }

    /// Builds a list from raw carriers without capability checks.
    pub fn from_carriers(carriers: impl IntoIterator<Item = Option<Carrier>>) -> Self {
        Self {
            carriers: carriers.into_iter().collect(),
            cache: OnceCell::new(),
            capability: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    /// Stored carriers in order, for display binding.
    pub fn carriers(&self) -> &[Option<Carrier>] {
        &self.carriers
    }

    pub fn get(&self, index: usize) -> Option<&Carrier> {
        self.carriers.get(index)?.as_ref()
    }

    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Resolves one entry, keeping "unset" apart from "wrong capability".
    ///
    /// Returns `None` when `index` is out of range.
    pub fn try_resolve_at<G>(&self, graph: &G, index: usize) -> Option<Resolution<C::View>>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let carrier = self.carriers.get(index)?;
        let resolved = self.resolutions(graph).get(index)?;
        Some(match (carrier, resolved) {
            (None, _) => Resolution::Absent,
            (Some(_), Some(view)) => Resolution::Resolved(view.clone()),
            (Some(_), None) => Resolution::Mismatch,
        })
    }

    /// Resolved views of all set, satisfying entries, in list order.
    ///
    /// Each call starts a fresh pass over the cached resolution table.
    pub fn resolved_view<'a, G>(&'a self, graph: &G) -> impl Iterator<Item = C::View> + 'a
    where
        G: ObjectGraph<C> + ?Sized,
    {
        self.resolutions(graph).iter().flatten().cloned()
    }

    /// Collects `resolved_view` into a vector.
    pub fn resolved<G>(&self, graph: &G) -> Vec<C::View>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        self.resolved_view(graph).collect()
    }

    /// True when every set entry resolves.
    pub fn validate_all<G>(&self, graph: &G) -> bool
    where
        G: ObjectGraph<C> + ?Sized,
    {
        self.carriers
            .iter()
            .zip(self.resolutions(graph))
            .all(|(carrier, resolved)| carrier.is_none() || resolved.is_some())
    }

    /// Narrows every set entry in place to the facet satisfying `C`.
    ///
    /// Entries with nothing to narrow to are left as-is. Returns the number of
    /// entries changed; a second call always returns 0.
    pub fn normalize_all<G>(&mut self, graph: &G) -> usize
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let mut changed = 0;
        for slot in self.carriers.iter_mut() {
            let Some(current) = *slot else {
                continue;
            };
            if let Some(narrowed) = narrow::<C, G>(graph, &current) {
                if narrowed != current {
                    *slot = Some(narrowed);
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.invalidate();
            debug!(
                "event=list_normalize module=reference status=ok capability={} changed={}",
                C::NAME,
                changed
            );
        }
        changed
    }

    /// Pure dry-run of `assign`/`push_checked` for one candidate.
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

    /// Replaces one entry with a checked, narrowed candidate.
    ///
    /// # Errors
    /// - `RefError::IndexOutOfRange` when `index >= len`.
    /// - `RefError::CapabilityMismatch` when the candidate does not satisfy `C`.
    pub fn assign<G>(
        &mut self,
        graph: &G,
        index: usize,
        candidate: Option<Carrier>,
    ) -> RefResult<()>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        self.ensure_index(index)?;
        let narrowed = check_candidate::<C, G>(graph, candidate)?;
        self.carriers[index] = narrowed;
        self.invalidate();
        debug!(
            "event=list_assign module=reference status=ok capability={} index={}",
            C::NAME,
            index
        );
        Ok(())
    }

    /// Appends a checked, narrowed candidate.
    pub fn push_checked<G>(&mut self, graph: &G, candidate: Option<Carrier>) -> RefResult<()>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let narrowed = check_candidate::<C, G>(graph, candidate)?;
        self.push(narrowed);
        Ok(())
    }

    /// Appends an entry without capability checks.
    pub fn push(&mut self, carrier: Option<Carrier>) {
        self.carriers.push(carrier);
        self.invalidate();
    }

    /// Inserts an entry at `index`, shifting later entries right.
    ///
    /// # Errors
    /// - `RefError::IndexOutOfRange` when `index > len`.
    pub fn insert(&mut self, index: usize, carrier: Option<Carrier>) -> RefResult<()> {
        if index > self.carriers.len() {
            return Err(self.out_of_range(index));
        }
        self.carriers.insert(index, carrier);
        self.invalidate();
        Ok(())
    }

    /// Removes and returns the entry at `index`.
    pub fn remove_at(&mut self, index: usize) -> RefResult<Option<Carrier>> {
        self.ensure_index(index)?;
        let removed = self.carriers.remove(index);
        self.invalidate();
        Ok(removed)
    }

    /// Moves the entry at `from` so that it ends up at `to`.
    ///
    /// `move_item(0, 2)` on `[a, b, c]` yields `[b, c, a]`.
    pub fn move_item(&mut self, from: usize, to: usize) -> RefResult<()> {
        self.ensure_index(from)?;
        self.ensure_index(to)?;
        if from == to {
            return Ok(());
        }
        let carrier = self.carriers.remove(from);
        self.carriers.insert(to, carrier);
        self.invalidate();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.carriers.clear();
        self.invalidate();
    }

    /// Post-load hook: drops the cached resolution table.
    pub fn rehydrate(&mut self) {
        self.invalidate();
    }

    /// Classifies the list against a declaration's required marker.
    ///
    /// Unset entries are reported only when required. A list with no
    /// entries has nothing to report, required or not.
    pub fn diagnose<G>(&self, graph: &G, marker: Option<RequiredMarker>) -> Option<ListIssue>
    where
        G: ObjectGraph<C> + ?Sized,
    {
        let required = RequiredMarker::applies(marker);
        let mut issue = ListIssue {
            capability: C::tag(),
            required,
            missing: Vec::new(),
            mismatched: Vec::new(),
        };
        for (index, (carrier, resolved)) in self
            .carriers
            .iter()
            .zip(self.resolutions(graph))
            .enumerate()
        {
            match (carrier, resolved) {
                (None, _) if required => issue.missing.push(index),
                (Some(_), None) => issue.mismatched.push(index),
                _ => {}
            }
        }
        if issue.is_clean() {
            None
        } else {
            Some(issue)
        }
    }

    fn resolutions<G>(&self, graph: &G) -> &[Option<C::View>]
    where
        G: ObjectGraph<C> + ?Sized,
    {
        if self.cache.get().is_none() {
            let table = self
                .carriers
                .iter()
                .map(|carrier| {
                    carrier
                        .as_ref()
                        .and_then(|carrier| resolve_carrier::<C, G>(graph, carrier))
                })
                .collect();
            let _ = self.cache.set(table);
        }
        self.cache.get().map(Vec::as_slice).unwrap_or(&[])
    }

    fn invalidate(&mut self) {
        self.cache = OnceCell::new();
    }

    fn ensure_index(&self, index: usize) -> RefResult<()> {
        if index < self.carriers.len() {
            Ok(())
        } else {
            Err(self.out_of_range(index))
        }
    }

    fn out_of_range(&self, index: usize) -> RefError {
        debug!(
            "event=list_edit module=reference status=rejected capability={} index={} len={}",
            C::NAME,
            index,
            self.carriers.len()
        );
        RefError::IndexOutOfRange {
            index,
            len: self.carriers.len(),
        }
    }
}

impl<C: Capability> Default for CapabilityRefList<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Capability> Clone for CapabilityRefList<C> {
    fn clone(&self) -> Self {
        Self {
            carriers: self.carriers.clone(),
            cache: self.cache.clone(),
            capability: PhantomData,
        }
    }
}

impl<C: Capability> PartialEq for CapabilityRefList<C> {
    fn eq(&self, other: &Self) -> bool {
        self.carriers == other.carriers
    }
}

impl<C: Capability> Debug for CapabilityRefList<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRefList")
            .field("capability", &C::NAME)
            .field("carriers", &self.carriers)
            .field("cached", &self.is_cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::CapabilityRefList;
    use crate::graph::memory::MemoryGraph;
    use crate::model::capability::Capability;
    use crate::model::carrier::Carrier;
    use crate::reference::error::Resolution;

    struct Sink;

    impl Capability for Sink {
        const NAME: &'static str = "sink";
        type View = u32;
    }

    fn sink(graph: &mut MemoryGraph, value: u32) -> Carrier {
        let node = graph.add_node(format!("sink-{value}"));
        let facet = graph.add_facet(&node).unwrap();
        graph.implement::<Sink>(&facet, value).unwrap();
        facet
    }

    #[test]
    fn edits_invalidate_cached_table() {
        let mut graph = MemoryGraph::new();
        let a = sink(&mut graph, 1);
        let b = sink(&mut graph, 2);
        let mut list = CapabilityRefList::<Sink>::from_carriers([Some(a)]);

        assert_eq!(list.resolved(&graph), vec![1]);
        assert!(list.is_cached());

        list.push(Some(b));
        assert!(!list.is_cached());
        assert_eq!(list.resolved(&graph), vec![1, 2]);

        list.move_item(1, 0).unwrap();
        assert!(!list.is_cached());
        assert_eq!(list.resolved(&graph), vec![2, 1]);
    }

    #[test]
    fn failed_edit_keeps_cache() {
        let mut graph = MemoryGraph::new();
        let a = sink(&mut graph, 1);
        let mut list = CapabilityRefList::<Sink>::from_carriers([Some(a)]);
        list.resolved(&graph);

        list.remove_at(3).expect_err("index past the end must fail");
        assert!(list.is_cached());
    }

    #[test]
    fn try_resolve_at_distinguishes_entry_states() {
        let mut graph = MemoryGraph::new();
        let a = sink(&mut graph, 5);
        let stray = graph.add_node("stray");
        let list = CapabilityRefList::<Sink>::from_carriers([Some(a), None, Some(stray)]);

        assert_eq!(list.try_resolve_at(&graph, 0), Some(Resolution::Resolved(5)));
        assert_eq!(list.try_resolve_at(&graph, 1), Some(Resolution::Absent));
        assert_eq!(list.try_resolve_at(&graph, 2), Some(Resolution::Mismatch));
        assert_eq!(list.try_resolve_at(&graph, 3), None);
    }

    #[test]
    fn resolved_view_is_restartable() {
        let mut graph = MemoryGraph::new();
        let a = sink(&mut graph, 1);
        let b = sink(&mut graph, 2);
        let list = CapabilityRefList::<Sink>::from_carriers([Some(a), Some(b)]);

        let first: Vec<u32> = list.resolved_view(&graph).collect();
        let second: Vec<u32> = list.resolved_view(&graph).collect();
        assert_eq!(first, second);
        assert_eq!(list.resolved_view(&graph).count(), 2);
    }
}
