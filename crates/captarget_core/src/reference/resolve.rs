//! Resolution and narrowing shared by single and list references.
//!
//! # Invariants
//! - A carrier that satisfies the capability directly wins over any facet.
//! - Narrowing returns a carrier that satisfies the capability directly, so a
//!   narrowed carrier narrows to itself.

use crate::graph::ObjectGraph;
use crate::model::capability::Capability;
use crate::model::carrier::Carrier;
use crate::reference::error::{RefError, RefResult};
use log::debug;

/// Resolves `carrier` directly, falling back to the first facet on its node.
pub(crate) fn resolve_carrier<C, G>(graph: &G, carrier: &Carrier) -> Option<C::View>
where
    C: Capability,
    G: ObjectGraph<C> + ?Sized,
{
    if let Some(view) = graph.view(carrier) {
        return Some(view);
    }
    let facet = graph.lookup_facet(carrier.node, C::tag())?;
    graph.view(&facet)
}

/// Returns the most specific carrier satisfying `C` reachable from `carrier`.
pub(crate) fn narrow<C, G>(graph: &G, carrier: &Carrier) -> Option<Carrier>
where
    C: Capability,
    G: ObjectGraph<C> + ?Sized,
{
    if graph.view(carrier).is_some() {
        return Some(*carrier);
    }
    let facet = graph.lookup_facet(carrier.node, C::tag())?;
    graph.view(&facet).map(|_| facet)
}

/// Dry-run of an assignment: the carrier that would be stored for `candidate`.
pub(crate) fn check_candidate<C, G>(
    graph: &G,
    candidate: Option<Carrier>,
) -> RefResult<Option<Carrier>>
where
    C: Capability,
    G: ObjectGraph<C> + ?Sized,
{
    let Some(candidate) = candidate else {
        return Ok(None);
    };
    match narrow::<C, G>(graph, &candidate) {
        Some(narrowed) => Ok(Some(narrowed)),
        None => {
            debug!(
                "event=candidate_check module=reference status=rejected capability={} object={}",
                C::NAME,
                candidate.object
            );
            Err(RefError::CapabilityMismatch {
                capability: C::tag(),
                object: candidate.object,
            })
        }
    }
}
