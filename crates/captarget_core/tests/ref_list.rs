use captarget_core::{
    Capability, CapabilityRefList, Carrier, MemoryGraph, RefError, RequiredMarker,
};

struct Listener;

impl Capability for Listener {
    const NAME: &'static str = "IListener";
    type View = &'static str;
}

fn listener(graph: &mut MemoryGraph, name: &'static str) -> (Carrier, Carrier) {
    let node = graph.add_node(name);
    let facet = graph.add_facet(&node).expect("facet should attach");
    graph
        .implement::<Listener>(&facet, name)
        .expect("capability should register");
    (node, facet)
}

fn three(graph: &mut MemoryGraph) -> (Carrier, Carrier, Carrier) {
    let (_, a) = listener(graph, "a");
    let (_, b) = listener(graph, "b");
    let (_, c) = listener(graph, "c");
    (a, b, c)
}

#[test]
fn insert_places_entry_at_index() {
    let mut graph = MemoryGraph::new();
    let (a, b, c) = three(&mut graph);
    let (_, x) = listener(&mut graph, "x");
    let mut list = CapabilityRefList::<Listener>::from_carriers([Some(a), Some(b), Some(c)]);

    list.insert(1, Some(x)).expect("insert inside bounds");
    assert_eq!(list.carriers(), &[Some(a), Some(x), Some(b), Some(c)]);
    assert_eq!(list.resolved(&graph), vec!["a", "x", "b", "c"]);

    list.insert(4, None).expect("insert at the end");
    assert_eq!(list.len(), 5);
}

#[test]
fn move_item_reorders_entries() {
    let mut graph = MemoryGraph::new();
    let (a, b, c) = three(&mut graph);
    let mut list = CapabilityRefList::<Listener>::from_carriers([Some(a), Some(b), Some(c)]);

    list.move_item(0, 2).expect("move inside bounds");
    assert_eq!(list.carriers(), &[Some(b), Some(c), Some(a)]);
    assert_eq!(list.resolved(&graph), vec!["b", "c", "a"]);
}

#[test]
fn out_of_range_edits_fail_without_changing_state() {
    let mut graph = MemoryGraph::new();
    let (a, b, c) = three(&mut graph);
    let mut list = CapabilityRefList::<Listener>::from_carriers([Some(a), Some(b)]);

    assert_eq!(
        list.insert(3, Some(c)),
        Err(RefError::IndexOutOfRange { index: 3, len: 2 })
    );
    assert_eq!(
        list.remove_at(2),
        Err(RefError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(
        list.move_item(0, 2),
        Err(RefError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(
        list.assign(&graph, 5, Some(c)),
        Err(RefError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(list.carriers(), &[Some(a), Some(b)]);

    assert_eq!(list.remove_at(0), Ok(Some(a)));
    assert_eq!(list.carriers(), &[Some(b)]);
}

#[test]
fn empty_list_is_vacuously_valid() {
    let graph = MemoryGraph::new();
    let list = CapabilityRefList::<Listener>::new();

    assert!(list.is_empty());
    assert!(list.validate_all(&graph));
    assert_eq!(list.resolved_view(&graph).count(), 0);
}

#[test]
fn holes_and_mismatches_are_skipped_but_mismatches_fail_validation() {
    let mut graph = MemoryGraph::new();
    let (_, valid) = listener(&mut graph, "valid");
    let invalid = graph.add_node("scenery");
    let list = CapabilityRefList::<Listener>::from_carriers([Some(valid), None, Some(invalid)]);

    let view: Vec<_> = list.resolved_view(&graph).collect();
    assert_eq!(view, vec!["valid"]);
    assert!(!list.validate_all(&graph));

    let holes_only = CapabilityRefList::<Listener>::from_carriers([Some(valid), None]);
    assert!(holes_only.validate_all(&graph));
}

#[test]
fn normalize_all_narrows_in_place_and_is_idempotent() {
    let mut graph = MemoryGraph::new();
    let (node_a, facet_a) = listener(&mut graph, "a");
    let (_, facet_b) = listener(&mut graph, "b");
    let scenery = graph.add_node("scenery");
    let mut list = CapabilityRefList::<Listener>::from_carriers([
        Some(node_a),
        None,
        Some(facet_b),
        Some(scenery),
    ]);

    assert_eq!(list.normalize_all(&graph), 1);
    let after_first = list.carriers().to_vec();
    assert_eq!(
        after_first,
        vec![Some(facet_a), None, Some(facet_b), Some(scenery)]
    );

    assert_eq!(list.normalize_all(&graph), 0);
    assert_eq!(list.carriers(), after_first.as_slice());
}

#[test]
fn checked_writes_narrow_or_reject() {
    let mut graph = MemoryGraph::new();
    let (node_a, facet_a) = listener(&mut graph, "a");
    let scenery = graph.add_node("scenery");
    let mut list = CapabilityRefList::<Listener>::new();

    list.push_checked(&graph, Some(node_a))
        .expect("node with listener facet should be accepted");
    list.push_checked(&graph, None).expect("holes are accepted");
    assert_eq!(list.carriers(), &[Some(facet_a), None]);

    let err = list
        .assign(&graph, 1, Some(scenery))
        .expect_err("scenery has no listener");
    assert!(matches!(err, RefError::CapabilityMismatch { .. }));
    assert_eq!(list.get(1), None);

    assert_eq!(list.check_candidate(&graph, Some(node_a)), Ok(Some(facet_a)));
    list.assign(&graph, 1, Some(node_a)).unwrap();
    assert_eq!(list.resolved(&graph), vec!["a", "a"]);
}

#[test]
fn diagnose_reports_positions_by_requirement() {
    let mut graph = MemoryGraph::new();
    let (_, valid) = listener(&mut graph, "valid");
    let invalid = graph.add_node("scenery");
    let list = CapabilityRefList::<Listener>::from_carriers([Some(valid), None, Some(invalid)]);

    let optional = list
        .diagnose(&graph, None)
        .expect("mismatch is reported for optional lists");
    assert_eq!(optional.missing, Vec::<usize>::new());
    assert_eq!(optional.mismatched, vec![2]);
    assert_eq!(
        optional.to_string(),
        "All non-empty targets must implement IListener"
    );

    let required = list
        .diagnose(&graph, Some(RequiredMarker::REQUIRED))
        .expect("holes and mismatches are reported for required lists");
    assert_eq!(required.missing, vec![1]);
    assert_eq!(required.mismatched, vec![2]);

    let empty = CapabilityRefList::<Listener>::new();
    assert_eq!(empty.diagnose(&graph, None), None);
    assert_eq!(empty.diagnose(&graph, Some(RequiredMarker::REQUIRED)), None);

    let clean = CapabilityRefList::<Listener>::from_carriers([Some(valid)]);
    assert_eq!(clean.diagnose(&graph, Some(RequiredMarker::REQUIRED)), None);
}
