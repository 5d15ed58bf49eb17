//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `captarget_core` linkage without a host editor.
//! - Walk one demo scene through assignment, narrowing and diagnostics with
//!   deterministic output.

use captarget_core::{
    core_version, init_logging, Capability, CapabilityRefList, LoggingConfig, MemoryGraph,
    RequiredMarker, Resolution, SingleCapabilityRef,
};
use log::info;
use std::process::ExitCode;

struct Interactable;

impl Capability for Interactable {
    const NAME: &'static str = "IInteractable";
    type View = &'static str;
}

const TARGET_MARKER: Option<RequiredMarker> = Some(RequiredMarker::REQUIRED);
const LISTENERS_MARKER: Option<RequiredMarker> = None;

fn main() -> ExitCode {
    // Probe output goes to stdout; only warnings from the core reach stderr.
    if let Err(err) = init_logging(&LoggingConfig::stderr("warn")) {
        eprintln!("captarget_cli logging={err}");
        return ExitCode::FAILURE;
    }
    println!("captarget_core version={}", core_version());

    let mut graph = MemoryGraph::new();
    let door = graph.add_node("door");
    let lever = graph.add_node("lever");
    let rock = graph.add_node("rock");
    for (node, label) in [(&door, "open-door"), (&lever, "pull-lever")] {
        let facet = match graph.add_facet(node) {
            Ok(facet) => facet,
            Err(err) => {
                eprintln!("captarget_cli scene={err}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = graph.implement::<Interactable>(&facet, label) {
            eprintln!("captarget_cli scene={err}");
            return ExitCode::FAILURE;
        }
    }

    let mut target = SingleCapabilityRef::<Interactable>::new();
    report_single("unset", &target, &graph);

    match target.set_carrier(&graph, Some(rock)) {
        Ok(()) => println!("assign rock=accepted"),
        Err(err) => println!("assign rock=rejected reason=\"{err}\""),
    }
    match target.set_carrier(&graph, Some(door)) {
        Ok(()) => println!(
            "assign door=accepted narrowed={}",
            target.carrier().is_some_and(|carrier| !carrier.is_node())
        ),
        Err(err) => println!("assign door=rejected reason=\"{err}\""),
    }
    report_single("door", &target, &graph);

    let listeners =
        CapabilityRefList::<Interactable>::from_carriers([Some(lever), None, Some(rock)]);
    let resolved: Vec<&str> = listeners.resolved_view(&graph).collect();
    println!(
        "listeners count={} resolved={:?} valid={}",
        listeners.len(),
        resolved,
        listeners.validate_all(&graph)
    );
    if let Some(issue) = listeners.diagnose(&graph, LISTENERS_MARKER) {
        println!(
            "listeners issue=\"{issue}\" missing={:?} mismatched={:?}",
            issue.missing, issue.mismatched
        );
    }

    info!("event=probe_done module=cli status=ok");
    ExitCode::SUCCESS
}

fn report_single(label: &str, target: &SingleCapabilityRef<Interactable>, graph: &MemoryGraph) {
    let state = match target.try_resolve(graph) {
        Resolution::Absent => "absent".to_string(),
        Resolution::Resolved(view) => format!("resolved:{view}"),
        Resolution::Mismatch => "mismatch".to_string(),
    };
    let issue = target
        .diagnose(graph, TARGET_MARKER)
        .map_or_else(|| "none".to_string(), |issue| issue.to_string());
    println!("target[{label}] state={state} issue=\"{issue}\"");
}
