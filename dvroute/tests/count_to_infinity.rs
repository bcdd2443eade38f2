use dvroute::concepts::link::LinkUpdate;
use dvroute::feedback::{ConvergenceError, SimError};
use dvroute::framework::SimParams;
use dvroute::util::INF;

mod common;

#[test]
fn partition_counts_to_small_infinity() {
    let params = SimParams {
        infinity: 16,
        ..SimParams::default()
    };
    let mut network = common::graphs::vnet_line(params);
    network.converge();
    assert_eq!(network.get_metric_to("A", "C"), 2);

    network.update_edge(1, INF);
    // A still believes in its old route through B, and B learns it back
    network.tick_n(2);
    assert_eq!(network.get_metric_to("B", "C"), 3);
    assert_eq!(network.get_next_hop("B", "C"), "A");

    let convergence = network.converge();
    assert!(convergence.changed_rounds.len() > 5);
    for router in ["A", "B"] {
        assert_eq!(network.get_metric_to(router, "C"), INF);
        assert_eq!(network.get_next_hop(router, "C"), "INF");
    }
    assert_eq!(network.get_metric_to("A", "B"), 1);
}

#[test]
fn partition_counts_to_inf_within_default_cap() {
    let mut network = common::graphs::vnet_line(SimParams::default());
    network.converge();

    network.update_edge(1, INF);
    let convergence = network.converge();
    assert!(convergence.rounds_run < SimParams::default().max_rounds);
    for router in ["A", "B"] {
        assert_eq!(network.get_metric_to(router, "C"), INF);
    }
}

#[test]
fn round_cap_reports_non_convergence() {
    let params = SimParams {
        max_rounds: 10,
        ..SimParams::default()
    };
    let mut network = common::graphs::vnet_line(params);
    network.converge();

    let result = network
        .network
        .update_and_converge(&[LinkUpdate::remove("B".to_string(), "C".to_string())]);
    assert!(matches!(
        result,
        Err(SimError::Convergence(ConvergenceError::NonConvergence { rounds: 10 }))
    ));
    assert!(!network.network.is_converged());
}

#[test]
fn first_phase_only_decreases() {
    let mut network = common::graphs::vnet_simple_weighted();
    let mut previous = network.entries();
    while network.tick() {
        let current = network.entries();
        for (old, new) in previous.iter().zip(&current) {
            assert!(new <= old);
        }
        previous = current;
    }
}

#[test]
fn self_distance_is_zero_every_round() {
    let mut network = common::graphs::vnet_simple_weighted();
    network.update_edge(3, INF);
    loop {
        let changed = network.tick();
        let adv = network.network.advertisement();
        for r in 0..network.network.nodes().len() {
            assert_eq!(adv.get(r, r), 0);
        }
        if !changed {
            break;
        }
    }
}
