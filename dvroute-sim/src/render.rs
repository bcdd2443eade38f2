use std::collections::BTreeMap;

use dvroute::concepts::route::RoutingTable;
use dvroute::engine::{Convergence, Network};
use dvroute::util::{Metric, INF};
use serde::Serialize;

use crate::SimSystem;

const MIN_WIDTH: usize = 5;

fn metric(m: Metric) -> String {
    if m == INF {
        "INF".to_string()
    } else {
        m.to_string()
    }
}

/// Distance tables of every router at the current round index
pub fn distance_tables(network: &Network<SimSystem>) -> String {
    let mut out = String::new();
    for r in 0..network.nodes().len() {
        out.push_str(&distance_table(network, r));
    }
    out
}

/// One block: a header of destinations, then a row per candidate neighbour
pub fn distance_table(network: &Network<SimSystem>, router: usize) -> String {
    let nodes = network.nodes();
    let table = network.table();
    let others: Vec<usize> = (0..nodes.len()).filter(|&i| i != router).collect();
    let width = others
        .iter()
        .map(|&i| nodes[i].len() + 1)
        .chain(std::iter::once(MIN_WIDTH))
        .max()
        .unwrap_or(MIN_WIDTH);

    let mut out = String::new();
    out.push_str(&format!(
        "Distance Table of router {} at t={}:\n",
        nodes[router],
        network.current_round()
    ));
    let mut header = format!("{:<width$}", "");
    for &dest in &others {
        header.push_str(&format!("{:<width$}", nodes[dest]));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for &via in &others {
        let mut row = format!("{:<width$}", nodes[via]);
        for &dest in &others {
            row.push_str(&format!("{:<width$}", metric(table.get(router, dest, via))));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out.push('\n');
    out
}

/// `dest,nextHop,cost` lines per router, `dest,INF,INF` when unreachable
pub fn routing_tables(tables: &[RoutingTable<SimSystem>]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str(&format!("Routing Table of router {}:\n", table.router));
        for entry in &table.entries {
            match &entry.next_hop {
                Some(hop) if entry.is_reachable() => {
                    out.push_str(&format!("{},{},{}\n", entry.destination, hop, entry.cost));
                }
                _ => {
                    out.push_str(&format!("{},INF,INF\n", entry.destination));
                }
            }
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Serialize)]
pub struct RouteRow {
    pub destination: String,
    pub next_hop: Option<String>,
    pub cost: Option<Metric>,
}

/// Machine readable summary of one convergence phase
#[derive(Debug, Serialize)]
pub struct PhaseReport {
    pub phase: usize,
    #[serde(flatten)]
    pub convergence: Convergence,
    pub routes: BTreeMap<String, Vec<RouteRow>>,
}

impl PhaseReport {
    pub fn new(phase: usize, convergence: Convergence, tables: Vec<RoutingTable<SimSystem>>) -> Self {
        let routes = tables
            .into_iter()
            .map(|table| {
                let rows = table
                    .entries
                    .into_iter()
                    .map(|entry| {
                        let reachable = entry.is_reachable();
                        RouteRow {
                            destination: entry.destination,
                            next_hop: entry.next_hop.filter(|_| reachable),
                            cost: reachable.then_some(entry.cost),
                        }
                    })
                    .collect();
                (table.router, rows)
            })
            .collect();
        Self {
            phase,
            convergence,
            routes,
        }
    }
}
