use educe::Educe;
use serde::Serialize;

use crate::concepts::table::DistanceTable;
use crate::concepts::topology::Topology;
use crate::framework::RoutingSystem;
use crate::util::{Metric, INF};

#[derive(Educe, Serialize)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[serde(bound = "")]
pub struct RoutingEntry<T: RoutingSystem + ?Sized> {
    pub destination: T::NodeAddress,
    /// the neighbour to forward to, None if the destination is unreachable (or is the router itself)
    pub next_hop: Option<T::NodeAddress>,
    /// INF if the destination is unreachable
    pub cost: Metric,
}

impl<T: RoutingSystem + ?Sized> RoutingEntry<T> {
    pub fn is_reachable(&self) -> bool {
        self.cost != INF
    }
}

/// One router's forwarding decisions, derived from the distance table on demand.
#[derive(Educe, Serialize)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[serde(bound = "")]
pub struct RoutingTable<T: RoutingSystem + ?Sized> {
    pub router: T::NodeAddress,
    /// every other router, in alphabetical order
    pub entries: Vec<RoutingEntry<T>>,
}

impl<T: RoutingSystem + ?Sized> RoutingTable<T> {
    /// Reads the table, never mutates it
    pub fn extract(topology: &Topology<T>, table: &DistanceTable, router: usize) -> Self {
        let entries = (0..topology.len())
            .filter(|&dest| dest != router)
            .map(|dest| entry_for(topology, table, router, dest))
            .collect();
        Self {
            router: topology.addr(router).clone(),
            entries,
        }
    }

    pub fn get(&self, dest: &T::NodeAddress) -> Option<&RoutingEntry<T>> {
        self.entries.iter().find(|e| e.destination == *dest)
    }
}

pub(crate) fn entry_for<T: RoutingSystem + ?Sized>(
    topology: &Topology<T>,
    table: &DistanceTable,
    router: usize,
    dest: usize,
) -> RoutingEntry<T> {
    let destination = topology.addr(dest).clone();
    if router == dest {
        return RoutingEntry {
            destination,
            next_hop: None,
            cost: 0,
        };
    }
    match table.best(router, dest) {
        (Some(via), cost) => RoutingEntry {
            destination,
            next_hop: Some(topology.addr(via).clone()),
            cost,
        },
        (None, _) => RoutingEntry {
            destination,
            next_hop: None,
            cost: INF,
        },
    }
}
