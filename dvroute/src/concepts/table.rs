use serde::Serialize;

use crate::concepts::topology::Topology;
use crate::framework::RoutingSystem;
use crate::util::{cap, Metric, INF};

/// `D[router][dest][via]`: the believed cost of reaching `dest` from `router` by first hopping to `via`.
///
/// Stored as one flat arena over dense router indices. Entries where `dest == router` or
/// `via == router` are allocated but stay INF forever.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DistanceTable {
    n: usize,
    entries: Vec<Metric>,
}

/// Best known cost from every router to every destination, the vector a router broadcasts
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Advertisement {
    n: usize,
    metrics: Vec<Metric>,
}

impl DistanceTable {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            entries: vec![INF; n * n * n],
        }
    }

    /// Fresh table for a topology, only the direct links are known
    pub fn seeded<T: RoutingSystem + ?Sized>(topology: &Topology<T>, infinity: Metric) -> Self {
        let n = topology.len();
        let mut table = Self::new(n);
        for r in 0..n {
            for (d, cost) in topology.neighbours_of(r) {
                table.pin_direct(r, d, cap(cost, infinity));
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn idx(&self, router: usize, dest: usize, via: usize) -> usize {
        debug_assert!(router < self.n && dest < self.n && via < self.n);
        (router * self.n + dest) * self.n + via
    }

    pub fn get(&self, router: usize, dest: usize, via: usize) -> Metric {
        self.entries[self.idx(router, dest, via)]
    }

    /// Writes an entry, returns true if the value changed
    pub fn set(&mut self, router: usize, dest: usize, via: usize, metric: Metric) -> bool {
        if router == dest || router == via {
            return false;
        }
        let idx = self.idx(router, dest, via);
        let old = std::mem::replace(&mut self.entries[idx], metric);
        old != metric
    }

    /// The direct-link row: reaching `via` through `via` costs exactly the link
    pub fn pin_direct(&mut self, router: usize, via: usize, cost: Metric) -> bool {
        self.set(router, via, via, cost)
    }

    /// Forgets every path from `router` that starts by hopping to `via`
    pub fn invalidate_via(&mut self, router: usize, via: usize) -> bool {
        let mut changed = false;
        for dest in 0..self.n {
            changed |= self.set(router, dest, via, INF);
        }
        changed
    }

    /// Minimum over every `via`, scanning in index (alphabetical) order so the first seen wins ties.
    /// Returns `(None, INF)` when nothing is reachable.
    pub fn best(&self, router: usize, dest: usize) -> (Option<usize>, Metric) {
        let mut best = (None, INF);
        if router == dest {
            return best;
        }
        for via in (0..self.n).filter(|&via| via != router) {
            let metric = self.get(router, dest, via);
            if metric < best.1 {
                best = (Some(via), metric);
            }
        }
        best
    }

    /// Snapshot of every router's distance vector as this table currently stands
    pub fn advertise(&self) -> Advertisement {
        let mut adv = Advertisement::new(self.n);
        for r in 0..self.n {
            for d in 0..self.n {
                let metric = if r == d { 0 } else { self.best(r, d).1 };
                adv.metrics[r * self.n + d] = metric;
            }
        }
        adv
    }
}

impl Advertisement {
    /// Every router knows only itself
    pub fn new(n: usize) -> Self {
        let mut metrics = vec![INF; n * n];
        for i in 0..n {
            metrics[i * n + i] = 0;
        }
        Self { n, metrics }
    }

    pub fn get(&self, router: usize, dest: usize) -> Metric {
        self.metrics[router * self.n + dest]
    }

    pub fn vector(&self, router: usize) -> &[Metric] {
        &self.metrics[router * self.n..(router + 1) * self.n]
    }
}
