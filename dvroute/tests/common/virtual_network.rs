use dvroute::concepts::link::LinkUpdate;
use dvroute::engine::{Convergence, Network};
use dvroute::framework::{RoutingSystem, SimParams};
use dvroute::util::{Metric, INF};

pub struct VirtualSystem;

impl RoutingSystem for VirtualSystem {
    type NodeAddress = String;
}

pub struct VirtualNetwork {
    pub network: Network<VirtualSystem>,
    /// (edge id, a, b)
    pub edges: Vec<(i32, String, String)>,
}

impl VirtualNetwork {
    pub fn create(nodes: &[&str], links: &[(i32, &str, &str, Metric)]) -> VirtualNetwork {
        Self::create_with(nodes, links, VirtualSystem::config())
    }

    pub fn create_with(
        nodes: &[&str],
        links: &[(i32, &str, &str, Metric)],
        params: SimParams,
    ) -> VirtualNetwork {
        let updates: Vec<LinkUpdate<VirtualSystem>> = links
            .iter()
            .map(|(_, a, b, metric)| LinkUpdate::cost(a.to_string(), b.to_string(), *metric))
            .collect();
        let network = Network::with_params(nodes.iter().map(|x| x.to_string()), &updates, params)
            .unwrap_or_else(|err| panic!("invalid test topology: {err}"));
        VirtualNetwork {
            network,
            edges: links
                .iter()
                .map(|(id, a, b, _)| (*id, a.to_string(), b.to_string()))
                .collect(),
        }
    }

    fn edge(&self, edge_id: i32) -> (String, String) {
        let (_, a, b) = self
            .edges
            .iter()
            .find(|(id, _, _)| *id == edge_id)
            .unwrap_or_else(|| panic!("No edge {edge_id} found"));
        (a.clone(), b.clone())
    }

    /// sets the cost of an edge, INF removes it. Starts a new phase.
    pub fn update_edge(&mut self, edge_id: i32, metric: Metric) {
        let (a, b) = self.edge(edge_id);
        let update = if metric == INF {
            LinkUpdate::remove(a, b)
        } else {
            LinkUpdate::cost(a, b, metric)
        };
        self.network.apply_updates(&[update]).unwrap();
    }

    /// returns whether the round changed anything
    pub fn tick(&mut self) -> bool {
        self.network.step().changed
    }

    pub fn tick_n(&mut self, times: usize) {
        for _ in 0..times {
            self.tick();
        }
    }

    pub fn converge(&mut self) -> Convergence {
        self.network.converge().unwrap()
    }

    pub fn get_next_hop(&self, cur: &str, dest: &str) -> String {
        self.network
            .routing_entry(&cur.to_string(), &dest.to_string())
            .unwrap_or_else(|err| panic!("No route from {cur} to {dest}: {err}"))
            .next_hop
            .unwrap_or_else(|| "INF".to_string())
    }

    pub fn get_metric_to(&self, cur: &str, dest: &str) -> Metric {
        self.network
            .routing_entry(&cur.to_string(), &dest.to_string())
            .unwrap_or_else(|err| panic!("No route from {cur} to {dest}: {err}"))
            .cost
    }

    pub fn distance(&self, router: &str, dest: &str, via: &str) -> Metric {
        self.network
            .distance_entry(&router.to_string(), &dest.to_string(), &via.to_string())
            .unwrap()
    }

    /// every (router, dest, via) entry, index order
    pub fn entries(&self) -> Vec<Metric> {
        let table = self.network.table();
        let n = table.len();
        let mut out = Vec::with_capacity(n * n * n);
        for r in 0..n {
            for d in 0..n {
                for via in 0..n {
                    out.push(table.get(r, d, via));
                }
            }
        }
        out
    }

    /// converged cost from every router to every other router
    pub fn costs(&self) -> Vec<(String, String, Metric)> {
        self.network
            .routing_tables()
            .into_iter()
            .flat_map(|rt| {
                let router = rt.router.clone();
                rt.entries
                    .into_iter()
                    .map(move |e| (router.clone(), e.destination, e.cost))
            })
            .collect()
    }
}
