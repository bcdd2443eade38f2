use educe::Educe;
use serde::Serialize;

use crate::concepts::link::LinkUpdate;
use crate::feedback::TopologyError;
use crate::framework::RoutingSystem;
use crate::util::{Metric, INF};

/// The declared routers and the symmetric link-cost matrix between them.
///
/// Routers are kept sorted, the position of a router in that order is its index in every
/// table of the simulation. Routers are never removed, only link costs change.
#[derive(Educe, Serialize)]
#[educe(Clone(bound()), Debug(bound()))]
#[serde(bound = "")]
pub struct Topology<T: RoutingSystem + ?Sized> {
    nodes: Vec<T::NodeAddress>,
    /// row-major n * n, 0 on the diagonal, INF for absent links
    costs: Vec<Metric>,
}

impl<T: RoutingSystem + ?Sized> Topology<T> {
    pub fn new(nodes: impl IntoIterator<Item = T::NodeAddress>) -> Self {
        let mut nodes: Vec<T::NodeAddress> = nodes.into_iter().collect();
        nodes.sort();
        nodes.dedup();
        let n = nodes.len();
        let mut costs = vec![INF; n * n];
        for i in 0..n {
            costs[i * n + i] = 0;
        }
        Self { nodes, costs }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Routers in alphabetical order
    pub fn nodes(&self) -> &[T::NodeAddress] {
        &self.nodes
    }

    pub fn addr(&self, idx: usize) -> &T::NodeAddress {
        &self.nodes[idx]
    }

    pub fn index_of(&self, addr: &T::NodeAddress) -> Option<usize> {
        self.nodes.binary_search(addr).ok()
    }

    pub fn resolve(&self, addr: &T::NodeAddress) -> Result<usize, TopologyError<T>> {
        self.index_of(addr)
            .ok_or_else(|| TopologyError::UnknownNode { node: addr.clone() })
    }

    /// Resolves both endpoints of a link, rejecting self-links
    pub fn resolve_link(
        &self,
        a: &T::NodeAddress,
        b: &T::NodeAddress,
    ) -> Result<(usize, usize), TopologyError<T>> {
        let (i, j) = (self.resolve(a)?, self.resolve(b)?);
        if i == j {
            return Err(TopologyError::SelfLink { node: a.clone() });
        }
        Ok((i, j))
    }

    pub fn cost_idx(&self, i: usize, j: usize) -> Metric {
        self.costs[i * self.len() + j]
    }

    /// Current link cost, 0 to itself and INF when no link was set
    pub fn cost(&self, a: &T::NodeAddress, b: &T::NodeAddress) -> Result<Metric, TopologyError<T>> {
        Ok(self.cost_idx(self.resolve(a)?, self.resolve(b)?))
    }

    /// Writes both directions of a link, returns the previous cost
    pub(crate) fn set_cost_idx(&mut self, i: usize, j: usize, cost: Metric) -> Metric {
        let n = self.len();
        let old = self.costs[i * n + j];
        self.costs[i * n + j] = cost;
        self.costs[j * n + i] = cost;
        old
    }

    /// Sets cost(a, b) = cost(b, a) = cost. INF removes the link.
    pub fn set_cost(
        &mut self,
        a: &T::NodeAddress,
        b: &T::NodeAddress,
        cost: Metric,
    ) -> Result<Metric, TopologyError<T>> {
        let (i, j) = self.resolve_link(a, b)?;
        Ok(self.set_cost_idx(i, j, cost))
    }

    pub fn remove_link(&mut self, a: &T::NodeAddress, b: &T::NodeAddress) -> Result<Metric, TopologyError<T>> {
        self.set_cost(a, b, INF)
    }

    pub fn apply(&mut self, update: &LinkUpdate<T>) -> Result<Metric, TopologyError<T>> {
        self.set_cost(&update.a, &update.b, update.cost.metric())
    }

    /// Routers with a finite direct link to `idx`, in alphabetical order
    pub fn neighbours_of(&self, idx: usize) -> impl Iterator<Item = (usize, Metric)> + '_ {
        (0..self.len())
            .filter(move |&via| via != idx)
            .map(move |via| (via, self.cost_idx(idx, via)))
            .filter(|&(_, cost)| cost != INF)
    }

    pub fn is_isolated(&self, idx: usize) -> bool {
        self.neighbours_of(idx).next().is_none()
    }
}
