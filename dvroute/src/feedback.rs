use educe::Educe;
use thiserror::Error;

use crate::framework::RoutingSystem;

/// A wire-level link cost that is neither `-1` nor a metric below INF.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[error("invalid link cost {0}, expected -1 or an integer in 0..65535")]
pub struct InvalidCost(pub i64);

/// Rejected topology mutations. Nothing is applied when one of these is returned.
#[derive(Error)]
#[derive(Educe)]
#[educe(Debug(bound()))]
pub enum TopologyError<T: RoutingSystem + ?Sized> {
    /// Links may only join routers that were declared up front
    #[error("unknown node {node}")]
    UnknownNode { node: T::NodeAddress },
    #[error("invalid link, {node} cannot link to itself")]
    SelfLink { node: T::NodeAddress },
    #[error(transparent)]
    InvalidCost(#[from] InvalidCost),
}

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConvergenceError {
    /// Only reachable if the round cap is set below what the topology needs,
    /// metrics are non-negative so every phase terminates eventually.
    #[error("no convergence after {rounds} rounds")]
    NonConvergence { rounds: usize },
}

#[derive(Error)]
#[derive(Educe)]
#[educe(Debug(bound()))]
pub enum SimError<T: RoutingSystem + ?Sized> {
    #[error(transparent)]
    Topology(#[from] TopologyError<T>),
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
}
