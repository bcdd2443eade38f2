use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::util::{Metric, INF};

pub trait RoutingSystem: 'static {
    /// Address of a router on the simulated network, MUST be unique.
    /// The ordering of addresses decides table layout and every tie-break.
    type NodeAddress: Ord + NodeData + NodeKey + Display + Debug;
    fn config() -> SimParams {
        Default::default()
    }
}

pub trait NodeData: Clone + Serialize + DeserializeOwned + Sized + 'static {}
pub trait NodeKey: Eq + PartialEq {}
impl<T: Eq + PartialEq> NodeKey for T {}
impl<T: Clone + Serialize + DeserializeOwned + Sized + 'static> NodeData for T {}

/// What happens to the distance table when the topology changes after a phase has converged.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconvergencePolicy {
    /// Keep the table, invalidate routes over severed links, and replay the last
    /// converged advertisement for one round before advertising fresh vectors.
    #[default]
    Incremental,
    /// Rebuild the table from the new topology and start over.
    Reset,
}

/// Simulation parameters
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// rounds a single phase may run before it is reported as non-converging.
    /// The default leaves room for a partition counting all the way up to INF.
    pub max_rounds: usize,
    pub policy: ReconvergencePolicy,
    /// any path metric at or above this value is treated as INF.
    /// Small values (16, as in RIP) make count-to-infinity finish quickly.
    pub infinity: Metric,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            max_rounds: 1 << 17,
            policy: ReconvergencePolicy::Incremental,
            infinity: INF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_params_fill_defaults() {
        let params: SimParams = serde_json::from_str(r#"{"policy": "reset"}"#).unwrap();
        assert_eq!(params.policy, ReconvergencePolicy::Reset);
        assert_eq!(params.max_rounds, SimParams::default().max_rounds);
        assert_eq!(params.infinity, INF);
    }
}
