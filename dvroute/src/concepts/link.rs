use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::feedback::{InvalidCost, TopologyError};
use crate::framework::RoutingSystem;
use crate::util::{Metric, INF};

/// The cost half of a link triple. On the wire, `-1` removes a link.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LinkCost {
    Cost(Metric),
    Remove,
}

impl LinkCost {
    pub fn metric(self) -> Metric {
        match self {
            LinkCost::Cost(metric) => metric,
            LinkCost::Remove => INF,
        }
    }
}

impl TryFrom<i64> for LinkCost {
    type Error = InvalidCost;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(LinkCost::Remove),
            v if (0..INF as i64).contains(&v) => Ok(LinkCost::Cost(v as Metric)),
            v => Err(InvalidCost(v)),
        }
    }
}

/// An undirected link assignment between two routers
#[derive(Educe, Serialize, Deserialize)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[serde(bound = "")]
pub struct LinkUpdate<T: RoutingSystem + ?Sized> {
    pub a: T::NodeAddress,
    pub b: T::NodeAddress,
    pub cost: LinkCost,
}

impl<T: RoutingSystem + ?Sized> LinkUpdate<T> {
    pub fn new(a: T::NodeAddress, b: T::NodeAddress, cost: LinkCost) -> Self {
        Self { a, b, cost }
    }

    pub fn cost(a: T::NodeAddress, b: T::NodeAddress, metric: Metric) -> Self {
        Self::new(a, b, LinkCost::Cost(metric))
    }

    pub fn remove(a: T::NodeAddress, b: T::NodeAddress) -> Self {
        Self::new(a, b, LinkCost::Remove)
    }

    /// Builds an update from a wire triple, `-1` removes the link
    pub fn from_wire(a: T::NodeAddress, b: T::NodeAddress, wire: i64) -> Result<Self, TopologyError<T>> {
        Ok(Self::new(a, b, LinkCost::try_from(wire)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_costs() {
        assert_eq!(LinkCost::try_from(-1), Ok(LinkCost::Remove));
        assert_eq!(LinkCost::try_from(0), Ok(LinkCost::Cost(0)));
        assert_eq!(LinkCost::try_from(7), Ok(LinkCost::Cost(7)));
        assert_eq!(LinkCost::try_from(-2), Err(InvalidCost(-2)));
        assert_eq!(LinkCost::try_from(INF as i64), Err(InvalidCost(INF as i64)));
        assert_eq!(LinkCost::Remove.metric(), INF);
    }

    struct Names;

    impl RoutingSystem for Names {
        type NodeAddress = String;
    }

    #[test]
    fn wire_triples() {
        let update = LinkUpdate::<Names>::from_wire("A".to_string(), "B".to_string(), -1).unwrap();
        assert_eq!(update, LinkUpdate::remove("A".to_string(), "B".to_string()));

        let err = LinkUpdate::<Names>::from_wire("A".to_string(), "B".to_string(), 70000).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidCost(InvalidCost(70000))));
        assert_eq!(
            err.to_string(),
            "invalid link cost 70000, expected -1 or an integer in 0..65535"
        );
    }
}
