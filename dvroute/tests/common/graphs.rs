use dvroute::framework::SimParams;

use crate::common::virtual_network::VirtualNetwork;

pub fn vnet_simple_weighted() -> VirtualNetwork {
    VirtualNetwork::create(
        &["1", "2", "3", "4", "5"],
        &[
            (0, "1", "2", 2),
            (1, "1", "3", 1),
            (2, "2", "3", 4),
            (3, "2", "4", 5),
            (4, "3", "4", 100),
            (5, "3", "5", 8),
            (6, "4", "5", 1),
        ],
    )
}

/// X, Y and Z fully connected, the X-Z link is worse than going through Y
pub fn vnet_triangle() -> VirtualNetwork {
    vnet_triangle_with(SimParams::default())
}

pub fn vnet_triangle_with(params: SimParams) -> VirtualNetwork {
    VirtualNetwork::create_with(
        &["Z", "Y", "X"],
        &[(0, "X", "Y", 2), (1, "X", "Z", 7), (2, "Y", "Z", 1)],
        params,
    )
}

/// the triangle plus W, which never gets a link
pub fn vnet_isolated() -> VirtualNetwork {
    VirtualNetwork::create(
        &["X", "Y", "Z", "W"],
        &[(0, "X", "Y", 2), (1, "X", "Z", 7), (2, "Y", "Z", 1)],
    )
}

/// A - B - C
pub fn vnet_line(params: SimParams) -> VirtualNetwork {
    VirtualNetwork::create_with(&["A", "B", "C"], &[(0, "A", "B", 1), (1, "B", "C", 1)], params)
}
