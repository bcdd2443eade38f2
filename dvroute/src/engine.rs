use educe::Educe;
use log::{debug, info, trace, warn};
use serde::Serialize;

use crate::concepts::link::LinkUpdate;
use crate::concepts::route::{entry_for, RoutingEntry, RoutingTable};
use crate::concepts::table::{Advertisement, DistanceTable};
use crate::concepts::topology::Topology;
use crate::feedback::{ConvergenceError, SimError, TopologyError};
use crate::framework::{ReconvergencePolicy, RoutingSystem, SimParams};
use crate::util::{cap, sum_capped, Metric, INF};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum PhaseState {
    /// table seeded (or updated), no round has run yet
    Initialized,
    /// the last round changed at least one entry
    InProgress,
    /// the last round changed nothing
    Stable,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RoundOutcome {
    /// round index after the round, only changed rounds advance it
    pub round: usize,
    pub changed: bool,
}

/// Summary of one convergence phase
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Convergence {
    /// round index the phase started from
    pub start_round: usize,
    /// round index of the stable table
    pub final_round: usize,
    /// indices produced by rounds that changed the table, in order
    pub changed_rounds: Vec<usize>,
    /// rounds executed in the phase, including the final unchanged one
    pub rounds_run: usize,
}

/// A simulated network of distance-vector routers exchanging vectors in synchronous rounds.
///
/// Every round first snapshots all advertisements from the table as it stood after the previous
/// round, and only then relaxes every router against that snapshot.
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
pub struct Network<T: RoutingSystem + ?Sized> {
    topology: Topology<T>,
    table: DistanceTable,
    params: SimParams,
    round: usize,
    state: PhaseState,
    /// the advertisement the most recent round relaxed against
    advertisement: Advertisement,
    /// replayed once instead of a fresh advertisement, after an incremental update
    stale: Option<Advertisement>,
    /// the last topology update changed table entries that no round has accounted for yet
    dirty: bool,
    phase_start: usize,
    phase_rounds: usize,
}

impl<T: RoutingSystem + ?Sized> Network<T> {
    pub fn new(
        nodes: impl IntoIterator<Item = T::NodeAddress>,
        links: &[LinkUpdate<T>],
    ) -> Result<Self, TopologyError<T>> {
        Self::with_params(nodes, links, T::config())
    }

    pub fn with_params(
        nodes: impl IntoIterator<Item = T::NodeAddress>,
        links: &[LinkUpdate<T>],
        params: SimParams,
    ) -> Result<Self, TopologyError<T>> {
        let mut topology = Topology::new(nodes);
        for link in links {
            topology.apply(link)?;
        }
        for idx in (0..topology.len()).filter(|&idx| topology.is_isolated(idx)) {
            debug!("router {} starts without links", topology.addr(idx));
        }
        let table = DistanceTable::seeded(&topology, params.infinity);
        let advertisement = table.advertise();
        Ok(Self {
            topology,
            table,
            params,
            round: 0,
            state: PhaseState::Initialized,
            advertisement,
            stale: None,
            dirty: false,
            phase_start: 0,
            phase_rounds: 0,
        })
    }

    // region Rounds

    /// Runs exactly one synchronous round: advertise from the frozen table, then relax.
    pub fn step(&mut self) -> RoundOutcome {
        let adv = match self.stale.take() {
            Some(stale) => {
                debug!("round after t={} replays the previous advertisement", self.round);
                stale
            }
            None => self.table.advertise(),
        };
        let changes = self.relax(&adv);
        let changed = changes > 0 || std::mem::take(&mut self.dirty);
        self.advertisement = adv;
        self.phase_rounds += 1;

        if changed {
            self.round += 1;
            self.state = PhaseState::InProgress;
            debug!("t={}: {} entries changed", self.round, changes);
        } else {
            self.state = PhaseState::Stable;
        }
        RoundOutcome {
            round: self.round,
            changed,
        }
    }

    /// Relaxes every router against `adv`, returns the number of entries written
    fn relax(&mut self, adv: &Advertisement) -> usize {
        let n = self.topology.len();
        let infinity = self.params.infinity;
        let mut changes = 0;
        for r in 0..n {
            for (via, link) in self.topology.neighbours_of(r) {
                // dest == via is the direct-link row, it only moves with the topology
                for d in (0..n).filter(|&d| d != r && d != via) {
                    let candidate = sum_capped(link, adv.get(via, d), infinity);
                    if self.table.set(r, d, via, candidate) {
                        changes += 1;
                        trace!(
                            "D[{}][{}][{}] = {}",
                            self.topology.addr(r),
                            self.topology.addr(d),
                            self.topology.addr(via),
                            candidate
                        );
                    }
                }
            }
        }
        changes
    }

    /// Runs rounds until one changes nothing
    pub fn converge(&mut self) -> Result<Convergence, ConvergenceError> {
        self.converge_with(|_, _| {})
    }

    /// Same as [`Network::converge`], calling `observer` after every round that changed the table
    pub fn converge_with<F>(&mut self, mut observer: F) -> Result<Convergence, ConvergenceError>
    where
        F: FnMut(&Self, RoundOutcome),
    {
        let mut changed_rounds = Vec::new();
        while self.state != PhaseState::Stable {
            if self.phase_rounds >= self.params.max_rounds {
                warn!(
                    "giving up after {} rounds without convergence (t={})",
                    self.phase_rounds, self.round
                );
                return Err(ConvergenceError::NonConvergence {
                    rounds: self.phase_rounds,
                });
            }
            let outcome = self.step();
            if outcome.changed {
                changed_rounds.push(outcome.round);
                observer(self, outcome);
            }
        }
        info!(
            "converged at t={} after {} rounds",
            self.round, self.phase_rounds
        );
        Ok(Convergence {
            start_round: self.phase_start,
            final_round: self.round,
            changed_rounds,
            rounds_run: self.phase_rounds,
        })
    }
    // endregion

    // region Topology changes

    /// Applies a batch of link updates and starts a new convergence phase.
    ///
    /// The whole batch is validated first, an invalid update leaves the network untouched.
    /// The round index advances by one so the updated table gets its own index.
    pub fn apply_updates(&mut self, updates: &[LinkUpdate<T>]) -> Result<(), TopologyError<T>> {
        let mut resolved = Vec::with_capacity(updates.len());
        for update in updates {
            let (i, j) = self.topology.resolve_link(&update.a, &update.b)?;
            resolved.push((i, j, update.cost.metric()));
        }

        if self.state != PhaseState::Stable {
            debug!("topology update arrived before t={} converged", self.round);
        }

        let mut changed_links = Vec::new();
        for (i, j, cost) in resolved {
            let old = self.topology.set_cost_idx(i, j, cost);
            if old != cost {
                debug!(
                    "link {} {}: {} -> {}",
                    self.topology.addr(i),
                    self.topology.addr(j),
                    old,
                    cost
                );
                changed_links.push((i, j, cost));
            }
        }

        match self.params.policy {
            ReconvergencePolicy::Reset => {
                self.table = DistanceTable::seeded(&self.topology, self.params.infinity);
                self.stale = None;
                self.dirty = false;
            }
            ReconvergencePolicy::Incremental => {
                let mut dirty = false;
                for &(i, j, cost) in &changed_links {
                    if cost == INF {
                        // paths over a severed link are gone immediately
                        dirty |= self.table.invalidate_via(i, j);
                        dirty |= self.table.invalidate_via(j, i);
                    } else {
                        let cost = cap(cost, self.params.infinity);
                        dirty |= self.table.pin_direct(i, j, cost);
                        dirty |= self.table.pin_direct(j, i, cost);
                    }
                }
                self.stale = Some(self.advertisement.clone());
                // a batch applied before any round ran keeps the earlier batch pending
                self.dirty |= dirty;
            }
        }

        for &(i, j, _) in &changed_links {
            for idx in [i, j] {
                if self.topology.is_isolated(idx) {
                    warn!("router {} has no remaining links", self.topology.addr(idx));
                }
            }
        }

        self.round += 1;
        self.phase_start = self.round;
        self.phase_rounds = 0;
        self.state = PhaseState::Initialized;
        Ok(())
    }

    /// Applies the batch, then converges
    pub fn update_and_converge(&mut self, updates: &[LinkUpdate<T>]) -> Result<Convergence, SimError<T>> {
        self.apply_updates(updates)?;
        Ok(self.converge()?)
    }
    // endregion

    // region Read surface

    pub fn current_round(&self) -> usize {
        self.round
    }

    pub fn is_converged(&self) -> bool {
        self.state == PhaseState::Stable
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn topology(&self) -> &Topology<T> {
        &self.topology
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    /// The advertisement the most recent round relaxed against
    pub fn advertisement(&self) -> &Advertisement {
        &self.advertisement
    }

    pub fn nodes(&self) -> &[T::NodeAddress] {
        self.topology.nodes()
    }

    /// `D[router][dest][via]`, INF for the unused `dest == router` and `via == router` cells
    pub fn distance_entry(
        &self,
        router: &T::NodeAddress,
        dest: &T::NodeAddress,
        via: &T::NodeAddress,
    ) -> Result<Metric, TopologyError<T>> {
        let r = self.topology.resolve(router)?;
        let d = self.topology.resolve(dest)?;
        let v = self.topology.resolve(via)?;
        Ok(self.table.get(r, d, v))
    }

    /// The route `router` currently uses towards `dest`.
    /// A router reaches itself at cost 0 with no next hop.
    pub fn routing_entry(
        &self,
        router: &T::NodeAddress,
        dest: &T::NodeAddress,
    ) -> Result<RoutingEntry<T>, TopologyError<T>> {
        let r = self.topology.resolve(router)?;
        let d = self.topology.resolve(dest)?;
        Ok(entry_for(&self.topology, &self.table, r, d))
    }

    pub fn routing_table(&self, router: &T::NodeAddress) -> Result<RoutingTable<T>, TopologyError<T>> {
        let r = self.topology.resolve(router)?;
        Ok(RoutingTable::extract(&self.topology, &self.table, r))
    }

    /// Routing tables of every router, in alphabetical order
    pub fn routing_tables(&self) -> Vec<RoutingTable<T>> {
        (0..self.topology.len())
            .map(|r| RoutingTable::extract(&self.topology, &self.table, r))
            .collect()
    }
    // endregion
}
