//! # Peer Group Resolver
//!
//! Holds the reduced alternatives of a compiled policy and, on every
//! [`resolve`](PeerGroupResolver::resolve), materializes them against live
//! membership and lets the load-balance policy pick one.
//!
//! Reduction happens once at construction; membership lookup happens per
//! call, so peers joining or leaving are reflected without recompiling.

use super::group_algebra::cartesian_product;
use crate::domain::{Group, GroupOfGroups, Item, PeerGroup, SelectionError, SelectionResult};
use crate::ports::LoadBalancePolicy;
use std::fmt;
use tracing::debug;

/// Resolves a compiled policy to one concrete peer group per call.
pub struct PeerGroupResolver {
    msp_groups: Vec<Group>,
    lbp: Box<dyn LoadBalancePolicy>,
}

impl PeerGroupResolver {
    /// Reduce `group_hierarchy` and keep the alternatives.
    ///
    /// # Errors
    ///
    /// `EmptyPolicy` when the hierarchy denotes no alternative at all.
    pub fn new(
        group_hierarchy: &GroupOfGroups,
        lbp: Box<dyn LoadBalancePolicy>,
    ) -> SelectionResult<Self> {
        let msp_groups = group_hierarchy.reduce();
        if msp_groups.is_empty() {
            return Err(SelectionError::EmptyPolicy);
        }
        debug!(alternatives = msp_groups.len(), "Built peer group resolver");
        Ok(Self { msp_groups, lbp })
    }

    /// Reduced alternatives, each a conjunction of peer leaves.
    pub fn alternatives(&self) -> &[Group] {
        &self.msp_groups
    }

    /// Every concrete peer group currently satisfying some alternative.
    ///
    /// Each group holds one peer from every leaf of its alternative.
    pub fn peer_groups(&self) -> Vec<PeerGroup> {
        self.msp_groups
            .iter()
            .flat_map(materialize)
            .collect()
    }

    /// One peer group chosen by the load-balance policy; empty when no
    /// alternative can currently be satisfied.
    pub fn resolve(&self) -> PeerGroup {
        let candidates = self.peer_groups();
        debug!(candidates = candidates.len(), "Resolving peer group");
        self.lbp.choose(&candidates)
    }
}

impl fmt::Debug for PeerGroupResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerGroupResolver")
            .field("msp_groups", &self.msp_groups)
            .finish_non_exhaustive()
    }
}

/// Replace each leaf with its live peers and AND the legs together.
fn materialize(alternative: &Group) -> Vec<PeerGroup> {
    let mut legs = Vec::new();
    collect_legs(alternative, &mut legs);

    let peer_lists: Vec<_> = legs.iter().map(PeerGroup::peers).collect();
    cartesian_product(&peer_lists)
        .into_iter()
        .map(PeerGroup::new)
        .collect()
}

fn collect_legs(group: &Group, legs: &mut Vec<PeerGroup>) {
    match group {
        Group::Peers(pg) => legs.push(pg.clone()),
        Group::Items(items) => {
            for item in items {
                match item {
                    Item::Group(sub) => collect_legs(sub, legs),
                    Item::Peer(peer) => legs.push(PeerGroup::new(vec![peer.clone()])),
                }
            }
        }
        // reduced alternatives hold no disjunctions
        Group::OfGroups(gog) => {
            for sub in gog.groups() {
                collect_legs(sub, legs);
            }
        }
    }
}
