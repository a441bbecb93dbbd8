//! # Load-Balance Policies
//!
//! Built-in [`LoadBalancePolicy`] strategies turning "all valid peer groups"
//! into the one used for this request.

use crate::domain::{LoadBalanceKind, PeerGroup};
use crate::ports::LoadBalancePolicy;
use parking_lot::Mutex;
use rand::Rng;

/// Uniform random pick on every call.
#[derive(Debug, Default)]
pub struct RandomLbp;

impl RandomLbp {
    /// New random policy.
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancePolicy for RandomLbp {
    fn choose(&self, peer_groups: &[PeerGroup]) -> PeerGroup {
        if peer_groups.is_empty() {
            return PeerGroup::empty();
        }
        let index = rand::thread_rng().gen_range(0..peer_groups.len());
        peer_groups[index].clone()
    }
}

/// Cycles through candidates, starting from a random one.
///
/// When the candidate list shrinks below the current position the cycle
/// restarts at the first candidate.
#[derive(Debug, Default)]
pub struct RoundRobinLbp {
    index: Mutex<Option<usize>>,
}

impl RoundRobinLbp {
    /// New round-robin policy with no position yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancePolicy for RoundRobinLbp {
    fn choose(&self, peer_groups: &[PeerGroup]) -> PeerGroup {
        if peer_groups.is_empty() {
            return PeerGroup::empty();
        }

        let mut index = self.index.lock();
        let mut next = match *index {
            None => rand::thread_rng().gen_range(0..peer_groups.len()),
            Some(current) => current + 1,
        };
        if next >= peer_groups.len() {
            next = 0;
        }
        *index = Some(next);

        peer_groups[next].clone()
    }
}

impl LoadBalanceKind {
    /// Fresh policy instance of this kind.
    pub fn build(self) -> Box<dyn LoadBalancePolicy> {
        match self {
            LoadBalanceKind::Random => Box::new(RandomLbp::new()),
            LoadBalanceKind::RoundRobin => Box::new(RoundRobinLbp::new()),
        }
    }
}
