//! # Driven Ports (Outbound SPI)
//!
//! Collaborators the selection subsystem requires from the host: chaincode
//! metadata, the gossip membership view, and the load-balance strategy.

use crate::domain::{
    ChaincodeData, ChannelMembership, NetworkMember, Peer, PeerGroup, SelectionError,
    SelectionResult,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Chaincode metadata lookup (ledger/lifecycle query).
pub trait ChaincodeDataProvider: Send + Sync {
    /// Chaincode data, including its encoded endorsement policy.
    fn query_chaincode_data(
        &self,
        channel_id: &str,
        chaincode_id: &str,
    ) -> SelectionResult<ChaincodeData>;
}

/// Raw membership: every known peer, and the peers joined to a channel.
pub trait MembershipSource: Send + Sync {
    /// All peers known to the network.
    fn all_peers(&self) -> SelectionResult<Vec<Peer>>;

    /// Peers joined to `channel_id`.
    fn peers_of_channel(&self, channel_id: &str) -> SelectionResult<Vec<Peer>>;
}

/// Gossip discovery state.
pub trait GossipView: Send + Sync {
    /// Alive members known to gossip.
    fn peers(&self) -> Vec<NetworkMember>;

    /// Alive members joined to `channel_id`, with channel properties.
    fn peers_of_channel(&self, channel_id: &str) -> SelectionResult<Vec<NetworkMember>>;
}

/// Channel membership as consumed by selection.
pub trait MembershipManager: Send + Sync {
    /// Snapshot of `channel_id` membership; see [`ChannelMembership`] for how
    /// errors and peers combine.
    fn get_peers_of_channel(&self, channel_id: &str) -> ChannelMembership;
}

/// Picks one concrete peer group out of all valid candidates.
///
/// Implementations must return an empty group for an empty candidate list.
pub trait LoadBalancePolicy: Send + Sync {
    /// Choose among `peer_groups`.
    fn choose(&self, peer_groups: &[PeerGroup]) -> PeerGroup;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory chaincode data keyed by `(channel, chaincode)`.
#[derive(Default)]
pub struct MockChaincodeDataProvider {
    data: RwLock<HashMap<(String, String), ChaincodeData>>,
    queries: AtomicUsize,
}

impl MockChaincodeDataProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register chaincode data.
    pub fn insert(&self, channel_id: &str, data: ChaincodeData) {
        self.data
            .write()
            .insert((channel_id.to_string(), data.name.clone()), data);
    }

    /// Number of queries served, successful or not.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl ChaincodeDataProvider for MockChaincodeDataProvider {
    fn query_chaincode_data(
        &self,
        channel_id: &str,
        chaincode_id: &str,
    ) -> SelectionResult<ChaincodeData> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.data
            .read()
            .get(&(channel_id.to_string(), chaincode_id.to_string()))
            .cloned()
            .ok_or_else(|| SelectionError::ChaincodeQuery {
                channel_id: channel_id.to_string(),
                chaincode_id: chaincode_id.to_string(),
                reason: "chaincode not found".to_string(),
            })
    }
}

/// Mutable in-memory membership.
#[derive(Default)]
pub struct MockMembershipSource {
    channels: RwLock<HashMap<String, Vec<Peer>>>,
    failing: RwLock<bool>,
    queries: AtomicUsize,
}

impl MockMembershipSource {
    /// Empty membership.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the peers of `channel_id`.
    pub fn set_channel_peers(&self, channel_id: &str, peers: Vec<Peer>) {
        self.channels.write().insert(channel_id.to_string(), peers);
    }

    /// Make subsequent queries fail.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.write() = failing;
    }

    /// Number of queries served.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl MembershipSource for MockMembershipSource {
    fn all_peers(&self) -> SelectionResult<Vec<Peer>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if *self.failing.read() {
            return Err(SelectionError::MembershipQuery {
                channel_id: String::new(),
                reason: "gossip unavailable".to_string(),
            });
        }
        let mut all: Vec<Peer> = Vec::new();
        for peer in self.channels.read().values().flatten() {
            if !all.contains(peer) {
                all.push(peer.clone());
            }
        }
        Ok(all)
    }

    fn peers_of_channel(&self, channel_id: &str) -> SelectionResult<Vec<Peer>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if *self.failing.read() {
            return Err(SelectionError::MembershipQuery {
                channel_id: channel_id.to_string(),
                reason: "gossip unavailable".to_string(),
            });
        }
        Ok(self
            .channels
            .read()
            .get(channel_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Membership manager answering from a fixed table.
#[derive(Default)]
pub struct StaticMembershipManager {
    channels: RwLock<HashMap<String, Vec<Peer>>>,
}

impl StaticMembershipManager {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the peers of `channel_id`.
    pub fn set_channel_peers(&self, channel_id: &str, peers: Vec<Peer>) {
        self.channels.write().insert(channel_id.to_string(), peers);
    }
}

impl MembershipManager for StaticMembershipManager {
    fn get_peers_of_channel(&self, channel_id: &str) -> ChannelMembership {
        ChannelMembership {
            peers: self
                .channels
                .read()
                .get(channel_id)
                .cloned()
                .unwrap_or_default(),
            query_error: None,
            polling_enabled: false,
        }
    }
}
