//! Shared fixtures for scenarios and benchmarks.

use endorser_selection::domain::policy::{n_out_of, signed_by, signed_by_msp_member};
use endorser_selection::domain::{NetworkMember, PkiId, SelectionConfig, SignaturePolicy};
use endorser_selection::ports::{MockChaincodeDataProvider, StaticMembershipManager};
use endorser_selection::{
    ChaincodeData, GossipView, Peer, SelectionResult, SelectionService, SignaturePolicyEnvelope,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Channel used by every scenario.
pub const CHANNEL: &str = "mychannel";

/// Service type used by policy scenarios.
pub type TestService = SelectionService<MockChaincodeDataProvider, StaticMembershipManager>;

/// `peer<n>.<org>.example.com:7051` owned by `<Org>MSP`.
pub fn peer(n: u32, org: &str) -> Peer {
    Peer::new(
        format!("peer{n}.{}.example.com:7051", org.to_lowercase()),
        format!("{org}MSP"),
    )
}

/// Two peers for each of Org1..Org4.
pub fn four_org_peers() -> Vec<Peer> {
    ["Org1", "Org2", "Org3", "Org4"]
        .iter()
        .flat_map(|org| [peer(0, org), peer(1, org)])
        .collect()
}

/// Envelope over `msp_ids` (indices follow slice order).
pub fn envelope(rule: SignaturePolicy, msp_ids: &[&str]) -> SignaturePolicyEnvelope {
    let identities = msp_ids
        .iter()
        .map(|id| signed_by_msp_member(id))
        .collect::<SelectionResult<Vec<_>>>()
        .unwrap_or_default();
    SignaturePolicyEnvelope::new(rule, identities)
}

/// `SignedBy(msp_id)`.
pub fn member_of(msp_id: &str) -> SignaturePolicyEnvelope {
    envelope(signed_by(0), &[msp_id])
}

/// Admits exactly {Org1,Org2}, {Org1,Org3}, {Org1,Org4} and {Org1,Org3,Org4}.
pub fn org1_plus_partner_policy() -> SignaturePolicyEnvelope {
    envelope(
        n_out_of(
            1,
            vec![
                n_out_of(2, vec![signed_by(0), signed_by(1)]),
                n_out_of(2, vec![signed_by(0), n_out_of(1, vec![signed_by(2), signed_by(3)])]),
                n_out_of(3, vec![signed_by(0), signed_by(2), signed_by(3)]),
            ],
        ),
        &["Org1MSP", "Org2MSP", "Org3MSP", "Org4MSP"],
    )
}

/// `1-of-[2-of-[Org1,Org2], 2-of-[Org1,Org3,Org4]]`.
pub fn one_of_two_thresholds_policy() -> SignaturePolicyEnvelope {
    envelope(
        n_out_of(
            1,
            vec![
                n_out_of(2, vec![signed_by(0), signed_by(1)]),
                n_out_of(2, vec![signed_by(0), signed_by(2), signed_by(3)]),
            ],
        ),
        &["Org1MSP", "Org2MSP", "Org3MSP", "Org4MSP"],
    )
}

/// Chaincode data carrying `policy`.
pub fn chaincode(name: &str, policy: &SignaturePolicyEnvelope) -> ChaincodeData {
    ChaincodeData {
        name: name.to_string(),
        version: "1.0".to_string(),
        policy: policy.to_bytes().unwrap_or_default(),
    }
}

/// Service over `peers` on [`CHANNEL`] with the given chaincodes installed.
pub fn service_with(
    peers: Vec<Peer>,
    chaincodes: &[(&str, SignaturePolicyEnvelope)],
    config: SelectionConfig,
) -> (Arc<MockChaincodeDataProvider>, Arc<StaticMembershipManager>, TestService) {
    let provider = Arc::new(MockChaincodeDataProvider::new());
    for (name, policy) in chaincodes {
        provider.insert(CHANNEL, chaincode(name, policy));
    }
    let membership = Arc::new(StaticMembershipManager::new());
    membership.set_channel_peers(CHANNEL, peers);
    let service = SelectionService::new(provider.clone(), membership.clone(), config);
    (provider, membership, service)
}

/// Gossip view whose members can change while a context runs.
#[derive(Default)]
pub struct SharedGossipView {
    channels: RwLock<HashMap<String, Vec<NetworkMember>>>,
}

impl SharedGossipView {
    /// Empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the members of `channel_id`.
    pub fn set_members(&self, channel_id: &str, members: Vec<NetworkMember>) {
        self.channels.write().insert(channel_id.to_string(), members);
    }
}

impl GossipView for SharedGossipView {
    fn peers(&self) -> Vec<NetworkMember> {
        let mut all: Vec<NetworkMember> = Vec::new();
        for member in self.channels.read().values().flatten() {
            if !all.iter().any(|m| m.pki_id == member.pki_id) {
                all.push(member.clone());
            }
        }
        all
    }

    fn peers_of_channel(&self, channel_id: &str) -> SelectionResult<Vec<NetworkMember>> {
        Ok(self
            .channels
            .read()
            .get(channel_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Gossip member at `endpoint` with a one-byte PKI ID.
pub fn member(endpoint: &str, pki: u8) -> NetworkMember {
    NetworkMember {
        endpoint: endpoint.to_string(),
        pki_id: PkiId::new(vec![pki]),
        properties: None,
    }
}
