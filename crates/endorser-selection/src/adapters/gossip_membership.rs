//! Membership source backed by the gossip view.
//!
//! Gossip reports members by PKI ID; the [`PkiIdMspMapper`] supplies the
//! organization of each. Members whose organization is not known yet are
//! left out until their identity arrives.

use super::identity_mapper::PkiIdMspMapper;
use crate::domain::{NetworkMember, Peer, SelectionResult};
use crate::ports::{GossipView, MembershipSource};
use std::sync::Arc;
use tracing::debug;

/// [`MembershipSource`] over a [`GossipView`].
pub struct GossipMembershipSource<G: GossipView> {
    view: Arc<G>,
    mapper: Arc<PkiIdMspMapper>,
}

impl<G: GossipView> GossipMembershipSource<G> {
    /// Source over `view`, resolving organizations through `mapper`.
    pub fn new(view: Arc<G>, mapper: Arc<PkiIdMspMapper>) -> Self {
        Self { view, mapper }
    }

    fn to_peers(&self, members: Vec<NetworkMember>) -> Vec<Peer> {
        members
            .into_iter()
            .filter_map(|member| {
                let msp_id = self.mapper.msp_id(&member.pki_id);
                if msp_id.is_empty() {
                    debug!(endpoint = %member.endpoint, "Skipping member with unknown MSP");
                    return None;
                }
                let mut peer = Peer::new(member.endpoint, msp_id);
                if let Some(props) = member.properties {
                    peer = peer
                        .with_ledger_height(props.ledger_height)
                        .with_roles(props.roles);
                }
                Some(peer)
            })
            .collect()
    }
}

impl<G: GossipView> MembershipSource for GossipMembershipSource<G> {
    fn all_peers(&self) -> SelectionResult<Vec<Peer>> {
        Ok(self.to_peers(self.view.peers()))
    }

    fn peers_of_channel(&self, channel_id: &str) -> SelectionResult<Vec<Peer>> {
        let members = self.view.peers_of_channel(channel_id)?;
        Ok(self.to_peers(members))
    }
}
