//! Selection context - owns the caches and the service for one client.
//!
//! Wiring:
//!
//! ```text
//! GossipView ──► GossipMembershipSource ──► MembershipCache ──┐
//!      ▲               (PkiIdMspMapper)                       ├──► SelectionService
//! identity gossip                  ChaincodeDataProvider ──► CachedChaincodeDataProvider
//! ```

use super::SelectionService;
use crate::adapters::{
    CachedChaincodeDataProvider, GossipMembershipSource, MembershipCache, PkiIdMspMapper,
};
use crate::domain::{EventSource, GossipMessage, Peer, SelectionConfig, SelectionResult};
use crate::ports::{ChaincodeDataProvider, EndorserSelectionApi, GossipView};
use futures::Stream;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Membership cache type built by [`SelectionContext`].
pub type GossipMembershipCache<G> = MembershipCache<GossipMembershipSource<G>>;

/// Composition root for endorser selection.
pub struct SelectionContext<G, P>
where
    G: GossipView + 'static,
    P: ChaincodeDataProvider + 'static,
{
    mapper: Arc<PkiIdMspMapper>,
    membership: Arc<GossipMembershipCache<G>>,
    chaincodes: Arc<CachedChaincodeDataProvider<P>>,
    service: SelectionService<CachedChaincodeDataProvider<P>, GossipMembershipCache<G>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<G, P> SelectionContext<G, P>
where
    G: GossipView + 'static,
    P: ChaincodeDataProvider + 'static,
{
    /// Wire caches and service over the gossip view and chaincode provider.
    pub fn new(gossip: Arc<G>, chaincode_provider: Arc<P>, config: SelectionConfig) -> SelectionResult<Self> {
        config.validate()?;

        let mapper = Arc::new(PkiIdMspMapper::new());
        let source = Arc::new(GossipMembershipSource::new(gossip, mapper.clone()));
        let membership = Arc::new(MembershipCache::new(
            source,
            config.membership_cache_ttl,
            config.polling_enabled,
        ));
        let chaincodes = Arc::new(CachedChaincodeDataProvider::new(chaincode_provider));

        info!(
            ttl = ?config.membership_cache_ttl,
            load_balance = ?config.load_balance,
            "Endorser selection context created"
        );
        let service = SelectionService::new(chaincodes.clone(), membership.clone(), config);

        Ok(Self {
            mapper,
            membership,
            chaincodes,
            service,
            listener: Mutex::new(None),
        })
    }

    /// Start feeding the PKI-ID mapper from `messages`; replaces any
    /// previously started listener. Requires a tokio runtime.
    pub fn start_identity_listener<St>(&self, messages: St)
    where
        St: Stream<Item = GossipMessage> + Send + 'static,
    {
        let handle = self.mapper.spawn_listener(messages);
        if let Some(previous) = self.listener.lock().replace(handle) {
            previous.abort();
        }
    }

    /// The selection service.
    pub fn service(&self) -> &SelectionService<CachedChaincodeDataProvider<P>, GossipMembershipCache<G>> {
        &self.service
    }

    /// PKI-ID to MSP table.
    pub fn mapper(&self) -> &Arc<PkiIdMspMapper> {
        &self.mapper
    }

    /// Cached channel membership.
    pub fn membership(&self) -> &Arc<GossipMembershipCache<G>> {
        &self.membership
    }

    /// Cached chaincode data.
    pub fn chaincodes(&self) -> &Arc<CachedChaincodeDataProvider<P>> {
        &self.chaincodes
    }
}

impl<G, P> EndorserSelectionApi for SelectionContext<G, P>
where
    G: GossipView + 'static,
    P: ChaincodeDataProvider + 'static,
{
    fn get_endorsers_for_chaincode(
        &self,
        channel_id: &str,
        chaincode_ids: &[&str],
    ) -> SelectionResult<Vec<Peer>> {
        self.service.get_endorsers_for_chaincode(channel_id, chaincode_ids)
    }

    fn get_peer_for_events(&self, channel_id: &str) -> SelectionResult<EventSource> {
        self.service.get_peer_for_events(channel_id)
    }
}

impl<G, P> Drop for SelectionContext<G, P>
where
    G: GossipView + 'static,
    P: ChaincodeDataProvider + 'static,
{
    fn drop(&mut self) {
        if let Some(listener) = self.listener.lock().take() {
            listener.abort();
        }
    }
}
