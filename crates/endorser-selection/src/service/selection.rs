//! Selection Service - endorser selection entry point
//!
//! Compiles chaincode endorsement policies into peer group resolvers, caches
//! one resolver per `(channel, sorted chaincodes)` and resolves it against
//! live membership on every request.

use crate::algorithms::{PeerGroupResolver, SignaturePolicyCompiler};
use crate::domain::{
    EventSource, Group, GroupOfGroups, Peer, PeerRetriever, ResolverKey, SelectionConfig,
    SelectionError, SelectionResult,
};
use crate::ports::{
    ChaincodeDataProvider, EndorserSelectionApi, LoadBalancePolicy, MembershipManager,
};
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

type LoadBalanceFactory = Box<dyn Fn() -> Box<dyn LoadBalancePolicy> + Send + Sync>;

/// Endorser selection over chaincode policies and channel membership.
pub struct SelectionService<P, M>
where
    P: ChaincodeDataProvider,
    M: MembershipManager + 'static,
{
    chaincode_provider: Arc<P>,
    membership: Arc<M>,
    config: SelectionConfig,
    resolvers: RwLock<HashMap<ResolverKey, Arc<PeerGroupResolver>>>,
    lbp_factory: LoadBalanceFactory,
}

impl<P, M> SelectionService<P, M>
where
    P: ChaincodeDataProvider,
    M: MembershipManager + 'static,
{
    /// Service using the load-balance kind from `config`.
    pub fn new(chaincode_provider: Arc<P>, membership: Arc<M>, config: SelectionConfig) -> Self {
        let kind = config.load_balance;
        Self {
            chaincode_provider,
            membership,
            config,
            resolvers: RwLock::new(HashMap::new()),
            lbp_factory: Box::new(move || kind.build()),
        }
    }

    /// Use `factory` to create the load-balance policy of each new resolver.
    #[must_use]
    pub fn with_load_balance_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn LoadBalancePolicy> + Send + Sync + 'static,
    {
        self.lbp_factory = Box::new(factory);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Number of cached resolvers.
    pub fn resolver_count(&self) -> usize {
        self.resolvers.read().len()
    }

    /// Drop every cached resolver; the next request recompiles.
    pub fn clear_resolver_cache(&self) {
        let mut resolvers = self.resolvers.write();
        info!(resolvers = resolvers.len(), "Clearing resolver cache");
        resolvers.clear();
    }

    /// Peers satisfying every chaincode policy at once.
    ///
    /// Returns an empty list when the policies are valid but no combination
    /// of live peers satisfies them right now.
    pub fn get_endorsers_for_chaincode(
        &self,
        channel_id: &str,
        chaincode_ids: &[&str],
    ) -> SelectionResult<Vec<Peer>> {
        if chaincode_ids.is_empty() {
            return Err(SelectionError::NoChaincodes);
        }
        let key = ResolverKey::new(channel_id, chaincode_ids);

        let resolver = self.resolver(&key).map_err(|e| unavailable(&key, e))?;

        let membership = self.membership.get_peers_of_channel(channel_id);
        if membership.is_hard_failure() {
            if let Some(err) = membership.query_error {
                return Err(unavailable(&key, err));
            }
        }

        let peers = resolver.resolve().peers();
        debug!(
            key = %key,
            endorsers = ?peers.iter().map(|p| p.url.as_str()).collect::<Vec<_>>(),
            "Selected endorsers"
        );
        Ok(peers)
    }

    /// A random live channel peer to register for events, addressed at the
    /// configured event port.
    pub fn get_peer_for_events(&self, channel_id: &str) -> SelectionResult<EventSource> {
        let membership = self.membership.get_peers_of_channel(channel_id);
        if membership.is_hard_failure() {
            if let Some(err) = membership.query_error {
                return Err(err);
            }
        }

        let peer = membership
            .peers
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| SelectionError::NoPeers {
                channel_id: channel_id.to_string(),
            })?;
        let event_address = format!("{}:{}", peer.host(), self.config.event_port);
        debug!(channel_id = %channel_id, peer = %peer, event_address = %event_address, "Selected event source");
        Ok(EventSource {
            peer,
            event_address,
        })
    }

    fn resolver(&self, key: &ResolverKey) -> SelectionResult<Arc<PeerGroupResolver>> {
        if let Some(resolver) = self.resolvers.read().get(key) {
            return Ok(resolver.clone());
        }

        let mut resolvers = self.resolvers.write();
        if let Some(resolver) = resolvers.get(key) {
            return Ok(resolver.clone());
        }

        debug!(key = %key, "Resolver cache miss, building resolver");
        let resolver = Arc::new(self.build_resolver(key)?);
        resolvers.insert(key.clone(), resolver.clone());
        Ok(resolver)
    }

    fn build_resolver(&self, key: &ResolverKey) -> SelectionResult<PeerGroupResolver> {
        let compiler = SignaturePolicyCompiler::new(self.channel_retriever(key.channel_id()));

        let mut policy_groups = Vec::with_capacity(key.chaincode_ids().len());
        for chaincode_id in key.chaincode_ids() {
            let data = self
                .chaincode_provider
                .query_chaincode_data(key.channel_id(), chaincode_id)?;
            let compiled = compiler.compile_bytes(&data.policy)?;
            debug!(chaincode = %chaincode_id, version = %data.version, "Compiled endorsement policy");
            policy_groups.push(Group::OfGroups(compiled));
        }

        let threshold = i32::try_from(policy_groups.len()).map_err(|_| {
            SelectionError::InvalidThreshold {
                threshold: i32::MAX,
                available: policy_groups.len(),
            }
        })?;
        let combined = GroupOfGroups::new(policy_groups).nof(threshold)?;
        PeerGroupResolver::new(&combined, (self.lbp_factory)())
    }

    fn channel_retriever(&self, channel_id: &str) -> PeerRetriever {
        let membership = self.membership.clone();
        let channel_id = channel_id.to_string();
        Arc::new(move |msp_id: &str| {
            membership
                .get_peers_of_channel(&channel_id)
                .peers
                .into_iter()
                .filter(|peer| peer.msp_id == msp_id)
                .collect()
        })
    }
}

impl<P, M> EndorserSelectionApi for SelectionService<P, M>
where
    P: ChaincodeDataProvider,
    M: MembershipManager + 'static,
{
    fn get_endorsers_for_chaincode(
        &self,
        channel_id: &str,
        chaincode_ids: &[&str],
    ) -> SelectionResult<Vec<Peer>> {
        SelectionService::get_endorsers_for_chaincode(self, channel_id, chaincode_ids)
    }

    fn get_peer_for_events(&self, channel_id: &str) -> SelectionResult<EventSource> {
        SelectionService::get_peer_for_events(self, channel_id)
    }
}

fn unavailable(key: &ResolverKey, source: SelectionError) -> SelectionError {
    SelectionError::EndorsersUnavailable {
        channel_id: key.channel_id().to_string(),
        chaincodes: key.chaincode_ids().join(","),
        source: Box::new(source),
    }
}
