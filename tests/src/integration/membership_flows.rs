//! # Membership Flows
//!
//! Gossip identity updates feeding the PKI-ID mapper, membership caching and
//! endorser selection through a full [`SelectionContext`].
//!
//! [`SelectionContext`]: endorser_selection::SelectionContext

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use endorser_selection::domain::{GossipMessage, PeerIdentity, PkiId, SelectionConfig};
    use endorser_selection::ports::MockChaincodeDataProvider;
    use endorser_selection::{EndorserSelectionApi, ErrorKind, SelectionContext};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};
    use tokio_stream::wrappers::UnboundedReceiverStream;

    const TTL: Duration = Duration::from_millis(20);

    fn identity(pki: u8, msp_id: &str) -> GossipMessage {
        GossipMessage::identity_update(&[PeerIdentity::new(PkiId::new(vec![pki]), msp_id).unwrap()])
            .unwrap()
    }

    async fn wait_for_mapping(ctx: &SelectionContext<SharedGossipView, MockChaincodeDataProvider>, pki: u8, msp_id: &str) {
        timeout(Duration::from_secs(2), async {
            while ctx.mapper().msp_id(&PkiId::new(vec![pki])) != msp_id {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("mapping never arrived");
        // let cached membership expire
        sleep(TTL * 2).await;
    }

    fn context() -> (
        Arc<SharedGossipView>,
        SelectionContext<SharedGossipView, MockChaincodeDataProvider>,
        mpsc::UnboundedSender<GossipMessage>,
    ) {
        selection_telemetry::try_init_for_tests();

        let gossip = Arc::new(SharedGossipView::new());
        gossip.set_members(
            CHANNEL,
            vec![
                member("peer0.org1.example.com:7051", 1),
                member("peer0.org2.example.com:7051", 2),
            ],
        );

        let provider = Arc::new(MockChaincodeDataProvider::new());
        provider.insert(CHANNEL, chaincode("asset", &member_of("Org2MSP")));

        let config = SelectionConfig {
            membership_cache_ttl: TTL,
            ..SelectionConfig::default()
        };
        let ctx = SelectionContext::new(gossip.clone(), provider, config).unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        ctx.start_identity_listener(UnboundedReceiverStream::new(rx));
        (gossip, ctx, tx)
    }

    #[tokio::test]
    async fn endorsers_appear_once_identities_are_gossiped() {
        let (_gossip, ctx, tx) = context();

        let before = ctx.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap();
        assert!(before.is_empty());

        tx.send(identity(1, "Org1MSP")).unwrap();
        tx.send(identity(2, "Org2MSP")).unwrap();
        wait_for_mapping(&ctx, 2, "Org2MSP").await;

        let endorsers = ctx.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap();
        assert_eq!(endorsers.len(), 1);
        assert_eq!(endorsers[0].url, "peer0.org2.example.com:7051");
    }

    #[tokio::test]
    async fn identity_override_moves_peer_between_orgs() {
        let (_gossip, ctx, tx) = context();

        tx.send(identity(2, "Org2MSP")).unwrap();
        wait_for_mapping(&ctx, 2, "Org2MSP").await;
        assert_eq!(ctx.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap().len(), 1);

        tx.send(identity(2, "Org3MSP")).unwrap();
        wait_for_mapping(&ctx, 2, "Org3MSP").await;
        assert!(ctx
            .get_endorsers_for_chaincode(CHANNEL, &["asset"])
            .unwrap()
            .is_empty());
        assert_eq!(ctx.mapper().msp_id(&PkiId::new(vec![9])), "");
    }

    #[tokio::test]
    async fn membership_changes_reach_cached_resolver() {
        let (gossip, ctx, tx) = context();
        tx.send(identity(2, "Org2MSP")).unwrap();
        tx.send(identity(3, "Org2MSP")).unwrap();
        wait_for_mapping(&ctx, 3, "Org2MSP").await;

        gossip.set_members(CHANNEL, vec![member("peer1.org2.example.com:7051", 3)]);
        sleep(TTL * 2).await;

        let endorsers = ctx.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap();
        assert_eq!(endorsers[0].url, "peer1.org2.example.com:7051");
        assert_eq!(ctx.service().resolver_count(), 1);
    }

    #[tokio::test]
    async fn peer_for_events_uses_local_event_port() {
        let (_gossip, ctx, tx) = context();

        let err = ctx.get_peer_for_events(CHANNEL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        tx.send(identity(1, "Org1MSP")).unwrap();
        wait_for_mapping(&ctx, 1, "Org1MSP").await;

        let source = ctx.get_peer_for_events(CHANNEL).unwrap();
        assert_eq!(source.peer.msp_id, "Org1MSP");
        assert_eq!(source.event_address, "peer0.org1.example.com:7053");
    }
}
