//! # Policy Scenarios
//!
//! Endorsement policies compiled by the selection service and resolved
//! against a fixed channel membership.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use endorser_selection::algorithms::{PeerGroupResolver, RandomLbp, SignaturePolicyCompiler};
    use endorser_selection::domain::policy::{n_out_of, signed_by};
    use endorser_selection::domain::{LoadBalanceKind, SelectionConfig};
    use endorser_selection::{Peer, PeerRetriever};
    use std::collections::{BTreeSet, HashSet};
    use std::sync::Arc;

    fn msp_set(peers: &[Peer]) -> BTreeSet<String> {
        peers.iter().map(|p| p.msp_id.clone()).collect()
    }

    fn orgs(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| format!("{id}MSP")).collect()
    }

    #[test]
    fn signed_by_one_org_never_returns_other_orgs() {
        selection_telemetry::try_init_for_tests();
        let peers = vec![peer(1, "Org1"), peer(2, "Org1"), peer(3, "Org2")];
        let (_, _, service) = service_with(
            peers,
            &[("asset", member_of("Org1MSP"))],
            SelectionConfig::default(),
        );

        let allowed: HashSet<Peer> = [peer(1, "Org1"), peer(2, "Org1")].into_iter().collect();
        for _ in 0..50 {
            let endorsers = service.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap();
            assert!(!endorsers.is_empty());
            assert!(endorsers.iter().all(|p| allowed.contains(p)));
        }
    }

    #[test]
    fn nested_policy_yields_only_admitted_combinations() {
        selection_telemetry::try_init_for_tests();
        let (_, _, service) = service_with(
            four_org_peers(),
            &[("asset", org1_plus_partner_policy())],
            SelectionConfig {
                load_balance: LoadBalanceKind::Random,
                ..SelectionConfig::default()
            },
        );

        let admitted = [
            orgs(&["Org1", "Org2"]),
            orgs(&["Org1", "Org3"]),
            orgs(&["Org1", "Org4"]),
            orgs(&["Org1", "Org3", "Org4"]),
        ];

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let endorsers = service.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap();
            let msps = msp_set(&endorsers);
            assert!(admitted.contains(&msps), "unexpected combination {msps:?}");
            // one peer per implicated org
            assert_eq!(endorsers.len(), msps.len());
            seen.insert(msps);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn two_thresholds_policy_also_admits_org3_with_org4() {
        let retriever: PeerRetriever = Arc::new(|msp: &str| {
            four_org_peers()
                .into_iter()
                .filter(|p| p.msp_id == msp)
                .collect()
        });
        let compiled = SignaturePolicyCompiler::new(retriever)
            .compile(&one_of_two_thresholds_policy())
            .unwrap();
        let resolver = PeerGroupResolver::new(&compiled, Box::new(RandomLbp::new())).unwrap();

        let combinations: HashSet<BTreeSet<String>> = resolver
            .peer_groups()
            .iter()
            .map(|group| msp_set(&group.peers()))
            .collect();
        assert_eq!(
            combinations,
            HashSet::from([
                orgs(&["Org1", "Org2"]),
                orgs(&["Org1", "Org3"]),
                orgs(&["Org1", "Org4"]),
                orgs(&["Org3", "Org4"]),
            ])
        );
    }

    #[test]
    fn org_without_live_peers_gives_empty_endorsers() {
        let (_, _, service) = service_with(
            vec![peer(0, "Org1")],
            &[(
                "asset",
                envelope(
                    n_out_of(2, vec![signed_by(0), signed_by(1)]),
                    &["Org1MSP", "Org5MSP"],
                ),
            )],
            SelectionConfig::default(),
        );

        let endorsers = service.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap();
        assert!(endorsers.is_empty());
    }

    #[test]
    fn chaincode_order_does_not_matter() {
        let (provider, _, service) = service_with(
            four_org_peers(),
            &[("cc1", member_of("Org1MSP")), ("cc2", member_of("Org2MSP"))],
            SelectionConfig::default(),
        );

        let first = service.get_endorsers_for_chaincode(CHANNEL, &["cc1", "cc2"]).unwrap();
        let second = service.get_endorsers_for_chaincode(CHANNEL, &["cc2", "cc1"]).unwrap();

        assert_eq!(msp_set(&first), orgs(&["Org1", "Org2"]));
        assert_eq!(msp_set(&second), orgs(&["Org1", "Org2"]));
        assert_eq!(service.resolver_count(), 1);
        assert_eq!(provider.query_count(), 2);
    }

    #[test]
    fn round_robin_visits_every_alternative() {
        let peers = vec![peer(0, "Org1"), peer(0, "Org2"), peer(0, "Org3"), peer(0, "Org4")];
        let (_, _, service) = service_with(
            peers.clone(),
            &[(
                "asset",
                envelope(
                    n_out_of(1, (0..4).map(signed_by).collect()),
                    &["Org1MSP", "Org2MSP", "Org3MSP", "Org4MSP"],
                ),
            )],
            SelectionConfig::default(),
        );

        // seeds the starting position
        service.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap();
        for _ in 0..5 {
            let window: HashSet<Peer> = (0..peers.len())
                .flat_map(|_| service.get_endorsers_for_chaincode(CHANNEL, &["asset"]).unwrap())
                .collect();
            assert_eq!(window.len(), peers.len());
        }
    }
}
