//! # Endorser Selection Benchmarks
//!
//! | Path | Expectation |
//! |------|-------------|
//! | Cached resolve | per-request cost, no policy work |
//! | Resolver build | compile + reduce, paid once per key |
//! | Nof | C(n,k) combinations |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use endorser_selection::algorithms::{PeerGroupResolver, RoundRobinLbp, SignaturePolicyCompiler};
use endorser_selection::domain::policy::{n_out_of, signed_by};
use endorser_selection::domain::SelectionConfig;
use endorser_selection::{Group, GroupOfGroups, PeerGroup, PeerRetriever};
use selection_tests::fixtures::*;
use std::sync::Arc;
use std::time::Duration;

fn retriever() -> PeerRetriever {
    let peers = four_org_peers();
    Arc::new(move |msp: &str| peers.iter().filter(|p| p.msp_id == msp).cloned().collect())
}

fn bench_cached_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection-service");
    group.measurement_time(Duration::from_secs(5));

    let (_, _, service) = service_with(
        four_org_peers(),
        &[("asset", org1_plus_partner_policy()), ("token", member_of("Org2MSP"))],
        SelectionConfig::default(),
    );

    group.bench_function("get_endorsers_single_chaincode", |b| {
        b.iter(|| black_box(service.get_endorsers_for_chaincode(CHANNEL, &["asset"])))
    });
    group.bench_function("get_endorsers_two_chaincodes", |b| {
        b.iter(|| black_box(service.get_endorsers_for_chaincode(CHANNEL, &["asset", "token"])))
    });

    group.finish();
}

fn bench_resolver_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver-build");
    let compiler = SignaturePolicyCompiler::new(retriever());
    let envelope = org1_plus_partner_policy();

    group.bench_function("compile_and_reduce_nested", |b| {
        b.iter(|| {
            let compiled = compiler.compile(black_box(&envelope)).ok();
            compiled.and_then(|gog| PeerGroupResolver::new(&gog, Box::new(RoundRobinLbp::new())).ok())
        })
    });

    for n in [3, 5, 7] {
        let msp_ids: Vec<String> = (1..=n).map(|i| format!("Org{i}MSP")).collect();
        let ids: Vec<&str> = msp_ids.iter().map(String::as_str).collect();
        let policy = envelope_for_majority(&ids);
        group.bench_with_input(BenchmarkId::new("majority_of", n), &policy, |b, policy| {
            b.iter(|| compiler.compile(black_box(policy)).map(|gog| gog.reduce().len()))
        });
    }

    group.finish();
}

fn envelope_for_majority(msp_ids: &[&str]) -> endorser_selection::SignaturePolicyEnvelope {
    let threshold = (msp_ids.len() / 2 + 1) as i32;
    envelope(
        n_out_of(threshold, (0..msp_ids.len() as i32).map(signed_by).collect()),
        msp_ids,
    )
}

fn bench_nof(c: &mut Criterion) {
    let mut group = c.benchmark_group("group-algebra");
    let r = retriever();

    for n in [4, 8, 12] {
        let groups: Vec<Group> = (0..n)
            .map(|i| Group::Peers(PeerGroup::msp(format!("Org{i}MSP"), r.clone())))
            .collect();
        let gog = GroupOfGroups::new(groups);
        group.bench_with_input(BenchmarkId::new("nof_half", n), &gog, |b, gog| {
            b.iter(|| gog.nof(black_box(n as i32 / 2)).map(|g| g.len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cached_resolve, bench_resolver_build, bench_nof);
criterion_main!(benches);
