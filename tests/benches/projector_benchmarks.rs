//! # Ledger Projector Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | address | bech32 re-encoding of one address |
//! | dispatch/vote | vote projection, no chain query |
//! | dispatch/submit_proposal | event lookup, query, content decode, two writes |
//! | dispatch/multi_send | balance refresh for N distinct accounts |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ledger_projector::domain::address::convert;
use ledger_projector::test_utils::*;
use shared_types::{
    ChainBalance, Coin, Msg, MsgMultiSend, MsgSubmitProposal, MsgVote, MultiSendLeg, StringEvent,
    VoteOption,
};

fn bench_address_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("address");
    let account = native_account(7);
    let operator = native_operator(7);

    group.bench_function("convert_account", |b| {
        b.iter(|| convert(black_box("like"), black_box(&account)))
    });
    group.bench_function("convert_operator", |b| {
        b.iter(|| convert(black_box("likevaloper"), black_box(&operator)))
    });

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let harness = Harness::new();
    let dispatcher = harness.dispatcher();

    let vote_tx = tx_with_events(100, vec![(0, vec![StringEvent::new("proposal_vote", vec![])])]);
    let vote = Msg::from(MsgVote {
        proposal_id: 1,
        voter: native_account(1),
        option: VoteOption::Yes,
    });
    group.bench_function("vote", |b| {
        b.iter(|| dispatcher.dispatch(0, black_box(&vote), &vote_tx))
    });

    let content = text_content("Benchmark");
    harness.chain.insert_proposal(100, chain_proposal(42, content.clone())).unwrap();
    let submit_tx = tx_with_events(100, vec![(0, vec![submit_proposal_event("42")])]);
    let submit = Msg::from(MsgSubmitProposal {
        content: content.to_any(),
        initial_deposit: vec![Coin::new(1000, "nanolike")],
        proposer: native_account(1),
    });
    group.bench_function("submit_proposal", |b| {
        b.iter(|| dispatcher.dispatch(0, black_box(&submit), &submit_tx))
    });

    for size in [2u8, 16, 64] {
        for n in 0..size {
            harness.chain.insert_balance(
                100,
                ChainBalance {
                    address: native_account(n),
                    balance: vec![Coin::new(u128::from(n) * 10, "nanolike")],
                },
            ).unwrap();
        }
        let legs = |range: std::ops::Range<u8>| -> Vec<MultiSendLeg> {
            range
                .map(|n| MultiSendLeg {
                    address: native_account(n),
                    coins: vec![Coin::new(1, "nanolike")],
                })
                .collect()
        };
        let msg = Msg::from(MsgMultiSend {
            inputs: legs(0..1),
            outputs: legs(1..size),
        });
        let tx = tx_with_events(100, vec![(0, vec![transfer_event()])]);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("multi_send", size), &msg, |b, msg| {
            b.iter(|| dispatcher.dispatch(0, black_box(msg), &tx))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_address_conversion, bench_dispatch);
criterion_main!(benches);
