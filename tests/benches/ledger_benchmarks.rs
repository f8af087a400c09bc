//! # Secure Messaging Ledger Benchmarks
//!
//! Throughput of the hot transitions and reads:
//!
//! | Component | Operation | Expectation |
//! |-----------|-----------|-------------|
//! | sm-01 Identity Registry | register | O(log n) in registered agents |
//! | sm-02 Message Ledger | send | O(log n) in messages |
//! | sm-02 Message Ledger | agent history page | O(offset + limit) |
//! | sm-03 Ledger Engine | state digest | O(state size) |
//! | shared-types | integrity tag | constant |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::AgentId;
use sm_01_identity_registry::identity_integrity_tag;
use sm_02_message_ledger::message_integrity_tag;
use sm_tests::benchmarks::{long_history, mixed_sends, registrations};
use sm_tests::{agent, fresh_engine};
use std::time::Duration;

// ============================================================================
// SM-01: Registration
// ============================================================================

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm-01-identity-registry");
    group.measurement_time(Duration::from_secs(10));

    for size in [100u32, 1_000, 5_000] {
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("register", size), &size, |b, &size| {
            b.iter_batched(
                || (fresh_engine(), registrations(size)),
                |(mut engine, txs)| black_box(engine.replay(txs)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

// ============================================================================
// SM-02: Sends and reads
// ============================================================================

fn bench_sends(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm-02-message-ledger");

    for size in [100usize, 1_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("mixed_sends", size), &size, |b, &size| {
            b.iter_batched(
                || mixed_sends(size, 42),
                |(mut engine, txs)| black_box(engine.replay(txs)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    let engine = long_history(5_000);
    for offset in [0usize, 2_500, 4_900] {
        group.bench_with_input(
            BenchmarkId::new("agent_messages_page", offset),
            &offset,
            |b, &offset| b.iter(|| black_box(engine.agent_messages(agent(1), agent(1), offset, 100))),
        );
    }
    group.bench_function("conversation_tail", |b| {
        b.iter(|| black_box(engine.conversation(agent(1), agent(1), agent(2), 50)))
    });

    group.finish();
}

// ============================================================================
// SM-03: Checkpointing
// ============================================================================

fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm-03-ledger-engine");

    for history in [1_000usize, 10_000] {
        let engine = long_history(history);
        group.bench_with_input(BenchmarkId::new("state_digest", history), &engine, |b, e| {
            b.iter(|| black_box(e.state_digest()))
        });
        group.bench_with_input(BenchmarkId::new("snapshot", history), &engine, |b, e| {
            b.iter(|| black_box(e.snapshot()))
        });
    }

    group.finish();
}

// ============================================================================
// Integrity tags
// ============================================================================

fn bench_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrity-tags");
    let from = AgentId([0x11; 20]);
    let to = AgentId([0x22; 20]);
    let fingerprint = [0x33; 32];

    group.bench_function("identity_tag", |b| {
        b.iter(|| black_box(identity_integrity_tag(black_box(&from), black_box(&fingerprint))))
    });
    group.bench_function("message_tag", |b| {
        b.iter(|| {
            black_box(message_integrity_tag(
                black_box(&from),
                black_box(&to),
                black_box(&fingerprint),
                black_box(1_700_000_000),
            ))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_registration, bench_sends, bench_digest, bench_tags);
criterion_main!(benches);
