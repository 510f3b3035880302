//! Throughput Benchmark for kvfacade
//!
//! Measures the client-side cost of a round trip: framing replies out of a
//! byte buffer, decoding them with reply policies and encoding commands.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kvfacade::facade::decode::{ArrayOfBulkOrMissing, Bool01, ScoredArray};
use kvfacade::{Command, KvFacade, ReplyPolicy, RespParser, RespValue, ScriptedConnection};

fn bulk_array(len: usize, missing_every: usize) -> RespValue {
    RespValue::array(
        (0..len)
            .map(|i| {
                if missing_every > 0 && i % missing_every == 0 {
                    RespValue::Null
                } else {
                    RespValue::bulk_string(Bytes::from(format!("value:{}", i)))
                }
            })
            .collect(),
    )
}

/// Benchmark reply framing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let integer = RespValue::integer(1).serialize();
    group.throughput(Throughput::Bytes(integer.len() as u64));
    group.bench_function("integer", |b| {
        let mut parser = RespParser::new();
        b.iter(|| black_box(parser.parse(black_box(&integer))));
    });

    let large = RespValue::bulk_string(Bytes::from("x".repeat(64 * 1024))).serialize();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("bulk_64kb", |b| {
        let mut parser = RespParser::new();
        b.iter(|| black_box(parser.parse(black_box(&large))));
    });

    let mget = bulk_array(100, 10).serialize();
    group.throughput(Throughput::Bytes(mget.len() as u64));
    group.bench_function("mget_100", |b| {
        let mut parser = RespParser::new();
        b.iter(|| black_box(parser.parse(black_box(&mget))));
    });

    // A large SMEMBERS-style reply arriving over many socket reads.
    let members = bulk_array(200_000, 0).serialize();
    group.throughput(Throughput::Bytes(members.len() as u64));
    group.bench_function("array_200k_in_64kb_reads", |b| {
        let mut parser = RespParser::new();
        b.iter(|| {
            let mut end = 0;
            loop {
                end = (end + 64 * 1024).min(members.len());
                if let Some(found) = parser.parse(black_box(&members[..end])).unwrap() {
                    break black_box(found);
                }
            }
        });
    });

    group.finish();
}

/// Benchmark reply policies
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("bool01", |b| {
        b.iter(|| black_box(Bool01::decode(black_box(RespValue::integer(1)))));
    });

    group.bench_function("wrongtype_error", |b| {
        b.iter(|| {
            black_box(Bool01::decode(black_box(RespValue::error(
                "WRONGTYPE Operation against a key holding the wrong kind of value",
            ))))
        });
    });

    let mget = bulk_array(100, 10);
    group.bench_function("array_of_bulk_or_missing_100", |b| {
        b.iter(|| black_box(ArrayOfBulkOrMissing::decode(mget.clone())));
    });

    let scored = RespValue::array(
        (0..50)
            .flat_map(|i| {
                [
                    RespValue::bulk_string(Bytes::from(format!("member:{}", i))),
                    RespValue::bulk_string(Bytes::from(format!("{}.5", i))),
                ]
            })
            .collect(),
    );
    group.bench_function("scored_array_50", |b| {
        b.iter(|| black_box(ScoredArray::decode(scored.clone())));
    });

    group.finish();
}

/// Benchmark command encoding and a full façade call over a scripted transport
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        b.iter(|| {
            let cmd = Command::new("SET").arg("user:101").arg("small_value");
            black_box(cmd.serialize())
        });
    });

    let keys: Vec<String> = (0..100).map(|i| format!("key:{}", i)).collect();
    group.bench_function("mget_100", |b| {
        b.iter(|| black_box(Command::new("MGET").args(&keys).serialize()));
    });

    group.bench_function("facade_sismember", |b| {
        b.iter(|| {
            let mut conn = ScriptedConnection::new();
            conn.push_reply(RespValue::integer(1));
            let mut kv = KvFacade::new(conn);
            black_box(tokio_test::block_on(kv.sismember("online", "ariz")))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_decode, bench_encode);
criterion_main!(benches);
