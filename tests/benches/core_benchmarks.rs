//! # Mini-Chain Core Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | shared-types | header hash, merkle root |
//! | mc-01 Block Production | nonce search at an easy target |
//! | mc-02 Block Storage | append on the in-memory store |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mc_01_block_production::domain::{genesis_coinbase_tx, new_coinbase_tx};
use mc_01_block_production::{
    BlockAssembler, FixedTimeSource, NeverStop, PoWConfig, PoWMiner, EASY_BITS,
};
use mc_02_block_storage::{ChainStore, InMemoryKVStore};
use shared_types::{build_merkle_root, sha256d, BlockHeader, Hash};

fn header(bits: u32) -> BlockHeader {
    BlockHeader {
        version: 1,
        prev_block_hash: [0x11; 32],
        merkle_root: [0x22; 32],
        timestamp: 1_700_000_000,
        bits,
        nonce: 0,
    }
}

// ============================================================================
// SHARED TYPES
// ============================================================================

fn bench_header_hash(c: &mut Criterion) {
    let header = header(EASY_BITS);
    c.bench_function("header_hash", |b| b.iter(|| black_box(header.hash())));
}

fn bench_merkle_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle_root");
    for size in [1usize, 16, 256, 2048] {
        let leaves: Vec<Hash> = (0..size as u64).map(|i| sha256d(&i.to_le_bytes())).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &leaves, |b, leaves| {
            b.iter(|| black_box(build_merkle_root(leaves)))
        });
    }
    group.finish();
}

// ============================================================================
// MC-01: Block Production
// ============================================================================

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("mc-01-mining");
    let miner = PoWMiner::new(PoWConfig::with_bits(EASY_BITS));
    // roughly 1 in 2^16 hashes qualifies at 0x1f00ffff
    for bits in [EASY_BITS, 0x1f00_ffff] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{bits:#010x}")), &bits, |b, &bits| {
            let template = header(bits);
            b.iter(|| black_box(miner.mine(&template, &NeverStop)))
        });
    }
    group.finish();
}

// ============================================================================
// MC-02: Block Storage
// ============================================================================

fn bench_append(c: &mut Criterion) {
    let assembler = || BlockAssembler::new(PoWConfig::with_bits(EASY_BITS), FixedTimeSource(1_700_000_000));
    let genesis = assembler()
        .assemble_genesis(genesis_coinbase_tx("bench"), EASY_BITS)
        .expect("genesis");
    let mut chain = ChainStore::initialize_in(InMemoryKVStore::new(), genesis, assembler())
        .expect("initialize");

    let mut n = 0u64;
    c.bench_function("mc-02-append-in-memory", |b| {
        b.iter(|| {
            n += 1;
            black_box(chain.append_block(vec![new_coinbase_tx("bench", &n.to_string())]))
        })
    });
}

criterion_group!(benches, bench_header_hash, bench_merkle_root, bench_mining, bench_append);
criterion_main!(benches);
