//! Performance benchmarks for oxihuff
//!
//! This benchmark suite evaluates:
//! - Encode/decode throughput across data patterns
//! - Cost of each encoder stage (counting, tree, canonical codes)
//! - Container serialization and parsing
//! - Sequential versus parallel frequency counting

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxihuff::{
    CanonicalCode, CodeTree, CodecConfig, CompressedArtifact, FrequencyTable, decode, encode,
};
use std::hint::black_box;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Uniform data - one symbol, one bit per byte
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random data - all 256 symbols with near-equal weight
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Text-like data - realistic scenario
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! \
                     Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
        text.iter().copied().cycle().take(size).collect()
    }

    /// Skewed data - doubling weights produce long codes
    pub fn skewed(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0xDEADBEEFCAFEBABE;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            // Symbol k appears with probability ~2^-(k+1)
            let symbol = ((seed >> 32) as u32).leading_zeros().min(31) as u8;
            data.push(symbol);
        }
        data
    }
}

/// Standard data sizes for benchmarking
mod data_sizes {
    pub const SMALL: usize = 4 * 1024; // 4 KB
    pub const MEDIUM: usize = 64 * 1024; // 64 KB
    pub const LARGE: usize = 1024 * 1024; // 1 MB
}

const PATTERNS: [(&str, PatternGenerator); 4] = [
    ("uniform", test_data::uniform as PatternGenerator),
    ("random", test_data::random as PatternGenerator),
    ("text", test_data::text_like as PatternGenerator),
    ("skewed", test_data::skewed as PatternGenerator),
];

/// Benchmark encoding speed for different data types
fn bench_encode_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_data_types");
    let size = data_sizes::MEDIUM;

    for (name, generator) in PATTERNS {
        let data = generator(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(encode(black_box(data))));
        });
    }

    group.finish();
}

/// Benchmark decoding speed for different data types
fn bench_decode_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_data_types");
    let size = data_sizes::MEDIUM;

    for (name, generator) in PATTERNS {
        let artifact = encode(&generator(size));
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &artifact, |b, artifact| {
            b.iter(|| black_box(decode(black_box(artifact)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark the encoder stages separately
fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let data = test_data::text_like(data_sizes::MEDIUM);
    let table = FrequencyTable::from_bytes(&data);
    let tree = CodeTree::build(&table).unwrap();

    group.bench_function("frequency_table", |b| {
        b.iter(|| black_box(FrequencyTable::from_bytes(black_box(&data))));
    });
    group.bench_function("code_tree", |b| {
        b.iter(|| black_box(CodeTree::build(black_box(&table))));
    });
    group.bench_function("canonical_code", |b| {
        b.iter(|| black_box(CanonicalCode::from_tree(black_box(&tree))));
    });

    group.finish();
}

/// Benchmark container serialization and parsing
fn bench_container(c: &mut Criterion) {
    let mut group = c.benchmark_group("container");
    let artifact = encode(&test_data::random(data_sizes::SMALL));
    let bytes = artifact.to_bytes();

    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("to_bytes", |b| {
        b.iter(|| black_box(black_box(&artifact).to_bytes()));
    });
    group.bench_function("from_bytes", |b| {
        b.iter(|| black_box(CompressedArtifact::from_bytes(black_box(&bytes)).unwrap()));
    });

    group.finish();
}

/// Benchmark frequency counting with and without the parallel path
fn bench_counting(c: &mut Criterion) {
    let mut group = c.benchmark_group("frequency_counting");
    let data = test_data::random(data_sizes::LARGE);

    let configs = [
        ("sequential", CodecConfig::new().with_parallel_threshold(usize::MAX)),
        ("default", CodecConfig::new()),
        ("eager", CodecConfig::new().with_parallel_threshold(0)),
    ];

    group.throughput(Throughput::Bytes(data.len() as u64));
    for (name, config) in configs {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| black_box(FrequencyTable::from_bytes_with_config(black_box(&data), config)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_data_types,
    bench_decode_data_types,
    bench_stages,
    bench_container,
    bench_counting
);
criterion_main!(benches);
