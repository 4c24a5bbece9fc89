use aces::{CharsetRegistry, Coding, CodingConfig, decode, encode};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn get_coding(name: &str) -> Coding {
    let registry = CharsetRegistry::load_default().unwrap();
    let preset = registry.get_charset(name).unwrap();
    let config = CodingConfig {
        mode: preset.mode,
        ..CodingConfig::default()
    };
    Coding::with_config(preset.to_charset().unwrap(), &config).unwrap()
}

const SIZES: [usize; 4] = [64, 1024, 16384, 262144];

fn bench_encode(c: &mut Criterion, name: &str) {
    let coding = get_coding(name);
    let mut group = c.benchmark_group(format!("encode_{}", name));

    for size in SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| encode(black_box(data), black_box(&coding)));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion, name: &str) {
    let coding = get_coding(name);
    let mut group = c.benchmark_group(format!("decode_{}", name));

    for size in SIZES {
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
        let encoded = encode(&data, &coding);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| decode(black_box(encoded), black_box(&coding)).unwrap());
        });
    }
    group.finish();
}

fn bench_packed(c: &mut Criterion) {
    bench_encode(c, "base64");
    bench_decode(c, "base64");
    bench_encode(c, "aces");
    bench_decode(c, "aces");
}

fn bench_chunked(c: &mut Criterion) {
    bench_encode(c, "dice");
    bench_decode(c, "dice");
    bench_encode(c, "base58_chunked");
    bench_decode(c, "base58_chunked");
}

fn bench_static(c: &mut Criterion) {
    let coding = get_coding("base58");
    let mut group = c.benchmark_group("encode_base58_static");

    // quadratic in the input length, so keep it small
    for size in [32usize, 256, 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| encode(black_box(data), black_box(&coding)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_packed, bench_chunked, bench_static);
criterion_main!(benches);
