//! Benchmarks for the Ed25519 engine.
//!
//! Covers key generation, signing, and verification across a range of
//! message sizes, with a fixed RNG for reproducibility.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ed25519_core::Ed25519;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Message sizes to benchmark (in bytes)
const MESSAGE_SIZES: &[usize] = &[
    32,    // Small message (hash size)
    256,   // Medium message
    1024,  // 1 KB
    16384, // 16 KB
];

fn bench_keypair(c: &mut Criterion) {
    let mut group = c.benchmark_group("ed25519_keypair");

    // Fixed RNG for reproducibility
    let mut rng = ChaCha20Rng::from_seed([42u8; 32]);

    group.bench_function("random", |b| {
        b.iter(|| {
            let _ = black_box(Ed25519::keypair(&mut rng).unwrap());
        });
    });

    let seed = [7u8; 32];
    group.bench_function("from_seed", |b| {
        b.iter(|| {
            let _ = black_box(Ed25519::keypair_from_seed(black_box(&seed)));
        });
    });

    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("ed25519_sign");

    let mut rng = ChaCha20Rng::from_seed([42u8; 32]);
    let (_, private) = Ed25519::keypair(&mut rng).unwrap();

    for size in MESSAGE_SIZES {
        let message = vec![0xa5u8; *size];
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let _ = black_box(Ed25519::sign(black_box(&message), &private));
            });
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("ed25519_verify");

    let mut rng = ChaCha20Rng::from_seed([42u8; 32]);
    let (public, private) = Ed25519::keypair(&mut rng).unwrap();

    for size in MESSAGE_SIZES {
        let message = vec![0xa5u8; *size];
        let signature = Ed25519::sign(&message, &private);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let _ = black_box(Ed25519::verify(black_box(&message), &signature, &public));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_keypair, bench_sign, bench_verify);
criterion_main!(benches);
