//! # Verity Worker Benchmarks
//!
//! Throughput checks for the hot paths of the attestation pipeline:
//!
//! | Stage | Primitive | Notes |
//! |-------|-----------|-------|
//! | Blob verification | SHA-256 content hash | dominates large posts |
//! | Attestation digest | Keccak-256 over post coordinates | per anchored post |
//! | Custody response | Keccak digest + ECDSA signature | per challenge |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

use verity_crypto::{attestation_message, content_hash, custody_message, SigningIdentity};
use verity_types::{Address, CustodyWitness, PostId, H256};

fn random_blob(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

// ============================================================================
// Blob verification: hashing is the whole cost of the integrity check
// ============================================================================

fn bench_blob_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("blob-verification");
    group.measurement_time(Duration::from_secs(10));

    let sizes = [1024, 64 * 1024, 1024 * 1024];
    for size in sizes {
        let blob = random_blob(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("content_hash", size), &blob, |b, blob| {
            b.iter(|| black_box(content_hash(blob)))
        });
    }

    group.finish();
}

// ============================================================================
// Attestation digests: one per anchored post
// ============================================================================

fn bench_attestation_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("attestation-digest");

    let post_id = PostId::from_low_u64_be(42);
    let anchored_hash = content_hash(b"benchmark blob");
    let commitment = H256::repeat_byte(0x11);

    group.bench_function("attestation_message", |b| {
        b.iter(|| black_box(attestation_message(&post_id, &anchored_hash, &commitment)))
    });

    group.finish();
}

// ============================================================================
// Custody responses: digest plus ECDSA signature per challenge
// ============================================================================

fn bench_custody_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("custody-response");
    group.measurement_time(Duration::from_secs(10));

    let identity = SigningIdentity::generate();
    let post_id = PostId::from_low_u64_be(7);
    let operator = Address::from_low_u64_be(1);
    let witness = CustodyWitness::placeholder();

    group.bench_function("custody_message", |b| {
        b.iter(|| black_box(custody_message(&post_id, &operator, &witness)))
    });

    let digest = custody_message(&post_id, &operator, &witness);
    group.bench_function("sign_custody_digest", |b| {
        b.iter(|| black_box(identity.sign_digest(&digest).is_ok()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_blob_verification,
    bench_attestation_digest,
    bench_custody_response,
);

criterion_main!(benches);
