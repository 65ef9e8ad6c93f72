//! Throughput of each algorithm through both backends, plus copy/reset overhead

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use cryypt_hash_state::{HashAlgorithm, HashState, PolicyConfig};

const ALGORITHMS: [HashAlgorithm; 6] = [
    HashAlgorithm::Md5,
    HashAlgorithm::Sha1,
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha512,
    HashAlgorithm::Md5Sha1,
];

fn policy_label(policy: PolicyConfig) -> &'static str {
    if policy.restricted { "generic" } else { "direct" }
}

/// Benchmark every algorithm on both backends at several input sizes
fn benchmark_backend_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_state_throughput");

    // 1KB, 64KB, 1MB
    let sizes = [1024, 65536, 1_048_576];

    for size in &sizes {
        group.throughput(Throughput::Bytes(*size as u64));
        let data = vec![0u8; *size];

        for policy in [PolicyConfig::unrestricted(), PolicyConfig::restricted()] {
            let mut state = HashState::new(policy).expect("state creation should succeed");
            if policy.restricted {
                state
                    .allow_legacy_override()
                    .expect("override should succeed");
            }

            for alg in ALGORITHMS {
                if state.init(alg).is_err() {
                    continue;
                }
                let id = BenchmarkId::new(format!("{alg}/{}", policy_label(policy)), size);
                group.bench_with_input(id, &data, |b, data| {
                    b.iter(|| {
                        state.reset().expect("reset should succeed");
                        state.update(data).expect("update should succeed");
                        let digest = state.finish().expect("finish should succeed");
                        std::hint::black_box(digest);
                    });
                });
            }
        }
    }
    group.finish();
}

/// Benchmark duplicating an in-progress state
fn benchmark_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_state_copy");
    let data = vec![0u8; 4096];

    for policy in [PolicyConfig::unrestricted(), PolicyConfig::restricted()] {
        let mut src = HashState::new(policy).expect("state creation should succeed");
        src.init(HashAlgorithm::Sha256).expect("init should succeed");
        src.update(&data).expect("update should succeed");
        let mut dest = HashState::new(policy).expect("state creation should succeed");

        group.bench_function(format!("sha256/{}", policy_label(policy)), |b| {
            b.iter(|| {
                dest.copy_from(&src).expect("copy should succeed");
                std::hint::black_box(&dest);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_backend_throughput, benchmark_copy);
criterion_main!(benches);
