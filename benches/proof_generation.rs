use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fiat_shamir_zkp::{
    Group, KeyPair, Proof, Prover, SchnorrGroup, Secp256k1, SecureRng, Verifier, P256,
};

const CONTEXT: &[u8] = b"bench";

fn setup<G: Group>(group: G) -> (Prover<G>, Verifier<G>) {
    let mut rng = SecureRng::new();
    let key_pair = KeyPair::generate(&group, &mut rng);
    let verifier = Verifier::new(group.clone(), key_pair.public().clone(), CONTEXT);
    (Prover::new(group, key_pair, CONTEXT), verifier)
}

fn bench_group<G: Group>(c: &mut Criterion, label: &str, group: G) {
    let (prover, verifier) = setup(group);
    let mut rng = SecureRng::new();
    let proof = prover.prove(&mut rng);

    c.bench_function(&format!("{label}_proof_generation"), |b| {
        b.iter(|| prover.prove(black_box(&mut rng)))
    });

    c.bench_function(&format!("{label}_proof_verification"), |b| {
        b.iter(|| assert!(verifier.verify(black_box(&proof))))
    });
}

fn bench_schnorr_groups(c: &mut Criterion) {
    bench_group(c, "ff128", SchnorrGroup::benchmark_128());
    bench_group(c, "ff2048", SchnorrGroup::rfc5114_2048_256());
}

fn bench_curves(c: &mut Criterion) {
    bench_group(c, "secp256k1", Secp256k1::new());
    bench_group(c, "p256", P256::new());
}

fn bench_multi_challenge(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_challenge");
    let (prover, verifier) = setup(SchnorrGroup::benchmark_128());
    let mut rng = SecureRng::new();

    for k in [1usize, 5, 10, 20].iter() {
        group.bench_with_input(BenchmarkId::new("prove", k), k, |b, &k| {
            b.iter(|| prover.prove_multi(black_box(&mut rng), k).unwrap())
        });

        let proof = prover.prove_multi(&mut rng, *k).unwrap();
        group.bench_with_input(BenchmarkId::new("verify", k), k, |b, &k| {
            b.iter(|| assert!(verifier.verify_multi(black_box(&proof), k)))
        });
    }

    group.finish();
}

fn bench_proof_encoding(c: &mut Criterion) {
    let group = Secp256k1::new();
    let (prover, _) = setup(group.clone());
    let proof = prover.prove(&mut SecureRng::new());
    let bytes = proof.to_bytes(&group);

    c.bench_function("proof_serialization", |b| {
        b.iter(|| black_box(&proof).to_bytes(&group))
    });

    c.bench_function("proof_deserialization", |b| {
        b.iter(|| Proof::from_bytes(&group, black_box(&bytes)).unwrap())
    });
}

fn bench_group_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("schnorr_group_generation");
    group.sample_size(10);
    let mut rng = SecureRng::new();

    for bits in [32u64, 64, 128].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(bits), bits, |b, &bits| {
            b.iter(|| SchnorrGroup::generate(bits, black_box(&mut rng)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_schnorr_groups,
    bench_curves,
    bench_multi_challenge,
    bench_proof_encoding,
    bench_group_generation
);
criterion_main!(benches);
