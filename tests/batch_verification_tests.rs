mod common;

use fiat_shamir_zkp::{
    batch_verify, BatchVerifier, Error, Group, KeyPair, Proof, Prover, PublicKey, SchnorrGroup,
    Secp256k1, P256,
};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use tracing::info;

use common::{init_tracing, CONTEXT};

fn generate_proofs<G: Group>(
    group: &G,
    n: usize,
    rng: &mut ChaCha20Rng,
) -> (Vec<Proof<G>>, Vec<PublicKey<G>>) {
    (0..n)
        .map(|_| {
            let key_pair = KeyPair::generate(group, rng);
            let public_key = key_pair.public().clone();
            let prover = Prover::new(group.clone(), key_pair, CONTEXT);
            (prover.prove(rng), public_key)
        })
        .unzip()
}

#[test]
fn batch_verify_multiple_valid_proofs() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(20);
    let (proofs, public_keys) = generate_proofs(&group, 5, &mut rng);

    info!("Verifying batch of {} proofs", proofs.len());
    assert!(batch_verify(&group, &proofs, &public_keys, CONTEXT));
}

#[test]
fn batch_verify_over_curves() {
    init_tracing();
    let mut rng = ChaCha20Rng::seed_from_u64(21);

    let group = Secp256k1::new();
    let (proofs, public_keys) = generate_proofs(&group, 8, &mut rng);
    assert!(batch_verify(&group, &proofs, &public_keys, CONTEXT));

    let group = P256::new();
    let (proofs, public_keys) = generate_proofs(&group, 8, &mut rng);
    assert!(batch_verify(&group, &proofs, &public_keys, CONTEXT));
}

#[test]
fn batch_verify_mixed_valid_invalid_proofs() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(22);
    let (mut proofs, public_keys) = generate_proofs(&group, 5, &mut rng);

    let bumped = group.scalar_add(proofs[1].response(), &group.scalar_from_u64(7));
    proofs[1] = Proof::new(proofs[1].commitment().clone(), bumped);

    assert!(!batch_verify(&group, &proofs, &public_keys, CONTEXT));

    let batch = BatchVerifier::from_pairs(group, CONTEXT, proofs, public_keys)
        .expect("lengths match");
    assert!(!batch.verify());
    assert_eq!(batch.verify_each(), vec![true, false, true, true, true]);
}

#[test]
fn batch_verify_tampered_commitment_fails() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(29);
    let (mut proofs, public_keys) = generate_proofs(&group, 4, &mut rng);
    assert!(batch_verify(&group, &proofs, &public_keys, CONTEXT));

    let shifted = group.combine(proofs[1].commitment(), group.generator());
    proofs[1] = Proof::new(shifted, proofs[1].response().clone());

    assert!(!batch_verify(&group, &proofs, &public_keys, CONTEXT));

    let batch = BatchVerifier::from_pairs(group, CONTEXT, proofs, public_keys)
        .expect("lengths match");
    assert_eq!(batch.verify_each(), vec![true, false, true, true]);
}

#[test]
fn batch_verify_swapped_keys_fail() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(23);
    let (proofs, mut public_keys) = generate_proofs(&group, 3, &mut rng);
    public_keys.swap(0, 2);

    assert!(!batch_verify(&group, &proofs, &public_keys, CONTEXT));
}

#[test]
fn batch_verify_wrong_context_fails() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(24);
    let (proofs, public_keys) = generate_proofs(&group, 3, &mut rng);

    assert!(!batch_verify(&group, &proofs, &public_keys, b"other-context"));
}

#[test]
fn batch_verify_empty_batch() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    assert!(batch_verify(&group, &[], &[], CONTEXT));

    let batch = BatchVerifier::new(group, CONTEXT);
    assert!(batch.is_empty());
    assert!(batch.verify());
    assert!(batch.verify_each().is_empty());
}

#[test]
fn batch_verify_mismatched_array_lengths() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(25);
    let (mut proofs, public_keys) = generate_proofs(&group, 4, &mut rng);
    proofs.truncate(2);

    assert!(!batch_verify(&group, &proofs, &public_keys, CONTEXT));
    assert!(matches!(
        BatchVerifier::from_pairs(group, CONTEXT, proofs, public_keys),
        Err(Error::ProofShape {
            expected: 2,
            actual: 4
        })
    ));
}

#[test]
fn batch_verify_single_proof() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(26);
    let (proofs, public_keys) = generate_proofs(&group, 1, &mut rng);

    let mut batch = BatchVerifier::with_capacity(group, CONTEXT, 1);
    for (proof, public_key) in proofs.into_iter().zip(public_keys) {
        batch.add(proof, public_key);
    }
    assert_eq!(batch.len(), 1);
    assert!(batch.verify());
}

#[test]
fn batch_accepts_cancelling_errors() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(27);
    let (mut proofs, public_keys) = generate_proofs(&group, 3, &mut rng);

    // r_0 + e and r_2 - e leave the sum of responses unchanged.
    let e = group.scalar_from_u64(12_345);
    let minus_e = group
        .scalar(group.subgroup_order() - 12_345u32)
        .expect("q - e is a valid scalar");
    let r0 = group.scalar_add(proofs[0].response(), &e);
    let r2 = group.scalar_add(proofs[2].response(), &minus_e);
    proofs[0] = Proof::new(proofs[0].commitment().clone(), r0);
    proofs[2] = Proof::new(proofs[2].commitment().clone(), r2);

    assert!(batch_verify(&group, &proofs, &public_keys, CONTEXT));

    let batch = BatchVerifier::from_pairs(group, CONTEXT, proofs, public_keys)
        .expect("lengths match");
    assert_eq!(batch.verify_each(), vec![false, true, false]);
}

#[test]
fn batch_verify_large_batch() {
    init_tracing();
    let group = SchnorrGroup::benchmark_128();
    let mut rng = ChaCha20Rng::seed_from_u64(28);
    let (proofs, public_keys) = generate_proofs(&group, 200, &mut rng);

    let batch = BatchVerifier::from_pairs(group, CONTEXT, proofs, public_keys)
        .expect("lengths match");
    info!("Verifying batch of {} proofs", batch.len());
    assert!(batch.verify());
}
