//! Verifier implementation for Fiat-Shamir Schnorr proofs.
//!
//! This module contains the verifier's logic for single-challenge and
//! k-challenge proofs, and batch verification of many single-challenge proofs.

use core::fmt;

use rand_core::CryptoRngCore;
use tracing::trace;

use crate::primitives::transcript;
use crate::{Group, MultiProof, Proof, PublicKey};

/// Batch verification for multiple proofs.
pub mod batch;

pub use batch::{batch_verify, BatchVerifier};

/// Verifier for the Fiat-Shamir transformed Schnorr protocol.
///
/// Bound to one public key and one context. Every check returns a plain
/// `bool`; a failing equation is an expected outcome, not an error.
///
/// # Security
///
/// - Challenges are always recomputed from the proof, never taken from the prover
/// - Use the same context that was used during proof generation
pub struct Verifier<G: Group> {
    group: G,
    public_key: PublicKey<G>,
    context: Vec<u8>,
}

impl<G: Group> Verifier<G> {
    /// Creates a new verifier for `public_key` bound to `context`.
    pub fn new(group: G, public_key: PublicKey<G>, context: impl Into<Vec<u8>>) -> Self {
        Self {
            group,
            public_key,
            context: context.into(),
        }
    }

    /// Returns the group this verifier works in.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// Returns the public key proofs are checked against.
    pub fn public_key(&self) -> &PublicKey<G> {
        &self.public_key
    }

    /// Returns the context proofs are bound to.
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    /// Verifies a single-challenge proof.
    ///
    /// Recomputes `c = H(F | y | context)` and accepts iff `g^r == F * y^c`.
    pub fn verify(&self, proof: &Proof<G>) -> bool {
        let challenge = transcript::challenge(
            &self.group,
            proof.commitment(),
            self.public_key.element(),
            &self.context,
        );

        let valid = self.verify_response(proof.commitment(), &challenge, proof.response());
        if !valid {
            trace!(group = self.group.name(), "single-challenge proof rejected");
            metrics::counter!("verify.failure").increment(1);
        }
        valid
    }

    /// Verifies a `k`-round proof, stopping at the first failing round.
    ///
    /// Returns `false` when the proof does not have exactly `k` rounds, and
    /// for `k == 0`.
    ///
    /// # Security
    ///
    /// The running time reveals the index of the first failing round. Use
    /// [`verify_multi_all_rounds`](Self::verify_multi_all_rounds) when that matters.
    pub fn verify_multi(&self, proof: &MultiProof<G>, k: usize) -> bool {
        let Some(challenges) = self.multi_challenges(proof, k) else {
            return false;
        };

        for (index, (round, challenge)) in proof.rounds().iter().zip(&challenges).enumerate() {
            if !self.verify_response(round.commitment(), challenge, round.response()) {
                trace!(group = self.group.name(), k, index, "k-challenge proof rejected");
                metrics::counter!("verify.failure").increment(1);
                return false;
            }
        }

        true
    }

    /// Verifies a `k`-round proof, evaluating every round before answering.
    ///
    /// Same result as [`verify_multi`](Self::verify_multi).
    pub fn verify_multi_all_rounds(&self, proof: &MultiProof<G>, k: usize) -> bool {
        let Some(challenges) = self.multi_challenges(proof, k) else {
            return false;
        };

        let valid = proof
            .rounds()
            .iter()
            .zip(&challenges)
            .fold(true, |acc, (round, challenge)| {
                let ok = self.verify_response(round.commitment(), challenge, round.response());
                acc & ok
            });

        if !valid {
            trace!(group = self.group.name(), k, "k-challenge proof rejected");
            metrics::counter!("verify.failure").increment(1);
        }
        valid
    }

    fn multi_challenges(&self, proof: &MultiProof<G>, k: usize) -> Option<Vec<G::Scalar>> {
        if k == 0 || proof.len() != k {
            trace!(expected = k, actual = proof.len(), "k-challenge proof has wrong shape");
            return None;
        }

        Some(transcript::challenges(
            &self.group,
            proof.rounds().iter().map(Proof::commitment),
            self.public_key.element(),
            &self.context,
        ))
    }

    /// Interactive protocol: verifies the response (fourth message).
    ///
    /// Checks that `g^r = F * y^c` for the given challenge.
    pub fn verify_response(
        &self,
        commitment: &G::Element,
        challenge: &G::Scalar,
        response: &G::Scalar,
    ) -> bool {
        check_equation(
            &self.group,
            self.public_key.element(),
            commitment,
            challenge,
            response,
        )
    }

    /// Interactive protocol: draws a uniform challenge (second message).
    pub fn random_challenge<R: CryptoRngCore>(&self, rng: &mut R) -> G::Scalar {
        self.group.random_scalar(rng)
    }
}

/// Evaluates `g^r == F * y^c`.
pub(crate) fn check_equation<G: Group>(
    group: &G,
    public_key: &G::Element,
    commitment: &G::Element,
    challenge: &G::Scalar,
    response: &G::Scalar,
) -> bool {
    let lhs = group.exp(group.generator(), response);
    let y_c = group.exp(public_key, challenge);
    let rhs = group.combine(commitment, &y_c);

    lhs == rhs
}

impl<G: Group> fmt::Debug for Verifier<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("group", &self.group.name())
            .field("public_key", &self.public_key)
            .field("context", &String::from_utf8_lossy(&self.context))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::*;
    use crate::{KeyPair, Nonce, Prover, SchnorrGroup};

    const CONTEXT: &[u8] = b"FiatShamirDemo2025";

    fn toy_pair() -> (Prover<SchnorrGroup>, Verifier<SchnorrGroup>) {
        let group = SchnorrGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap();
        let key_pair = KeyPair::from_secret(&group, group.scalar(3u32).unwrap()).unwrap();
        let verifier = Verifier::new(group.clone(), key_pair.public().clone(), CONTEXT);
        (Prover::new(group, key_pair, CONTEXT), verifier)
    }

    #[test]
    fn concrete_scenario_verifies() {
        let (prover, verifier) = toy_pair();
        let group = prover.group();
        let nonce = Nonce::new(group, group.scalar(5u32).unwrap()).unwrap();
        let proof = prover.prove_with_nonce(&nonce);
        assert!(verifier.verify(&proof));

        // Every other response fails.
        for r in 0u32..11 {
            if r == 6 {
                continue;
            }
            let forged = Proof::new(proof.commitment().clone(), group.scalar(r).unwrap());
            assert!(!verifier.verify(&forged), "response {r} must fail");
        }
    }

    #[test]
    fn verifier_accepts_valid_proof() {
        let (prover, verifier) = toy_pair();
        let mut rng = ChaCha20Rng::seed_from_u64(41);
        for _ in 0..20 {
            assert!(verifier.verify(&prover.prove(&mut rng)));
        }
    }

    #[test]
    fn multi_rejects_wrong_round_count() {
        let (prover, verifier) = toy_pair();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let proof = prover.prove_multi(&mut rng, 3).unwrap();

        assert!(verifier.verify_multi(&proof, 3));
        assert!(!verifier.verify_multi(&proof, 2));
        assert!(!verifier.verify_multi(&proof, 4));
        assert!(!verifier.verify_multi_all_rounds(&proof, 4));
    }

    #[test]
    fn multi_rejects_zero_rounds() {
        let (_, verifier) = toy_pair();
        let empty = MultiProof::new(Vec::new());

        assert!(!verifier.verify_multi(&empty, 0));
        assert!(!verifier.verify_multi_all_rounds(&empty, 0));
    }

    #[test]
    fn multi_rounds_are_bound_together() {
        let (prover, verifier) = toy_pair();
        let mut rng = ChaCha20Rng::seed_from_u64(43);
        let a = prover.prove_multi(&mut rng, 2).unwrap().into_rounds();
        let b = prover.prove_multi(&mut rng, 2).unwrap().into_rounds();

        // Rounds only verify under the challenges of their own transcript.
        let spliced = MultiProof::new(vec![a[0].clone(), b[1].clone()]);
        let challenges = transcript::challenges(
            verifier.group(),
            spliced.rounds().iter().map(Proof::commitment),
            verifier.public_key().element(),
            CONTEXT,
        );
        let honest = transcript::challenges(
            verifier.group(),
            a.iter().map(Proof::commitment),
            verifier.public_key().element(),
            CONTEXT,
        );
        if challenges[0] != honest[0] {
            assert!(!verifier.verify_multi(&spliced, 2));
        }
    }

    #[test]
    fn interactive_verification() {
        let (prover, verifier) = toy_pair();
        let mut rng = ChaCha20Rng::seed_from_u64(44);

        let (commitment, nonce) = prover.commit(&mut rng);
        let challenge = verifier.random_challenge(&mut rng);
        let response = prover.respond(&nonce, &challenge);

        assert!(verifier.verify_response(&commitment, &challenge, &response));
    }
}
