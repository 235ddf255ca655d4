//! Batch verification for single-challenge Schnorr proofs.
//!
//! All proofs are folded into one equation:
//!
//! ```text
//! g^(r_1 + ... + r_n) == (F_1 * y_1^c_1) * ... * (F_n * y_n^c_n)
//! ```
//!
//! with every `c_i` recomputed from its own `(F_i, y_i, context)`. One
//! exponentiation by the generator replaces `n`.
//!
//! # Security
//!
//! The equations are combined without random weights. Two invalid proofs
//! whose errors cancel (say `r_1 + e` and `r_2 - e`) pass the aggregate check
//! even though neither verifies alone. Use [`BatchVerifier::verify_each`] or
//! [`Verifier::verify`](crate::Verifier::verify) when proofs come from
//! parties that may collude.
//!
//! # Example
//!
//! ```rust
//! use fiat_shamir_zkp::{BatchVerifier, KeyPair, Prover, SchnorrGroup, SecureRng};
//!
//! let group = SchnorrGroup::benchmark_128();
//! let mut rng = SecureRng::new();
//! let mut batch = BatchVerifier::new(group.clone(), b"batch".to_vec());
//!
//! for _ in 0..4 {
//!     let key_pair = KeyPair::generate(&group, &mut rng);
//!     let public_key = key_pair.public().clone();
//!     let prover = Prover::new(group.clone(), key_pair, b"batch".to_vec());
//!     batch.add(prover.prove(&mut rng), public_key);
//! }
//!
//! assert!(batch.verify());
//! ```

use core::fmt;

use tracing::trace;

use super::check_equation;
use crate::primitives::transcript;
use crate::{Error, Group, Proof, PublicKey, Result};

/// Verifies `proofs[i]` against `public_keys[i]` with one aggregate check.
///
/// Returns `false` when the two slices differ in length. An empty batch is
/// accepted (both products are empty).
pub fn batch_verify<G: Group>(
    group: &G,
    proofs: &[Proof<G>],
    public_keys: &[PublicKey<G>],
    context: &[u8],
) -> bool {
    if proofs.len() != public_keys.len() {
        trace!(
            proofs = proofs.len(),
            public_keys = public_keys.len(),
            "batch has mismatched lengths"
        );
        return false;
    }

    aggregate_check(group, proofs.iter().zip(public_keys), context)
}

fn aggregate_check<'a, G: Group>(
    group: &G,
    entries: impl Iterator<Item = (&'a Proof<G>, &'a PublicKey<G>)>,
    context: &[u8],
) -> bool {
    let mut response_sum = group.scalar_from_u64(0);
    let mut rhs = group.identity();

    for (proof, public_key) in entries {
        let y = public_key.element();
        let challenge = transcript::challenge(group, proof.commitment(), y, context);

        response_sum = group.scalar_add(&response_sum, proof.response());
        let term = group.combine(proof.commitment(), &group.exp(y, &challenge));
        rhs = group.combine(&rhs, &term);
    }

    let lhs = group.exp(group.generator(), &response_sum);
    let valid = lhs == rhs;
    if !valid {
        trace!(group = group.name(), "batch rejected");
        metrics::counter!("verify.failure").increment(1);
    }
    valid
}

/// Batch verifier for single-challenge Schnorr proofs.
///
/// Accumulates `(proof, public key)` pairs that share one group and one
/// context, then checks them all with one aggregate equation.
pub struct BatchVerifier<G: Group> {
    group: G,
    context: Vec<u8>,
    entries: Vec<(Proof<G>, PublicKey<G>)>,
}

impl<G: Group> BatchVerifier<G> {
    /// Creates a new empty batch verifier.
    #[must_use]
    pub fn new(group: G, context: impl Into<Vec<u8>>) -> Self {
        Self::with_capacity(group, context, 0)
    }

    /// Creates a new batch verifier with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(group: G, context: impl Into<Vec<u8>>, capacity: usize) -> Self {
        Self {
            group,
            context: context.into(),
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Builds a batch from parallel lists of proofs and public keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProofShape`] if the lists differ in length.
    pub fn from_pairs(
        group: G,
        context: impl Into<Vec<u8>>,
        proofs: Vec<Proof<G>>,
        public_keys: Vec<PublicKey<G>>,
    ) -> Result<Self> {
        if proofs.len() != public_keys.len() {
            return Err(Error::ProofShape {
                expected: proofs.len(),
                actual: public_keys.len(),
            });
        }

        Ok(Self {
            group,
            context: context.into(),
            entries: proofs.into_iter().zip(public_keys).collect(),
        })
    }

    /// Adds a proof and the public key it claims.
    pub fn add(&mut self, proof: Proof<G>, public_key: PublicKey<G>) {
        self.entries.push((proof, public_key));
    }

    /// Returns the number of proofs currently in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the batch contains no proofs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every proof from the batch.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Runs the aggregate check over all proofs in the batch.
    ///
    /// An empty batch is accepted.
    pub fn verify(&self) -> bool {
        aggregate_check(
            &self.group,
            self.entries.iter().map(|(proof, key)| (proof, key)),
            &self.context,
        )
    }

    /// Verifies every proof on its own, in insertion order.
    ///
    /// Use this to locate the bad members after [`verify`](Self::verify) fails.
    pub fn verify_each(&self) -> Vec<bool> {
        self.entries
            .iter()
            .map(|(proof, public_key)| {
                let y = public_key.element();
                let challenge =
                    transcript::challenge(&self.group, proof.commitment(), y, &self.context);
                check_equation(&self.group, y, proof.commitment(), &challenge, proof.response())
            })
            .collect()
    }
}

impl<G: Group> fmt::Debug for BatchVerifier<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchVerifier")
            .field("group", &self.group.name())
            .field("context", &String::from_utf8_lossy(&self.context))
            .field("entries", &self.entries.len())
            .finish()
    }
}
