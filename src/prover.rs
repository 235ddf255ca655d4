use core::fmt;

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::primitives::transcript;
use crate::{Error, Group, KeyPair, MultiProof, Proof, PublicKey, Result};

/// Prover for the Fiat-Shamir transformed Schnorr protocol.
///
/// Generates proofs of knowledge of the secret `x` behind `y = g^x`, bound to
/// a caller-chosen context.
///
/// # Security
///
/// - Always use a cryptographically secure generator such as [`SecureRng`](crate::SecureRng)
/// - Every proof and every round draws a fresh nonce; a repeated nonce reveals `x`
/// - Use a distinct context per application or session to prevent replay
pub struct Prover<G: Group> {
    group: G,
    key_pair: KeyPair<G>,
    context: Vec<u8>,
}

impl<G: Group> Prover<G> {
    /// Creates a new prover for `key_pair` bound to `context`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fiat_shamir_zkp::{KeyPair, Prover, Secp256k1, SecureRng};
    ///
    /// let group = Secp256k1::new();
    /// let mut rng = SecureRng::new();
    /// let key_pair = KeyPair::generate(&group, &mut rng);
    ///
    /// let prover = Prover::new(group, key_pair, b"session-42".to_vec());
    /// let proof = prover.prove(&mut rng);
    /// ```
    pub fn new(group: G, key_pair: KeyPair<G>, context: impl Into<Vec<u8>>) -> Self {
        Self {
            group,
            key_pair,
            context: context.into(),
        }
    }

    /// Returns the group this prover works in.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// Returns the public key proofs are made for.
    pub fn public_key(&self) -> &PublicKey<G> {
        self.key_pair.public()
    }

    /// Returns the context proofs are bound to.
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    /// Generates a single-challenge proof.
    ///
    /// Samples `s` from `[1, q - 1]`, commits to `F = g^s`, derives
    /// `c = H(F | y | context)` and answers `r = s + c * x mod q`.
    pub fn prove<R: CryptoRngCore>(&self, rng: &mut R) -> Proof<G> {
        let nonce = Nonce {
            s: self.group.random_scalar(rng),
        };
        self.prove_with_nonce(&nonce)
    }

    /// Generates a single-challenge proof from a caller-supplied nonce.
    ///
    /// # Security
    ///
    /// Two proofs sharing a nonce reveal the secret. This exists for
    /// reproducible test vectors; use [`prove`](Self::prove) otherwise.
    pub fn prove_with_nonce(&self, nonce: &Nonce<G>) -> Proof<G> {
        let commitment = self.group.exp(self.group.generator(), &nonce.s);
        let challenge = transcript::challenge(
            &self.group,
            &commitment,
            self.public_key().element(),
            &self.context,
        );
        let response = self.respond(nonce, &challenge);

        Proof::new(commitment, response)
    }

    /// Generates a `k`-round proof with one joint challenge expansion.
    ///
    /// All `k` commitments enter the seed of the expansion, so no round can be
    /// forged independently of the others.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `k` is zero.
    pub fn prove_multi<R: CryptoRngCore>(&self, rng: &mut R, k: usize) -> Result<MultiProof<G>> {
        if k == 0 {
            return Err(Error::InvalidParams(
                "round count must be at least 1".to_string(),
            ));
        }

        let (commitments, nonces): (Vec<G::Element>, Vec<Nonce<G>>) =
            (0..k).map(|_| self.commit(rng)).unzip();

        let challenges = transcript::challenges(
            &self.group,
            commitments.iter(),
            self.public_key().element(),
            &self.context,
        );

        let rounds = commitments
            .into_iter()
            .zip(nonces.iter().zip(challenges.iter()))
            .map(|(commitment, (nonce, challenge))| {
                Proof::new(commitment, self.respond(nonce, challenge))
            })
            .collect();

        Ok(MultiProof::new(rounds))
    }

    /// Interactive protocol: generates the commitment (first message).
    ///
    /// Returns the commitment `F = g^s` and the secret nonce `s`.
    pub fn commit<R: CryptoRngCore>(&self, rng: &mut R) -> (G::Element, Nonce<G>) {
        let s = self.group.random_scalar(rng);
        let commitment = self.group.exp(self.group.generator(), &s);

        (commitment, Nonce { s })
    }

    /// Interactive protocol: generates the response (third message).
    ///
    /// Computes `r = s + c * x mod q`.
    pub fn respond(&self, nonce: &Nonce<G>, challenge: &G::Scalar) -> G::Scalar {
        let cx = self
            .group
            .scalar_mul(challenge, self.key_pair.secret().scalar());
        self.group.scalar_add(&nonce.s, &cx)
    }
}

impl<G: Group> fmt::Debug for Prover<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prover")
            .field("group", &self.group.name())
            .field("key_pair", &self.key_pair)
            .field("context", &String::from_utf8_lossy(&self.context))
            .finish()
    }
}

/// Secret nonce used in the commitment phase.
///
/// Automatically zeroized when dropped.
pub struct Nonce<G: Group> {
    s: G::Scalar,
}

impl<G: Group> Nonce<G> {
    /// Wraps a nonce after checking it lies in `[1, q - 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScalar`] for a zero nonce.
    pub fn new(group: &G, s: G::Scalar) -> Result<Self> {
        group.check_scalar(&s)?;
        Ok(Self { s })
    }
}

impl<G: Group> Zeroize for Nonce<G> {
    fn zeroize(&mut self) {
        self.s.zeroize();
    }
}

impl<G: Group> Drop for Nonce<G> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<G: Group> fmt::Debug for Nonce<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce(<redacted>)")
    }
}
