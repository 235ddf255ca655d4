//! Fiat-Shamir transcript for non-interactive proofs.
//!
//! The hash input is the pipe-separated concatenation of the transcript forms
//! of the commitments, then the public key, then the context:
//!
//! ```text
//! F_1 | F_2 | ... | F_k | y | context
//! ```
//!
//! A single challenge is the full SHA-256 digest of that input read as a
//! big-endian integer modulo the group order. For `k` challenges the digest
//! is a seed, expanded into blocks `SHA-256(seed || be32(ctr))` for
//! `ctr = 0, 1, ...`; each block is cut into eight 4-byte big-endian words and
//! every word is reduced modulo the order until `k` values are collected.
//!
//! Reducing a 32-bit word modulo the order is biased whenever the order does
//! not divide `2^32`, and for orders above `2^32` the challenge never exceeds
//! `2^32 - 1`. Every derived challenge depends on this exact expansion.

use sha2::{Digest, Sha256};

use crate::Group;

/// Separator written between transcript fields.
const FIELD_SEPARATOR: &[u8] = b"|";

/// Width in bytes of one expansion word.
const WORD_BYTES: usize = 4;

/// Transcript wrapper for the Fiat-Shamir transformation.
///
/// Appending is order sensitive. Elements go in first, the context last.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    hasher: Sha256,
    fields: usize,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a commitment or public key in its transcript form.
    pub fn append_element<G: Group>(&mut self, group: &G, element: &G::Element) {
        self.append_field(&group.element_to_transcript(element));
    }

    /// Appends application-specific context to prevent cross-protocol attacks.
    ///
    /// # Security
    ///
    /// Proofs made under one context do not verify under another. Use a session
    /// identifier or a purpose string.
    pub fn append_context(&mut self, context: &[u8]) {
        self.append_field(context);
    }

    fn append_field(&mut self, bytes: &[u8]) {
        if self.fields > 0 {
            self.hasher.update(FIELD_SEPARATOR);
        }
        self.hasher.update(bytes);
        self.fields += 1;
    }

    /// Finalizes the transcript into its 256-bit digest.
    pub fn digest(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }

    /// Derives a single challenge scalar from the full digest.
    pub fn challenge_scalar<G: Group>(self, group: &G) -> G::Scalar {
        group.scalar_from_digest(&self.digest())
    }

    /// Derives `k` challenge scalars with the counter-mode expansion.
    pub fn challenge_scalars<G: Group>(self, group: &G, k: usize) -> Vec<G::Scalar> {
        let seed = self.digest();
        expand_words(&seed, k)
            .into_iter()
            .map(|word| group.scalar_from_u64(u64::from(word)))
            .collect()
    }
}

/// Challenge of a single-round proof: `H(F | y | context) mod q`.
pub fn challenge<G: Group>(
    group: &G,
    commitment: &G::Element,
    public_key: &G::Element,
    context: &[u8],
) -> G::Scalar {
    let mut transcript = Transcript::new();
    transcript.append_element(group, commitment);
    transcript.append_element(group, public_key);
    transcript.append_context(context);
    transcript.challenge_scalar(group)
}

/// Challenges of a k-round proof, one per commitment, from one joint expansion.
pub fn challenges<'a, G: Group>(
    group: &G,
    commitments: impl IntoIterator<Item = &'a G::Element>,
    public_key: &G::Element,
    context: &[u8],
) -> Vec<G::Scalar>
where
    G::Element: 'a,
{
    let mut transcript = Transcript::new();
    let mut k = 0;
    for commitment in commitments {
        transcript.append_element(group, commitment);
        k += 1;
    }
    transcript.append_element(group, public_key);
    transcript.append_context(context);
    transcript.challenge_scalars(group, k)
}

/// Expands `seed` into exactly `k` 32-bit words.
///
/// Block `ctr` is `SHA-256(seed || be32(ctr))`; words past the `k`-th one on
/// the final block are discarded.
pub fn expand_words(seed: &[u8; 32], k: usize) -> Vec<u32> {
    let mut words = Vec::with_capacity(k);
    let mut counter: u32 = 0;

    while words.len() < k {
        let block: [u8; 32] = Sha256::new()
            .chain_update(seed)
            .chain_update(counter.to_be_bytes())
            .finalize()
            .into();

        for chunk in block.chunks_exact(WORD_BYTES) {
            if words.len() == k {
                break;
            }
            words.push(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }

        counter = counter.wrapping_add(1);
    }

    words
}
