//! Protocol gadgets for Schnorr proofs of knowledge.
//!
//! This module contains the core data structures used in the protocol:
//! secret and public keys, key pairs, single-round proofs and k-round proofs,
//! together with their versioned byte encodings.

use core::fmt;

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Protocol version for serialization compatibility.
const PROTOCOL_VERSION: u8 = 1;

/// Upper bound on an encoded element accepted by the decoders.
const MAX_ELEMENT_SIZE: usize = 4096;

/// Upper bound on an encoded scalar accepted by the decoders.
const MAX_SCALAR_SIZE: usize = 512;

/// Smallest possible encoded round: two length prefixes and one byte each.
const MIN_ROUND_SIZE: usize = 4 + 1 + 4 + 1;

/// Secret exponent `x` of a key pair.
///
/// # Security
///
/// - The secret is zeroized when dropped
/// - `Debug` output never contains the value
pub struct SecretKey<G: Group> {
    x: G::Scalar,
}

impl<G: Group> SecretKey<G> {
    /// Wraps a secret scalar after checking it lies in `[1, order - 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScalar`] for a zero scalar.
    pub fn new(group: &G, x: G::Scalar) -> Result<Self> {
        group.check_scalar(&x)?;
        Ok(Self { x })
    }

    /// Returns a reference to the secret scalar.
    pub(crate) fn scalar(&self) -> &G::Scalar {
        &self.x
    }
}

impl<G: Group> Clone for SecretKey<G> {
    fn clone(&self) -> Self {
        Self { x: self.x.clone() }
    }
}

impl<G: Group> fmt::Debug for SecretKey<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl<G: Group> Zeroize for SecretKey<G> {
    fn zeroize(&mut self) {
        self.x.zeroize();
    }
}

impl<G: Group> Drop for SecretKey<G> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Public key `y = g^x`.
///
/// Always a validated, non-identity member of the prime-order group.
pub struct PublicKey<G: Group> {
    y: G::Element,
}

impl<G: Group> PublicKey<G> {
    /// Wraps a public element after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGroupElement`] if `y` is outside the group or
    /// is the identity.
    pub fn new(group: &G, y: G::Element) -> Result<Self> {
        group.validate_element(&y)?;
        if group.is_identity(&y) {
            return Err(Error::InvalidGroupElement(
                "Public key cannot be identity".to_string(),
            ));
        }
        Ok(Self { y })
    }

    /// Decodes a public key from its canonical encoding.
    pub fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self> {
        let y = group.element_from_bytes(bytes)?;
        Self::new(group, y)
    }

    /// Encodes the public key canonically.
    pub fn to_bytes(&self, group: &G) -> Vec<u8> {
        group.element_to_bytes(&self.y)
    }

    /// Returns the public element `y`.
    pub fn element(&self) -> &G::Element {
        &self.y
    }
}

impl<G: Group> Clone for PublicKey<G> {
    fn clone(&self) -> Self {
        Self { y: self.y.clone() }
    }
}

impl<G: Group> fmt::Debug for PublicKey<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey").field("y", &self.y).finish()
    }
}

impl<G: Group> PartialEq for PublicKey<G> {
    fn eq(&self, other: &Self) -> bool {
        self.y == other.y
    }
}

impl<G: Group> Eq for PublicKey<G> {}

/// Secret exponent together with its public key.
///
/// Key pairs are explicit values passed to the prover; nothing in the crate
/// keeps a key in global state.
pub struct KeyPair<G: Group> {
    secret: SecretKey<G>,
    public: PublicKey<G>,
}

impl<G: Group> KeyPair<G> {
    /// Samples `x` uniformly from `[1, order - 1]` and computes `y = g^x`.
    pub fn generate<R: CryptoRngCore>(group: &G, rng: &mut R) -> Self {
        let x = group.random_scalar(rng);
        let y = group.exp(group.generator(), &x);
        Self {
            secret: SecretKey { x },
            public: PublicKey { y },
        }
    }

    /// Builds a key pair from a known secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScalar`] for a zero secret.
    pub fn from_secret(group: &G, x: G::Scalar) -> Result<Self> {
        let secret = SecretKey::new(group, x)?;
        let y = group.exp(group.generator(), secret.scalar());
        let public = PublicKey::new(group, y)?;
        Ok(Self { secret, public })
    }

    /// Returns the secret key.
    pub fn secret(&self) -> &SecretKey<G> {
        &self.secret
    }

    /// Returns the public key.
    pub fn public(&self) -> &PublicKey<G> {
        &self.public
    }
}

impl<G: Group> Clone for KeyPair<G> {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
            public: self.public.clone(),
        }
    }
}

impl<G: Group> fmt::Debug for KeyPair<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &self.secret)
            .field("public", &self.public)
            .finish()
    }
}

/// Non-interactive proof of knowledge of `x` with `y = g^x`.
///
/// Holds the commitment `F = g^s` and the response `r = s + c * x mod q`.
/// Proofs are immutable and can be verified any number of times.
///
/// # Serialization
///
/// Proofs can be serialized to bytes using [`Proof::to_bytes`] and deserialized
/// using [`Proof::from_bytes`]. The serialization format is versioned for
/// forward compatibility.
pub struct Proof<G: Group> {
    version: u8,
    commitment: G::Element,
    response: G::Scalar,
}

impl<G: Group> Proof<G> {
    /// Creates a new proof from commitment and response.
    ///
    /// This is typically called by [`Prover`](crate::Prover) and not directly by users.
    pub fn new(commitment: G::Element, response: G::Scalar) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            commitment,
            response,
        }
    }

    /// Returns the protocol version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the commitment `F`.
    pub fn commitment(&self) -> &G::Element {
        &self.commitment
    }

    /// Returns the response `r`.
    pub fn response(&self) -> &G::Scalar {
        &self.response
    }

    /// Serializes the proof to bytes.
    ///
    /// Format: `[version (1 byte)][F_len (4 bytes)][F][r_len (4 bytes)][r]`
    pub fn to_bytes(&self, group: &G) -> Vec<u8> {
        let mut out = vec![self.version];
        self.write_round(group, &mut out);
        out
    }

    /// Deserializes a proof from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for malformed framing, and the group's
    /// element or scalar error when a field does not decode.
    pub fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        reader.read_version()?;
        let proof = Self::read_round(group, &mut reader)?;
        reader.finish()?;
        Ok(proof)
    }

    fn write_round(&self, group: &G, out: &mut Vec<u8>) {
        write_field(out, &group.element_to_bytes(&self.commitment));
        write_field(out, &group.scalar_to_bytes(&self.response));
    }

    fn read_round(group: &G, reader: &mut ByteReader<'_>) -> Result<Self> {
        let commitment = group.element_from_bytes(reader.read_field("commitment", MAX_ELEMENT_SIZE)?)?;
        if group.is_identity(&commitment) {
            return Err(Error::InvalidGroupElement(
                "Commitment cannot be identity".to_string(),
            ));
        }

        let response = group.scalar_from_bytes(reader.read_field("response", MAX_SCALAR_SIZE)?)?;
        Ok(Self::new(commitment, response))
    }
}

impl<G: Group> Clone for Proof<G> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            commitment: self.commitment.clone(),
            response: self.response.clone(),
        }
    }
}

impl<G: Group> fmt::Debug for Proof<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proof")
            .field("version", &self.version)
            .field("commitment", &self.commitment)
            .field("response", &self.response)
            .finish()
    }
}

impl<G: Group> PartialEq for Proof<G> {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.commitment == other.commitment
            && self.response == other.response
    }
}

impl<G: Group> Eq for Proof<G> {}

/// Ordered sequence of `k` rounds bound by one joint challenge expansion.
///
/// Round `i` only verifies together with the commitments of every other round,
/// since all of them enter the seed of the challenge expansion.
pub struct MultiProof<G: Group> {
    version: u8,
    rounds: Vec<Proof<G>>,
}

impl<G: Group> MultiProof<G> {
    /// Creates a k-round proof from its ordered rounds.
    pub fn new(rounds: Vec<Proof<G>>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            rounds,
        }
    }

    /// Returns the protocol version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the rounds in order.
    pub fn rounds(&self) -> &[Proof<G>] {
        &self.rounds
    }

    /// Consumes the proof and returns its rounds.
    pub fn into_rounds(self) -> Vec<Proof<G>> {
        self.rounds
    }

    /// Number of rounds `k`.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Returns `true` if the proof has no rounds.
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Serializes the proof to bytes.
    ///
    /// Format: `[version (1 byte)][k (4 bytes)]` followed by `k` rounds, each
    /// framed as in [`Proof::to_bytes`] without the version byte.
    pub fn to_bytes(&self, group: &G) -> Vec<u8> {
        let mut out = vec![self.version];
        out.extend_from_slice(&(self.rounds.len() as u32).to_be_bytes());
        for round in &self.rounds {
            round.write_round(group, &mut out);
        }
        out
    }

    /// Deserializes a k-round proof from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for malformed framing, including a round
    /// count that cannot fit in the input.
    pub fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        reader.read_version()?;

        let k = reader.read_u32("round count")? as usize;
        if k.saturating_mul(MIN_ROUND_SIZE) > reader.remaining() {
            return Err(Error::Encoding(format!(
                "Round count {k} exceeds the remaining {} bytes",
                reader.remaining()
            )));
        }

        let mut rounds = Vec::with_capacity(k);
        for _ in 0..k {
            rounds.push(Proof::read_round(group, &mut reader)?);
        }
        reader.finish()?;

        Ok(Self::new(rounds))
    }
}

impl<G: Group> From<Vec<Proof<G>>> for MultiProof<G> {
    fn from(rounds: Vec<Proof<G>>) -> Self {
        Self::new(rounds)
    }
}

impl<G: Group> Clone for MultiProof<G> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            rounds: self.rounds.clone(),
        }
    }
}

impl<G: Group> fmt::Debug for MultiProof<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiProof")
            .field("version", &self.version)
            .field("rounds", &self.rounds)
            .finish()
    }
}

impl<G: Group> PartialEq for MultiProof<G> {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.rounds == other.rounds
    }
}

impl<G: Group> Eq for MultiProof<G> {}

fn write_field(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

/// Cursor over an encoded proof.
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, what: &str, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::Encoding(format!("Truncated proof: incomplete {what}")));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_version(&mut self) -> Result<()> {
        let version = self.take("version", 1)?[0];
        if version != PROTOCOL_VERSION {
            return Err(Error::Encoding(format!(
                "Unsupported proof version: {version}"
            )));
        }
        Ok(())
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        let raw = self.take(what, 4)?;
        Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn read_field(&mut self, what: &str, max: usize) -> Result<&'a [u8]> {
        let len = self.read_u32(what)? as usize;
        if len == 0 || len > max {
            return Err(Error::Encoding(format!("Invalid {what} length: {len}")));
        }
        self.take(what, len)
    }

    fn finish(&self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(Error::Encoding(format!(
                "Proof has {} trailing bytes",
                self.remaining()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::*;
    use crate::{SchnorrGroup, Secp256k1};

    fn toy_group() -> SchnorrGroup {
        SchnorrGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap()
    }

    #[test]
    fn key_pair_from_secret() {
        let group = toy_group();
        let pair = KeyPair::from_secret(&group, group.scalar(3u32).unwrap()).unwrap();
        assert_eq!(pair.public().element().value(), &BigUint::from(8u32));
    }

    #[test]
    fn key_pair_rejects_zero_secret() {
        let group = toy_group();
        assert!(matches!(
            KeyPair::from_secret(&group, group.scalar(0u32).unwrap()),
            Err(Error::InvalidScalar(_))
        ));
    }

    #[test]
    fn generated_keys_are_consistent() {
        let group = Secp256k1::new();
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let pair = KeyPair::generate(&group, &mut rng);
        let y = group.exp(group.generator(), pair.secret().scalar());
        assert_eq!(&y, pair.public().element());
    }

    #[test]
    fn secret_debug_is_redacted() {
        let group = toy_group();
        let pair = KeyPair::from_secret(&group, group.scalar(3u32).unwrap()).unwrap();
        let rendered = format!("{pair:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("Scalar"));
    }

    #[test]
    fn public_key_rejects_identity_and_outsiders() {
        let group = toy_group();
        assert!(PublicKey::new(&group, group.identity()).is_err());
        assert!(PublicKey::from_bytes(&group, &[5]).is_err());
        assert!(PublicKey::from_bytes(&group, &[8]).is_ok());
    }

    #[test]
    fn proof_layout() {
        let group = toy_group();
        let proof = Proof::<SchnorrGroup>::new(
            group.element(9u32).unwrap(),
            group.scalar(6u32).unwrap(),
        );
        assert_eq!(proof.to_bytes(&group), vec![1, 0, 0, 0, 1, 9, 0, 0, 0, 1, 6]);
    }

    #[test]
    fn proof_bytes_decode() {
        let group = Secp256k1::new();
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let f = group.random_element(&mut rng);
        let r = group.random_scalar(&mut rng);
        let proof = Proof::<Secp256k1>::new(f, r);

        let bytes = proof.to_bytes(&group);
        assert_eq!(bytes.len(), 1 + 4 + 33 + 4 + 32);
        assert_eq!(Proof::from_bytes(&group, &bytes).unwrap(), proof);
    }

    #[test]
    fn proof_accepts_zero_response() {
        let group = toy_group();
        let bytes = [1, 0, 0, 0, 1, 9, 0, 0, 0, 1, 0];
        let proof = Proof::from_bytes(&group, &bytes).unwrap();
        assert!(group.scalar_is_zero(proof.response()));
    }

    #[test]
    fn proof_from_bytes_rejects_malformed_input() {
        let group = toy_group();
        assert!(Proof::from_bytes(&group, &[]).is_err());
        assert!(Proof::from_bytes(&group, &[1, 0, 0, 0]).is_err());
        assert!(Proof::from_bytes(&group, &[99, 0, 0, 0, 1, 9, 0, 0, 0, 1, 6]).is_err());
        assert!(Proof::from_bytes(&group, &[1, 0, 0, 0, 0]).is_err());
        assert!(Proof::from_bytes(&group, &[1, 0xff, 0xff, 0xff, 0xff]).is_err());
        // Trailing data.
        assert!(Proof::from_bytes(&group, &[1, 0, 0, 0, 1, 9, 0, 0, 0, 1, 6, 0]).is_err());
        // Response not below q.
        assert!(Proof::from_bytes(&group, &[1, 0, 0, 0, 1, 9, 0, 0, 0, 1, 11]).is_err());
        // Commitment outside the subgroup, then the identity.
        assert!(Proof::from_bytes(&group, &[1, 0, 0, 0, 1, 5, 0, 0, 0, 1, 6]).is_err());
        assert!(Proof::from_bytes(&group, &[1, 0, 0, 0, 1, 1, 0, 0, 0, 1, 6]).is_err());
    }

    #[test]
    fn multi_proof_layout() {
        let group = toy_group();
        let rounds = vec![
            Proof::<SchnorrGroup>::new(group.element(9u32).unwrap(), group.scalar(6u32).unwrap()),
            Proof::new(group.element(4u32).unwrap(), group.scalar(2u32).unwrap()),
        ];
        let proof = MultiProof::new(rounds);
        let bytes = proof.to_bytes(&group);
        assert_eq!(
            bytes,
            vec![1, 0, 0, 0, 2, 0, 0, 0, 1, 9, 0, 0, 0, 1, 6, 0, 0, 0, 1, 4, 0, 0, 0, 1, 2]
        );
        assert_eq!(MultiProof::from_bytes(&group, &bytes).unwrap(), proof);
    }

    #[test]
    fn multi_proof_rejects_inflated_round_count() {
        let group = toy_group();
        let bytes = [1, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 1, 9, 0, 0, 0, 1, 6];
        assert!(matches!(
            MultiProof::<SchnorrGroup>::from_bytes(&group, &bytes),
            Err(Error::Encoding(_))
        ));
    }
}
