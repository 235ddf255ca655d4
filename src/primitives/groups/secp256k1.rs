//! secp256k1 elliptic curve group implementation.
//!
//! The Koblitz curve `y^2 = x^3 + 7` over a 256-bit prime field, with prime
//! order `n` and cofactor 1. This is the curve of the elliptic-curve demo.
//!
//! Points travel as 33-byte compressed SEC1 encodings and enter the challenge
//! hash in that same form. Scalars are 32-byte big-endian integers below the
//! curve order.

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar as K256Scalar, U256};
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a secp256k1 scalar (32 bytes).
const K256_SCALAR_BYTES: usize = 32;

/// Number of bytes in a compressed secp256k1 point (33 bytes: 1 byte prefix + 32 byte x-coordinate).
const K256_COMPRESSED_BYTES: usize = 33;

/// secp256k1 elliptic curve group implementation.
#[derive(Clone, Debug, Default)]
pub struct Secp256k1 {
    generator: Element,
}

impl Secp256k1 {
    /// Creates the secp256k1 group descriptor.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Scalar in the secp256k1 group.
///
/// Scalars are automatically zeroized when dropped for security.
#[derive(Clone, Debug)]
pub struct Scalar(K256Scalar);

/// Element (point) in the secp256k1 group.
///
/// Points are stored in projective coordinates for efficient arithmetic,
/// and serialized in compressed form.
#[derive(Clone, Debug)]
pub struct Element(ProjectivePoint);

impl Default for Element {
    fn default() -> Self {
        Self(ProjectivePoint::GENERATOR)
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        // Overwrite with zero; the inner limbs are not exposed
        self.0 = K256Scalar::ZERO;
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_affine().eq(&other.0.to_affine())
    }
}

impl Eq for Element {}

impl Scalar {
    /// Creates a new scalar from a k256 Scalar.
    pub fn new(value: K256Scalar) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner k256 Scalar.
    pub fn inner(&self) -> &K256Scalar {
        &self.0
    }
}

impl Element {
    /// Creates a new element from a ProjectivePoint.
    pub fn new(value: ProjectivePoint) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner ProjectivePoint.
    pub fn inner(&self) -> &ProjectivePoint {
        &self.0
    }
}

impl Group for Secp256k1 {
    type Scalar = Scalar;
    type Element = Element;

    fn name(&self) -> &'static str {
        "secp256k1"
    }

    fn generator(&self) -> &Self::Element {
        &self.generator
    }

    fn order(&self) -> BigUint {
        // -1 mod n is n - 1.
        BigUint::from_bytes_be(&(-K256Scalar::ONE).to_bytes()) + 1u32
    }

    fn identity(&self) -> Self::Element {
        Element(ProjectivePoint::IDENTITY)
    }

    fn exp(&self, base: &Self::Element, exponent: &Self::Scalar) -> Self::Element {
        Element(base.0 * exponent.0)
    }

    fn combine(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element(a.0 + b.0)
    }

    fn validate_element(&self, _element: &Self::Element) -> Result<()> {
        // secp256k1 has cofactor 1, so every point on the curve lies in the prime-order group
        Ok(())
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        element.0.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != K256_COMPRESSED_BYTES {
            return Err(Error::InvalidGroupElement(format!(
                "Expected {} bytes, got {}",
                K256_COMPRESSED_BYTES,
                bytes.len()
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidGroupElement("Failed to parse encoded point".to_string()))?;

        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| {
                Error::InvalidGroupElement("Bytes do not represent a valid secp256k1 point".to_string())
            })?;

        Ok(Element(ProjectivePoint::from(affine)))
    }

    fn element_to_transcript(&self, element: &Self::Element) -> Vec<u8> {
        self.element_to_bytes(element)
    }

    fn scalar_to_bytes(&self, scalar: &Self::Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    fn scalar_from_bytes(&self, bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != K256_SCALAR_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected {} bytes, got {}",
                K256_SCALAR_BYTES,
                bytes.len()
            )));
        }

        let repr = FieldBytes::clone_from_slice(bytes);
        Option::<K256Scalar>::from(K256Scalar::from_repr(repr))
            .map(Scalar)
            .ok_or_else(|| {
                Error::InvalidScalar("Bytes do not represent a valid secp256k1 scalar".to_string())
            })
    }

    fn scalar_from_digest(&self, digest: &[u8; 32]) -> Self::Scalar {
        let bytes = FieldBytes::from(*digest);
        Scalar(<K256Scalar as Reduce<U256>>::reduce_bytes(&bytes))
    }

    fn scalar_from_u64(&self, value: u64) -> Self::Scalar {
        Scalar(K256Scalar::from(value))
    }

    fn scalar_add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 + b.0)
    }

    fn scalar_mul(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 * b.0)
    }

    fn scalar_is_zero(&self, scalar: &Self::Scalar) -> bool {
        scalar.0.is_zero().into()
    }

    fn random_scalar<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Scalar {
        loop {
            let candidate = K256Scalar::random(&mut *rng);
            if !bool::from(candidate.is_zero()) {
                return Scalar(candidate);
            }
        }
    }

    fn random_element<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Element {
        let k = self.random_scalar(rng);
        Element(ProjectivePoint::GENERATOR * k.0)
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::*;

    #[test]
    fn generator_encoding() {
        let group = Secp256k1::new();
        let bytes = group.element_to_bytes(group.generator());
        assert_eq!(bytes.len(), K256_COMPRESSED_BYTES);
        assert_eq!(
            hex::encode(&bytes),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(&group.element_from_bytes(&bytes).unwrap(), group.generator());
    }

    #[test]
    fn order_matches_curve() {
        let group = Secp256k1::new();
        assert_eq!(
            group.order().to_str_radix(16),
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        );
        assert_eq!(group.order_bits(), 256);
    }

    #[test]
    fn scalar_from_bytes_rejects_order() {
        let group = Secp256k1::new();
        let n = group.order().to_bytes_be();
        assert!(group.scalar_from_bytes(&n).is_err());
        assert!(group.scalar_from_bytes(&[0u8; 31]).is_err());
    }

    #[test]
    fn digest_is_reduced_modulo_order() {
        let group = Secp256k1::new();
        let digest = [0xffu8; 32];
        let reduced = group.scalar_from_digest(&digest);
        let expected = BigUint::from_bytes_be(&digest) % group.order();
        assert_eq!(
            BigUint::from_bytes_be(&group.scalar_to_bytes(&reduced)),
            expected
        );
    }

    #[test]
    fn exp_and_combine_agree() {
        let group = Secp256k1::new();
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let a = group.random_scalar(&mut rng);
        let b = group.random_scalar(&mut rng);

        let lhs = group.exp(group.generator(), &group.scalar_add(&a, &b));
        let rhs = group.combine(
            &group.exp(group.generator(), &a),
            &group.exp(group.generator(), &b),
        );
        assert_eq!(lhs, rhs);
        assert!(group.is_identity(&group.identity()));
    }

    #[test]
    fn rejects_malformed_points() {
        let group = Secp256k1::new();
        let mut bytes = group.element_to_bytes(group.generator());
        bytes[0] = 0x05;
        assert!(group.element_from_bytes(&bytes).is_err());
        assert!(group.element_from_bytes(&[0u8; 33]).is_err());
    }
}
