//! NIST P-256 (secp256r1) elliptic curve group implementation.
//!
//! # Security Level
//!
//! P-256 provides approximately 128 bits of security against classical attacks.
//!
//! Points travel as 33-byte compressed SEC1 encodings and enter the challenge
//! hash in that same form. Scalars are 32-byte big-endian integers below the
//! curve order.

use num_bigint::BigUint;
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::elliptic_curve::{Field, PrimeField};
use p256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar as P256Scalar, U256};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a P-256 scalar (32 bytes).
const P256_SCALAR_BYTES: usize = 32;

/// Number of bytes in a compressed P-256 point (33 bytes: 1 byte prefix + 32 byte x-coordinate).
const P256_COMPRESSED_BYTES: usize = 33;

/// P-256 (secp256r1) elliptic curve group implementation.
#[derive(Clone, Debug, Default)]
pub struct P256 {
    generator: Element,
}

impl P256 {
    /// Creates the P-256 group descriptor.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Scalar in the P-256 group.
///
/// Scalars are automatically zeroized when dropped for security.
#[derive(Clone, Debug)]
pub struct Scalar(P256Scalar);

/// Element (point) in the P-256 group.
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
        // P256Scalar doesn't expose mutable internals, so we overwrite with zero
        self.0 = P256Scalar::ZERO;
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
    /// Creates a new scalar from a p256 Scalar.
    pub fn new(value: P256Scalar) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner p256 Scalar.
    pub fn inner(&self) -> &P256Scalar {
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

impl Group for P256 {
    type Scalar = Scalar;
    type Element = Element;

    fn name(&self) -> &'static str {
        "P-256"
    }

    fn generator(&self) -> &Self::Element {
        &self.generator
    }

    fn order(&self) -> BigUint {
        // -1 mod n is n - 1.
        BigUint::from_bytes_be(&(-P256Scalar::ONE).to_bytes()) + 1u32
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
        // P-256 has cofactor 1, so every point on the curve lies in the prime-order group
        Ok(())
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        element.0.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != P256_COMPRESSED_BYTES {
            return Err(Error::InvalidGroupElement(format!(
                "Expected {} bytes, got {}",
                P256_COMPRESSED_BYTES,
                bytes.len()
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidGroupElement("Failed to parse encoded point".to_string()))?;

        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| {
                Error::InvalidGroupElement("Bytes do not represent a valid P-256 point".to_string())
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
        if bytes.len() != P256_SCALAR_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected {} bytes, got {}",
                P256_SCALAR_BYTES,
                bytes.len()
            )));
        }

        let repr = FieldBytes::clone_from_slice(bytes);
        Option::<P256Scalar>::from(P256Scalar::from_repr(repr))
            .map(Scalar)
            .ok_or_else(|| {
                Error::InvalidScalar("Bytes do not represent a valid P-256 scalar".to_string())
            })
    }

    fn scalar_from_digest(&self, digest: &[u8; 32]) -> Self::Scalar {
        let bytes = FieldBytes::from(*digest);
        Scalar(<P256Scalar as Reduce<U256>>::reduce_bytes(&bytes))
    }

    fn scalar_from_u64(&self, value: u64) -> Self::Scalar {
        Scalar(P256Scalar::from(value))
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
            let candidate = P256Scalar::random(&mut *rng);
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
