use core::fmt::Debug;

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::Result;

/// Trait for prime-order groups used by the Schnorr proof system.
///
/// An implementation is a *group descriptor*: it carries whatever public
/// parameters the group needs (a modulus, a curve) and performs every
/// operation the prover and verifier rely on. Multiplicative groups map
/// [`exp`](Group::exp) to modular exponentiation and [`combine`](Group::combine)
/// to modular multiplication; additive curve groups map them to scalar
/// multiplication and point addition.
///
/// Descriptors are immutable once constructed and are shared read-only by
/// every key pair and proof built on them.
pub trait Group: Clone + Debug + Send + Sync + 'static {
    /// Scalar type for this group (exponents, secrets, challenges, responses).
    ///
    /// Scalars must be zeroizable for security.
    type Scalar: Clone + Debug + Eq + PartialEq + Zeroize + Send + Sync;

    /// Element type for this group (commitments, public keys).
    type Element: Clone + Debug + Eq + PartialEq + Send + Sync;

    /// Returns the name of this group.
    fn name(&self) -> &'static str;

    /// Returns the generator of the prime-order group.
    fn generator(&self) -> &Self::Element;

    /// Returns the (prime) order of the generator.
    fn order(&self) -> BigUint;

    /// Returns the identity element.
    fn identity(&self) -> Self::Element;

    /// Checks if an element is the identity.
    fn is_identity(&self, element: &Self::Element) -> bool {
        *element == self.identity()
    }

    /// Exponentiates an element: `base^exponent` (or `exponent · base`).
    fn exp(&self, base: &Self::Element, exponent: &Self::Scalar) -> Self::Element;

    /// Combines two elements with the group operation: `a · b` (or `a + b`).
    fn combine(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Validates that an element belongs to the prime-order group.
    fn validate_element(&self, element: &Self::Element) -> Result<()>;

    /// Serializes an element in its canonical fixed-width form.
    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8>;

    /// Deserializes and validates an element from its canonical form.
    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element>;

    /// Representation of an element as it enters the challenge hash.
    fn element_to_transcript(&self, element: &Self::Element) -> Vec<u8>;

    /// Serializes a scalar in its canonical fixed-width form.
    fn scalar_to_bytes(&self, scalar: &Self::Scalar) -> Vec<u8>;

    /// Deserializes a scalar, rejecting values not below the group order.
    fn scalar_from_bytes(&self, bytes: &[u8]) -> Result<Self::Scalar>;

    /// Interprets a 256-bit digest as a big-endian integer reduced modulo the order.
    fn scalar_from_digest(&self, digest: &[u8; 32]) -> Self::Scalar;

    /// Reduces a small integer modulo the order.
    fn scalar_from_u64(&self, value: u64) -> Self::Scalar;

    /// Adds two scalars modulo the order.
    fn scalar_add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Multiplies two scalars modulo the order.
    fn scalar_mul(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Checks if a scalar is zero.
    fn scalar_is_zero(&self, scalar: &Self::Scalar) -> bool;

    /// Samples a scalar uniformly from `[1, order - 1]`.
    fn random_scalar<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Scalar;

    /// Samples a random candidate element, independent of any secret.
    ///
    /// Used to produce blind forgery attempts; the result is not required to
    /// lie in the prime-order subgroup.
    fn random_element<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Element;

    /// Checks that a secret or nonce lies in `[1, order - 1]`.
    fn check_scalar(&self, scalar: &Self::Scalar) -> Result<()> {
        if self.scalar_is_zero(scalar) {
            return Err(crate::Error::InvalidScalar(
                "Scalar must lie in [1, order - 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of bits of the group order.
    fn order_bits(&self) -> u64 {
        self.order().bits()
    }
}
