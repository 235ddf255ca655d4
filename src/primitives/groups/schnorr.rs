//! Prime-order subgroups of `Z_p^*` with `p = q * r + 1` ("Schnorr groups").
//!
//! Parameters are either searched at run time for a requested bit length
//! ([`SchnorrGroup::generate`]), supplied and checked by the caller
//! ([`SchnorrGroup::new`]), or taken from a preset.
//!
//! Elements are encoded as fixed-width big-endian integers of
//! `ceil(bits(p) / 8)` bytes, scalars as `ceil(bits(q) / 8)` bytes. In the
//! challenge hash an element is written as its ASCII decimal expansion.

use core::ops::Range;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use tracing::debug;
use zeroize::Zeroize;

use crate::primitives::crypto::field::{byte_width, is_probable_prime, mod_pow, to_fixed_be};
use crate::{Error, Group, Result};

/// Cofactors `r` tried for every prime candidate `q` when searching `p = q * r + 1`.
const COFACTOR_RANGE: Range<u32> = 2..20;

/// Maximum number of order candidates drawn before giving up.
const MAX_ORDER_CANDIDATES: usize = 100_000;

/// Maximum number of generator candidates scanned before giving up.
const MAX_GENERATOR_CANDIDATES: u32 = 1 << 16;

/// RFC 5114 §2.3 modulus (2048-bit MODP group with 256-bit prime order subgroup).
const RFC5114_P: &[u8] = b"87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8EF6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597";

/// RFC 5114 §2.3 subgroup order.
const RFC5114_Q: &[u8] = b"8CF83642A709A097B447997640129DA299B1A47D1EB3750BA308B0FE64F5FBD3";

/// RFC 5114 §2.3 generator.
const RFC5114_G: &[u8] = b"3FB32C9B73134D0B2E77506660EDBD484CA7B18F21EF205407F4793A1A0BA12510DBC15077BE463FFF4FED4AAC0BB555BE3A6C1B0C6B47B1BC3773BF7E8C6F62901228F8C28CBB18A55AE31341000A650196F931C77A57F2DDF463E5E9EC144B777DE62AAAB8A8628AC376D282D6ED3864E67982428EBC831D14348F6F2F9193B5045AF2767164E1DFC967C1FB3F2E55A4BD1BFFE83B9C80D052B985D182EA0ADB2A3B7313D3FE14C8484B1E052588B9B7D2BBD2DF016199ECD06E1557CD0915B3353BBB64E0EC377FD028370DF92B52C7891428CDC67EB6184B523D1DB246C32F63078490F00EF8D647D148D47954515E2327CFEF98C582664B4C0F6CC41659";

/// 133-bit modulus `p = 18 q + 1` used for batch-verification benchmarks.
const BENCH_P: &[u8] = b"5502416447973014042564914579205940370339";

/// 128-bit prime order of the benchmark group.
const BENCH_Q: &[u8] = b"305689802665167446809161921066996687241";

/// Generator of the order-`q` subgroup of the benchmark group.
const BENCH_G: u32 = 67;

/// Scalar modulo the subgroup order `q`.
///
/// Zeroized on drop. The wiping only clears the live value; it does not reach
/// heap buffers released by earlier arithmetic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scalar(BigUint);

impl Scalar {
    /// Returns the integer value of this scalar.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.set_zero();
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Element of `Z_p^*`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Element(BigUint);

impl Element {
    /// Returns the integer value of this element.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

/// Descriptor of the order-`q` subgroup of `Z_p^*` generated by `g`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchnorrGroup {
    p: BigUint,
    q: BigUint,
    g: Element,
    element_len: usize,
    scalar_len: usize,
}

impl SchnorrGroup {
    /// Builds a group from caller-supplied parameters after checking them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] unless `p` and `q` are (probable)
    /// primes with `q >= 3`, `q` divides `p - 1`, `1 < g < p` and
    /// `g^q ≡ 1 (mod p)`.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self> {
        if q < BigUint::from(3u32) {
            return Err(Error::InvalidParams("order q must be at least 3".to_string()));
        }
        if !is_probable_prime(&q) {
            return Err(Error::InvalidParams("order q is not prime".to_string()));
        }
        if !is_probable_prime(&p) {
            return Err(Error::InvalidParams("modulus p is not prime".to_string()));
        }
        if !((&p - 1u32) % &q).is_zero() {
            return Err(Error::InvalidParams(
                "order q does not divide p - 1".to_string(),
            ));
        }
        if g <= BigUint::one() || g >= p {
            return Err(Error::InvalidParams(
                "generator must lie in (1, p)".to_string(),
            ));
        }
        if !mod_pow(&g, &q, &p)?.is_one() {
            return Err(Error::InvalidParams(
                "generator does not have order q".to_string(),
            ));
        }

        Ok(Self::from_parts(p, q, g))
    }

    /// Searches fresh parameters with a `bits`-bit prime order.
    ///
    /// Draws random `bits`-bit odd candidates `q` until one is prime and some
    /// cofactor `r` in `[2, 20)` makes `p = q * r + 1` prime, then takes the
    /// smallest generator of the order-`q` subgroup.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParams`] if `bits < 2`.
    /// - [`Error::GroupConstruction`] if the candidate budget runs out or no
    ///   generator is found; retry with fresh randomness or more bits.
    pub fn generate<R: CryptoRngCore>(bits: u64, rng: &mut R) -> Result<Self> {
        if bits < 2 {
            return Err(Error::InvalidParams(format!(
                "order bit length must be at least 2, got {bits}"
            )));
        }

        let top_bit = BigUint::one() << (bits - 1);

        for attempt in 1..=MAX_ORDER_CANDIDATES {
            let mut q = rng.gen_biguint(bits);
            q |= &top_bit;
            q |= BigUint::one();

            if !is_probable_prime(&q) {
                continue;
            }

            for r in COFACTOR_RANGE {
                let p = &q * r + 1u32;
                if !is_probable_prime(&p) {
                    continue;
                }

                let g = find_generator(&p, &q)?;
                debug!(bits, attempt, cofactor = r, "found Schnorr group parameters");
                return Ok(Self::from_parts(p, q, g));
            }
        }

        Err(Error::GroupConstruction(format!(
            "no {bits}-bit order with a prime p = q * r + 1 after {MAX_ORDER_CANDIDATES} candidates"
        )))
    }

    /// The 2048-bit MODP group with 256-bit prime order subgroup from RFC 5114 §2.3.
    pub fn rfc5114_2048_256() -> Self {
        let p = parse_constant(RFC5114_P, 16);
        let q = parse_constant(RFC5114_Q, 16);
        let g = parse_constant(RFC5114_G, 16);
        Self::from_parts(p, q, g)
    }

    /// Fixed 128-bit-order group (`p = 18 q + 1`, `g = 67`) for reproducible benchmarks.
    pub fn benchmark_128() -> Self {
        let p = parse_constant(BENCH_P, 10);
        let q = parse_constant(BENCH_Q, 10);
        Self::from_parts(p, q, BigUint::from(BENCH_G))
    }

    fn from_parts(p: BigUint, q: BigUint, g: BigUint) -> Self {
        let element_len = byte_width(&p);
        let scalar_len = byte_width(&q);
        Self {
            p,
            q,
            g: Element(g),
            element_len,
            scalar_len,
        }
    }

    /// Returns the modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Returns the subgroup order `q`.
    pub fn subgroup_order(&self) -> &BigUint {
        &self.q
    }

    /// Returns the cofactor `(p - 1) / q`.
    pub fn cofactor(&self) -> BigUint {
        (&self.p - 1u32) / &self.q
    }

    /// Width in bytes of an encoded element.
    pub fn element_len(&self) -> usize {
        self.element_len
    }

    /// Width in bytes of an encoded scalar.
    pub fn scalar_len(&self) -> usize {
        self.scalar_len
    }

    /// Wraps an integer as a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScalar`] if `value >= q`.
    pub fn scalar(&self, value: impl Into<BigUint>) -> Result<Scalar> {
        let value = value.into();
        if value >= self.q {
            return Err(Error::InvalidScalar(
                "Scalar value must be less than group order".to_string(),
            ));
        }
        Ok(Scalar(value))
    }

    /// Wraps an integer as a subgroup element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGroupElement`] if `value` is not in the order-`q` subgroup.
    pub fn element(&self, value: impl Into<BigUint>) -> Result<Element> {
        let element = Element(value.into());
        self.validate_element(&element)?;
        Ok(element)
    }
}

impl Group for SchnorrGroup {
    type Scalar = Scalar;
    type Element = Element;

    fn name(&self) -> &'static str {
        "Schnorr-FF"
    }

    fn generator(&self) -> &Self::Element {
        &self.g
    }

    fn order(&self) -> BigUint {
        self.q.clone()
    }

    fn identity(&self) -> Self::Element {
        Element(BigUint::one())
    }

    fn exp(&self, base: &Self::Element, exponent: &Self::Scalar) -> Self::Element {
        Element(base.0.modpow(&exponent.0, &self.p))
    }

    fn combine(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element((&a.0 * &b.0) % &self.p)
    }

    fn validate_element(&self, element: &Self::Element) -> Result<()> {
        if element.0.is_zero() || element.0 >= self.p {
            return Err(Error::InvalidGroupElement(
                "Element must lie in [1, p)".to_string(),
            ));
        }

        if !element.0.modpow(&self.q, &self.p).is_one() {
            return Err(Error::InvalidGroupElement(
                "Element is not in the correct subgroup".to_string(),
            ));
        }

        Ok(())
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        to_fixed_be(&element.0, self.element_len)
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != self.element_len {
            return Err(Error::InvalidGroupElement(format!(
                "Expected {} bytes, got {}",
                self.element_len,
                bytes.len()
            )));
        }

        let element = Element(BigUint::from_bytes_be(bytes));
        self.validate_element(&element)?;
        Ok(element)
    }

    fn element_to_transcript(&self, element: &Self::Element) -> Vec<u8> {
        element.0.to_str_radix(10).into_bytes()
    }

    fn scalar_to_bytes(&self, scalar: &Self::Scalar) -> Vec<u8> {
        to_fixed_be(&scalar.0, self.scalar_len)
    }

    fn scalar_from_bytes(&self, bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != self.scalar_len {
            return Err(Error::InvalidScalar(format!(
                "Expected {} bytes, got {}",
                self.scalar_len,
                bytes.len()
            )));
        }
        self.scalar(BigUint::from_bytes_be(bytes))
    }

    fn scalar_from_digest(&self, digest: &[u8; 32]) -> Self::Scalar {
        Scalar(BigUint::from_bytes_be(digest) % &self.q)
    }

    fn scalar_from_u64(&self, value: u64) -> Self::Scalar {
        Scalar(BigUint::from(value) % &self.q)
    }

    fn scalar_add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar((&a.0 + &b.0) % &self.q)
    }

    fn scalar_mul(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar((&a.0 * &b.0) % &self.q)
    }

    fn scalar_is_zero(&self, scalar: &Self::Scalar) -> bool {
        scalar.0.is_zero()
    }

    fn random_scalar<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Scalar {
        Scalar(rng.gen_biguint_range(&BigUint::one(), &self.q))
    }

    fn random_element<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Element {
        Element(rng.gen_biguint_range(&BigUint::from(2u32), &(&self.p - 1u32)))
    }

    fn check_scalar(&self, scalar: &Self::Scalar) -> Result<()> {
        if scalar.0.is_zero() || scalar.0 >= self.q {
            return Err(Error::InvalidScalar(
                "Scalar must lie in [1, q - 1]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the smallest `g >= 2` with `g^q ≡ 1 (mod p)`.
fn find_generator(p: &BigUint, q: &BigUint) -> Result<BigUint> {
    let mut candidate = BigUint::from(2u32);
    for _ in 0..MAX_GENERATOR_CANDIDATES {
        if candidate >= *p {
            break;
        }
        if candidate.modpow(q, p).is_one() {
            return Ok(candidate);
        }
        candidate += 1u32;
    }

    Err(Error::GroupConstruction(
        "no generator of the order-q subgroup found; restart parameter search".to_string(),
    ))
}

fn parse_constant(digits: &[u8], radix: u32) -> BigUint {
    BigUint::parse_bytes(digits, radix)
        .unwrap_or_else(|| unreachable!("group constants are valid numerals"))
}
