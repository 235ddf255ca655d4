use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Primes used for trial division before Miller-Rabin.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller-Rabin witness bases.
///
/// The first thirteen bases alone are a deterministic test for every
/// `n < 3.3 * 10^24`; above that bound the test is probabilistic.
const WITNESS_BASES: [u32; 20] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

/// Performs modular exponentiation: `base^exp mod modulus`.
///
/// # Errors
///
/// Returns an error if the modulus is zero.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidParams("modulus cannot be zero".to_string()));
    }
    Ok(base.modpow(exp, modulus))
}

/// Miller-Rabin primality test preceded by trial division.
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for &base in WITNESS_BASES.iter() {
        let mut x = BigUint::from(base).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }
        return false;
    }

    true
}

/// Number of bytes needed to hold any value below `bound`: `ceil(bits(bound) / 8)`.
pub fn byte_width(bound: &BigUint) -> usize {
    (bound.bits() as usize).div_ceil(8).max(1)
}

/// Encodes `value` as a big-endian integer left-padded to `width` bytes.
///
/// The caller guarantees `value` fits in `width` bytes.
pub fn to_fixed_be(value: &BigUint, width: usize) -> Vec<u8> {
    let raw = value.to_bytes_be();
    if raw.len() >= width {
        return raw[raw.len() - width..].to_vec();
    }
    let mut out = vec![0u8; width - raw.len()];
    out.extend_from_slice(&raw);
    out
}
