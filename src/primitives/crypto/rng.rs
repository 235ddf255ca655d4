//! Cryptographically secure random number generation.
//!
//! Randomness is always injected: every function that samples a secret, a
//! nonce or a forgery attempt takes `&mut R` with `R: CryptoRngCore`. There is
//! no process-wide generator.

use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, CryptoRngCore, OsRng, RngCore, SeedableRng};

/// Cryptographically secure random number generator backed by the OS.
///
/// This is a thin wrapper around `OsRng` that provides a consistent interface
/// for cryptographic randomness throughout the library. Tests inject a seeded
/// [`ChaCha20Rng`] instead.
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Derives an independent ChaCha20 stream from `rng`.
///
/// Each worker of a parallel computation gets its own stream, so no generator
/// state is ever shared between workers and the combined output only depends
/// on the parent generator.
pub fn fork<R: CryptoRngCore>(rng: &mut R) -> ChaCha20Rng {
    let mut seed = <ChaCha20Rng as SeedableRng>::Seed::default();
    rng.fill_bytes(&mut seed);
    ChaCha20Rng::from_seed(seed)
}
