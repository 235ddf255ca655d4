//! Common test utilities shared across integration tests.

use fiat_shamir_zkp::{KeyPair, Prover, SchnorrGroup, Verifier};

/// Context shared by tests that do not exercise context binding.
pub const CONTEXT: &[u8] = b"FiatShamirDemo2025";

/// Initialize test tracing (call once at the beginning of tests).
///
/// Logs from the library at DEBUG level go to the test writer.
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("fiat_shamir_zkp=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// The order-11 subgroup of `Z_23^*` generated by 2.
#[allow(dead_code)]
pub fn toy_group() -> SchnorrGroup {
    SchnorrGroup::new(23u32.into(), 11u32.into(), 2u32.into())
        .expect("toy parameters should be valid")
}

/// Prover and verifier for the toy group with secret `x = 3` (`y = 8`).
#[allow(dead_code)]
pub fn toy_pair(context: &[u8]) -> (Prover<SchnorrGroup>, Verifier<SchnorrGroup>) {
    let group = toy_group();
    let x = group.scalar(3u32).expect("3 is a valid scalar");
    let key_pair = KeyPair::from_secret(&group, x).expect("nonzero secret");
    let verifier = Verifier::new(group.clone(), key_pair.public().clone(), context);
    (Prover::new(group, key_pair, context), verifier)
}
