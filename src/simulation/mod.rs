//! Forgery-probability simulation.
//!
//! A forger without the secret submits uniformly random `(F_i, r_i)` rounds
//! to a verifier bound to an honest public key. The empirical acceptance
//! rate is compared against the knowledge error `1 / q^k`. This is a
//! statistical sanity check of the verifier, not a security proof.
//!
//! Trials run in fixed-size chunks. Each chunk draws from its own ChaCha20
//! stream forked from the caller's generator, so a seeded run reports the
//! same counts whether or not the `parallel` feature is enabled.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand_chacha::ChaCha20Rng;
use rand_core::CryptoRngCore;
use serde::Serialize;
use tracing::{debug, info};

use crate::primitives::crypto::rng::fork;
use crate::{Group, KeyPair, MultiProof, Proof, Result, SchnorrGroup, Verifier};

/// Simulation settings.
pub mod config;

pub use config::SimulationConfig;

/// Number of trials run on one forked generator.
const CHUNK_TRIALS: u64 = 4096;

/// Counts of one forgery experiment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ForgeryOutcome {
    /// Forgery attempts made.
    pub trials: u64,
    /// Attempts the verifier accepted.
    pub successes: u64,
}

impl ForgeryOutcome {
    /// Fraction of attempts accepted; zero when no attempt was made.
    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.successes as f64 / self.trials as f64
    }
}

/// Result of the experiment for one round count `k`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForgeryReport {
    /// Number of rounds per forged proof.
    pub k: usize,
    /// Bit length of the subgroup order used.
    pub order_bits: u64,
    /// Forgery attempts made.
    pub trials: u64,
    /// Attempts the verifier accepted.
    pub successes: u64,
    /// `successes / trials`.
    pub success_rate: f64,
    /// Knowledge error `1 / q^k`.
    pub theoretical_rate: f64,
}

/// Knowledge error `1 / q^k` of a `k`-round proof over a group of order `q`.
///
/// Underflows to `0.0` once `q^k` exceeds the range of `f64`.
pub fn theoretical_rate(order: &BigUint, k: usize) -> f64 {
    let q = order.to_f64().unwrap_or(f64::INFINITY);
    let k = i32::try_from(k).unwrap_or(i32::MAX);
    q.recip().powi(k)
}

/// Runs `trials` blind forgeries of `k` rounds against `verifier`.
///
/// Every round pairs [`Group::random_element`] with [`Group::random_scalar`],
/// independent of any real proof, and the forged proof is checked with
/// [`Verifier::verify_multi`].
pub fn simulate_rounds<G: Group, R: CryptoRngCore>(
    verifier: &Verifier<G>,
    k: usize,
    trials: u64,
    rng: &mut R,
) -> ForgeryOutcome {
    let chunks: Vec<(ChaCha20Rng, u64)> = (0..trials.div_ceil(CHUNK_TRIALS))
        .map(|index| {
            let start = index * CHUNK_TRIALS;
            (fork(rng), CHUNK_TRIALS.min(trials - start))
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let iter = chunks.into_iter();
    #[cfg(feature = "parallel")]
    let iter = chunks.into_par_iter();

    let successes: u64 = iter
        .map(|(mut chunk_rng, chunk_trials)| run_chunk(verifier, k, chunk_trials, &mut chunk_rng))
        .sum();

    metrics::counter!("forgery.trials").increment(trials);
    metrics::counter!("forgery.successes").increment(successes);

    ForgeryOutcome { trials, successes }
}

fn run_chunk<G: Group>(verifier: &Verifier<G>, k: usize, trials: u64, rng: &mut ChaCha20Rng) -> u64 {
    let group = verifier.group();
    let mut successes = 0;

    for _ in 0..trials {
        let rounds = (0..k)
            .map(|_| Proof::<G>::new(group.random_element(rng), group.random_scalar(rng)))
            .collect();
        if verifier.verify_multi(&MultiProof::new(rounds), k) {
            successes += 1;
        }
    }

    successes
}

/// Forgery simulator over freshly generated finite-field groups.
///
/// For every configured `k` it generates one group and one key pair, binds a
/// verifier to the honest public key and runs the configured number of blind
/// forgeries.
#[derive(Clone, Debug)]
pub struct ForgerySimulator {
    config: SimulationConfig,
}

impl ForgerySimulator {
    /// Creates a simulator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`](crate::Error::InvalidParams) if the
    /// configuration is not runnable.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs one experiment per configured round count, in order.
    ///
    /// # Errors
    ///
    /// Propagates group construction failures.
    pub fn run<R: CryptoRngCore>(&self, rng: &mut R) -> Result<Vec<ForgeryReport>> {
        self.config
            .k_values
            .iter()
            .map(|&k| self.run_one(k, rng))
            .collect()
    }

    fn run_one<R: CryptoRngCore>(&self, k: usize, rng: &mut R) -> Result<ForgeryReport> {
        let group = SchnorrGroup::generate(self.config.bits, rng)?;
        debug!(k, modulus = %group.modulus(), order = %group.subgroup_order(), "simulation group ready");

        let key_pair = KeyPair::generate(&group, rng);
        let order = group.order();
        let verifier = Verifier::new(
            group,
            key_pair.public().clone(),
            self.config.context.as_bytes(),
        );

        let outcome = simulate_rounds(&verifier, k, self.config.trials, rng);
        let report = ForgeryReport {
            k,
            order_bits: order.bits(),
            trials: outcome.trials,
            successes: outcome.successes,
            success_rate: outcome.success_rate(),
            theoretical_rate: theoretical_rate(&order, k),
        };

        info!(
            k,
            trials = report.trials,
            successes = report.successes,
            success_rate = report.success_rate,
            theoretical_rate = report.theoretical_rate,
            "forgery simulation finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use rand_core::SeedableRng;

    use super::*;

    #[test]
    fn theoretical_rate_matches_closed_form() {
        let q = BigUint::from(11u32);
        assert!((theoretical_rate(&q, 1) - 1.0 / 11.0).abs() < 1e-15);
        assert!((theoretical_rate(&q, 3) - 1.0 / 1331.0).abs() < 1e-15);

        let big = BigUint::from(1u32) << 128u32;
        assert_eq!(theoretical_rate(&big, 20), 0.0);
    }

    #[test]
    fn chunking_covers_every_trial() {
        let group = SchnorrGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(61);
        let key_pair = KeyPair::generate(&group, &mut rng);
        let verifier = Verifier::new(group, key_pair.public().clone(), b"sim".to_vec());

        let outcome = simulate_rounds(&verifier, 1, CHUNK_TRIALS + 3, &mut rng);
        assert_eq!(outcome.trials, CHUNK_TRIALS + 3);
        assert!(outcome.successes <= outcome.trials);
    }

    #[test]
    fn seeded_runs_repeat() {
        let group = SchnorrGroup::new(23u32.into(), 11u32.into(), 2u32.into()).unwrap();
        let key_pair = KeyPair::from_secret(&group, group.scalar(3u32).unwrap()).unwrap();
        let verifier = Verifier::new(group, key_pair.public().clone(), b"sim".to_vec());

        let run = |seed| simulate_rounds(&verifier, 2, 2_000, &mut ChaCha20Rng::seed_from_u64(seed));
        assert_eq!(run(62), run(62));
    }

    #[test]
    fn zero_trials() {
        let outcome = ForgeryOutcome::default();
        assert_eq!(outcome.success_rate(), 0.0);
    }

    #[test]
    fn simulator_rejects_invalid_config() {
        let config = SimulationConfig {
            trials: 0,
            ..SimulationConfig::default()
        };
        assert!(ForgerySimulator::new(config).is_err());
    }
}
