//! Non-interactive Schnorr proofs of knowledge via the Fiat-Shamir transform.
//!
//! A prover convinces a verifier that it knows `x` with `y = g^x` in a
//! prime-order group by sending a commitment `F = g^s` and a response
//! `r = s + c * x mod q`, where the challenge `c` is a SHA-256 hash of
//! `F`, `y` and a caller-chosen context instead of a verifier message.
//!
//! The crate provides:
//! - prime-order groups: finite-field Schnorr groups ([`SchnorrGroup`]),
//!   [`Secp256k1`] and [`P256`], all behind the [`Group`] trait
//! - single-challenge proofs, k-round proofs bound by one joint challenge
//!   expansion, and batch verification of many single-challenge proofs
//! - a forgery simulator measuring how often blind guesses get accepted
//! - canonical, versioned byte encodings of keys and proofs
//!
//! # Example
//!
//! ```rust
//! use fiat_shamir_zkp::{KeyPair, Prover, SchnorrGroup, SecureRng, Verifier};
//!
//! let group = SchnorrGroup::benchmark_128();
//! let mut rng = SecureRng::new();
//! let key_pair = KeyPair::generate(&group, &mut rng);
//! let public_key = key_pair.public().clone();
//!
//! let prover = Prover::new(group.clone(), key_pair, b"example".to_vec());
//! let proof = prover.prove(&mut rng);
//!
//! let verifier = Verifier::new(group, public_key, b"example".to_vec());
//! assert!(verifier.verify(&proof));
//! ```
//!
//! # Security
//!
//! - Randomness is always supplied by the caller; use [`SecureRng`] outside tests
//! - Batch verification combines proofs without random weights, see [`verifier::batch`]
//! - The k-challenge expansion reduces 32-bit words modulo the order, see [`Transcript`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Error types.
pub mod error;
/// Core cryptographic primitives.
pub mod primitives;
/// Proof generation.
pub mod prover;
/// Forgery-probability simulation.
pub mod simulation;
/// Proof verification.
pub mod verifier;

pub use error::{Error, Result};
pub use primitives::{
    Group, KeyPair, MultiProof, P256, Proof, PublicKey, SchnorrGroup, SecretKey, Secp256k1,
    SecureRng, Transcript,
};
pub use prover::{Nonce, Prover};
pub use simulation::{
    simulate_rounds, theoretical_rate, ForgeryOutcome, ForgeryReport, ForgerySimulator,
    SimulationConfig,
};
pub use verifier::{batch_verify, BatchVerifier, Verifier};
