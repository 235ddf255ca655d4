//! Core cryptographic primitives for Schnorr proofs.
//!
//! This module contains all fundamental mathematical and cryptographic building blocks:
//! - **crypto**: Modular arithmetic, the group trait, and secure randomness
//! - **groups**: Concrete group implementations (finite-field Schnorr groups, secp256k1, P-256)
//! - **gadgets**: Keys and proofs with their byte encodings
//! - **transcript**: Fiat-Shamir challenge derivation

/// Cryptographic primitives and traits.
pub mod crypto;
/// Protocol gadgets (keys, key pairs, proofs).
pub mod gadgets;
/// Group implementations for the Schnorr protocol.
pub mod groups;
/// Transcript for Fiat-Shamir transform.
pub mod transcript;

pub use crypto::{Group, SecureRng};
pub use gadgets::{KeyPair, MultiProof, Proof, PublicKey, SecretKey};
pub use groups::{P256, SchnorrGroup, Secp256k1};
pub use transcript::Transcript;
