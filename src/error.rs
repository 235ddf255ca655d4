//! Error types for Fiat-Shamir Schnorr proofs.

/// Main error types for the library.
///
/// A proof that simply fails its verification equation is not an error: the
/// verifier answers `false` for that case.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Safe-prime or generator search exhausted its candidate space.
    #[error("Group construction failed: {0}")]
    GroupConstruction(String),

    /// Invalid group parameters or protocol arguments were provided.
    #[error("Invalid group parameters: {0}")]
    InvalidParams(String),

    /// A scalar value is invalid or out of range.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// A group element is invalid or not in the correct group.
    #[error("Invalid group element: {0}")]
    InvalidGroupElement(String),

    /// A multi-challenge proof or batch does not have the expected number of members.
    #[error("Proof shape mismatch: expected {expected}, got {actual}")]
    ProofShape {
        /// Number of members the caller asked for.
        expected: usize,
        /// Number of members actually supplied.
        actual: usize,
    },

    /// Serialized proof bytes are malformed.
    #[error("Malformed encoding: {0}")]
    Encoding(String),
}

/// Result type alias for library operations.
pub type Result<T> = core::result::Result<T, Error>;
