/// NIST P-256 elliptic curve group.
pub mod p256;
/// Prime-order subgroups of `Z_p^*`.
pub mod schnorr;
/// secp256k1 elliptic curve group.
pub mod secp256k1;

pub use p256::P256;
pub use schnorr::SchnorrGroup;
pub use secp256k1::Secp256k1;
