//! # crypto-utils
//!
//! Curve25519 field arithmetic and the Edwards point operations needed to
//! derive Ed25519 public keys and test whether 32 bytes lie on the curve.
//!
//! Signing and verification are left to `ed25519-dalek`; this crate covers
//! the pieces the address layer needs without it (public key derivation and
//! the on-curve check behind program-derived addresses).

pub mod edwards;
pub mod field;
pub mod secret;

pub use edwards::{derive_public_key, is_on_curve, EdwardsPoint};
pub use field::FieldElement;
pub use secret::SecretSeed;
