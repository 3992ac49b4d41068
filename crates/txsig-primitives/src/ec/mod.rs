//! Elliptic curve cryptography on secp256k1.
//!
//! Private/public key types wrapping the k256 crate, and an ECDSA
//! signature type with DER and compact (recoverable) serialization.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
