/// txsig SDK - Cryptographic primitives and encodings.
///
/// This crate provides the foundational building blocks for the txsig SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, HMAC-SHA512)
/// - Variable-length integer encoding and wire-format byte cursors
/// - Elliptic curve cryptography (secp256k1 keys and signatures)
/// - BIP-32 hierarchical key derivation and BIP-39 mnemonic seeds
/// - P2PKH address encoding for mainnet and testnet

pub mod hash;
pub mod util;
pub mod ec;
pub mod hd;
pub mod mnemonic;
pub mod address;

mod error;
pub use error::PrimitivesError;

pub use address::{Address, Network};
