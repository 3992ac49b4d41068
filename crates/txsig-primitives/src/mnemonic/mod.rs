//! BIP-39 mnemonic validation and seed derivation.
//!
//! Thin wrapper over the `bip39` crate: validates the phrase against the
//! English word list and checksum, then derives the 64-byte PBKDF2 seed
//! fed into BIP-32 master key generation.

use bip39::{Language, Mnemonic};

use crate::PrimitivesError;

/// Validate a mnemonic phrase and derive its 64-byte seed.
///
/// The phrase must be a valid BIP-39 English mnemonic (word list
/// membership and checksum are both checked). The passphrase may be
/// empty; a different passphrase yields an unrelated seed.
pub fn seed_from_mnemonic(phrase: &str, passphrase: &str) -> Result<[u8; 64], PrimitivesError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| PrimitivesError::InvalidMnemonic(e.to_string()))?;
    Ok(mnemonic.to_seed_normalized(passphrase))
}
