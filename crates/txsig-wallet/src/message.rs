//! Signed message support.
//!
//! Implements the fixed varint-framed message scheme: the magic prefix
//! and the message are each length-framed, double-SHA256 hashed, and
//! signed with a 65-byte compact recoverable signature carried as
//! base64. Verification recovers the public key from the signature and
//! compares the derived address against the claimed one.

use base64::Engine;

use txsig_primitives::address::Address;
use txsig_primitives::ec::{PrivateKey, Signature};
use txsig_primitives::hash::sha256d;
use txsig_primitives::util::{ByteWriter, VarInt};

use crate::WalletError;

/// Magic prefix framing every signed message.
pub const MESSAGE_MAGIC: &str = "Bitcoin Signed Message:\n";

/// Compute the digest that is signed for a message.
///
/// sha256d( varint(len(magic)) || magic || varint(len(message)) || message )
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(MESSAGE_MAGIC.len() + message.len() + 4);
    writer.write_varint(VarInt::from(MESSAGE_MAGIC.len()));
    writer.write_bytes(MESSAGE_MAGIC.as_bytes());
    writer.write_varint(VarInt::from(message.len()));
    writer.write_bytes(message);
    sha256d(writer.as_bytes())
}

/// Sign a message, returning the base64 compact recoverable signature.
///
/// Signing is deterministic: the same key and message always produce
/// the same signature string.
pub fn sign_message(priv_key: &PrivateKey, message: &str) -> Result<String, WalletError> {
    let digest = message_digest(message.as_bytes());
    let compact = Signature::to_compact(&digest, priv_key)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(compact))
}

/// Verify a signed message against an address.
///
/// Total over its inputs: malformed base64, a wrong-length signature, a
/// failed key recovery, or an unparseable address all yield `false`,
/// never an error. Returns `true` only when the key recovered from the
/// signature encodes to exactly the given address on its network.
pub fn verify_message(message: &str, address: &str, signature: &str) -> bool {
    let compact = match base64::engine::general_purpose::STANDARD.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let digest = message_digest(message.as_bytes());
    let recovered = match Signature::recover_public_key(&compact, &digest) {
        Ok(public_key) => public_key,
        Err(_) => return false,
    };

    let claimed = match Address::from_string(address) {
        Ok(addr) => addr,
        Err(_) => return false,
    };

    Address::from_public_key(&recovered, claimed.network) == claimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use txsig_primitives::address::Network;

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = PrivateKey::generate();
        for network in [Network::Mainnet, Network::Testnet] {
            let address = Address::from_public_key(&key.public_key(), network);
            let signature = sign_message(&key, "hello world").unwrap();
            assert!(verify_message("hello world", &address.address_string, &signature));
        }
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = PrivateKey::generate();
        let a = sign_message(&key, "same message").unwrap();
        let b = sign_message(&key, "same message").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_tampered_message() {
        let key = PrivateKey::generate();
        let address = Address::from_public_key(&key.public_key(), Network::Mainnet);
        let signature = sign_message(&key, "original").unwrap();
        assert!(!verify_message("tampered", &address.address_string, &signature));
    }

    #[test]
    fn test_rejects_wrong_address() {
        let key = PrivateKey::generate();
        let other = Address::from_public_key(&PrivateKey::generate().public_key(), Network::Mainnet);
        let signature = sign_message(&key, "message").unwrap();
        assert!(!verify_message("message", &other.address_string, &signature));
    }

    #[test]
    fn test_garbage_inputs_return_false() {
        let key = PrivateKey::generate();
        let address = Address::from_public_key(&key.public_key(), Network::Mainnet);
        let signature = sign_message(&key, "message").unwrap();

        // Bad base64.
        assert!(!verify_message("message", &address.address_string, "%%%not base64%%%"));
        // Valid base64, wrong length.
        assert!(!verify_message("message", &address.address_string, "AAECAw=="));
        // Bad address.
        assert!(!verify_message("message", "not an address", &signature));
        // Empty everything.
        assert!(!verify_message("", "", ""));
    }

    #[test]
    fn test_digest_framing() {
        // Both lengths are below 0xfd, so each varint is a single byte.
        let digest = message_digest(b"abc");
        let mut manual = Vec::new();
        manual.push(MESSAGE_MAGIC.len() as u8);
        manual.extend_from_slice(MESSAGE_MAGIC.as_bytes());
        manual.push(3);
        manual.extend_from_slice(b"abc");
        assert_eq!(digest, sha256d(&manual));
    }
}
