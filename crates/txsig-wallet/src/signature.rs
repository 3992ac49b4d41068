//! Input signature value type.

use txsig_primitives::ec::Signature;

/// A transaction input signature: an ECDSA signature bound to the
/// sighash type it committed to.
///
/// The pair is fixed at construction; the serialized form is the DER
/// signature with the low byte of the sighash type appended, which is
/// what goes into an unlocking script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSignature {
    signature: Signature,
    sighash_type: u32,
}

impl InputSignature {
    /// Bind a signature to the sighash type that produced its digest.
    pub fn new(signature: Signature, sighash_type: u32) -> Self {
        InputSignature {
            signature,
            sighash_type,
        }
    }

    /// The underlying ECDSA signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The sighash type this signature commits to.
    pub fn sighash_type(&self) -> u32 {
        self.sighash_type
    }

    /// Serialize as DER followed by the sighash flag byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.signature.to_der();
        bytes.push((self.sighash_type & 0xff) as u8);
        bytes
    }

    /// Serialize as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txsig_primitives::ec::PrivateKey;
    use txsig_primitives::hash::sha256d;
    use txsig_transaction::sighash::SIGHASH_ALL_FORKID;

    #[test]
    fn test_appends_flag_byte() {
        let key = PrivateKey::generate();
        let digest = sha256d(b"flag byte");
        let sig = key.sign(&digest).unwrap();

        let input_sig = InputSignature::new(sig.clone(), SIGHASH_ALL_FORKID);
        let bytes = input_sig.to_bytes();
        assert_eq!(bytes[..bytes.len() - 1], sig.to_der());
        assert_eq!(*bytes.last().unwrap(), 0x41);
        assert_eq!(input_sig.to_hex(), hex::encode(&bytes));
    }

    #[test]
    fn test_only_low_byte_of_type_is_serialized() {
        let key = PrivateKey::generate();
        let digest = sha256d(b"wide type");
        let sig = key.sign(&digest).unwrap();

        let input_sig = InputSignature::new(sig, 0x1_00_41);
        assert_eq!(*input_sig.to_bytes().last().unwrap(), 0x41);
        assert_eq!(input_sig.sighash_type(), 0x1_00_41);
    }
}
