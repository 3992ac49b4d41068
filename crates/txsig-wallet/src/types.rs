//! Request and result types for transaction signing.

use txsig_transaction::sighash::SIGHASH_ALL_FORKID;

use crate::WalletError;

/// Everything the signer needs to know about one input it is asked to
/// sign: which input, the locking script and value of the output being
/// spent, and the sighash type to commit to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputDescriptor {
    /// Index of the input within the transaction.
    pub input_index: u32,

    /// Locking script of the output being spent (the scriptCode).
    pub locking_script: Vec<u8>,

    /// Satoshi value of the output being spent.
    pub satoshis: u64,

    /// Combined sighash flags for this input's signature.
    pub sighash_type: u32,
}

impl InputDescriptor {
    /// Create a descriptor with the default sighash type (ALL | FORKID).
    pub fn new(input_index: u32, locking_script: Vec<u8>, satoshis: u64) -> Self {
        InputDescriptor {
            input_index,
            locking_script,
            satoshis,
            sighash_type: SIGHASH_ALL_FORKID,
        }
    }

    /// Create a descriptor from a hex-encoded locking script.
    pub fn from_hex_script(
        input_index: u32,
        locking_script_hex: &str,
        satoshis: u64,
    ) -> Result<Self, WalletError> {
        let locking_script = hex::decode(locking_script_hex)
            .map_err(|e| WalletError::Serialization(format!("invalid script hex: {}", e)))?;
        Ok(Self::new(input_index, locking_script, satoshis))
    }
}

/// One produced input signature, positionally matched to the descriptor
/// that requested it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureResult {
    /// Hex-encoded DER signature with the sighash flag byte appended.
    pub signature_hex: String,

    /// Hex-encoded compressed public key of the signing key.
    pub public_key_hex: String,
}
