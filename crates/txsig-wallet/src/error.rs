use txsig_primitives::PrimitivesError;
use txsig_transaction::TransactionError;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The mnemonic phrase failed word-list or checksum validation.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// The derivation path string could not be parsed or walked.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),
    /// The WIF string failed Base58Check decoding or has a bad payload.
    #[error("invalid WIF: {0}")]
    InvalidWif(String),
    /// A descriptor referenced an input the transaction does not have.
    #[error("input index {index} out of range (tx has {input_count} inputs)")]
    InvalidInputIndex { index: usize, input_count: usize },
    /// Signature hash computation failed.
    #[error("sighash computation error: {0}")]
    SighashComputation(String),
    /// The transaction could not be parsed or serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An underlying primitives error (forwarded from `txsig-primitives`).
    #[error("primitives error: {0}")]
    Primitives(PrimitivesError),
}

// Key-material failures surface under the wallet taxonomy rather than as
// wrapped primitives errors, so callers can match on what went wrong.
impl From<PrimitivesError> for WalletError {
    fn from(err: PrimitivesError) -> Self {
        match err {
            PrimitivesError::InvalidMnemonic(msg) => WalletError::InvalidMnemonic(msg),
            PrimitivesError::InvalidDerivationPath(msg) => WalletError::InvalidDerivationPath(msg),
            PrimitivesError::InvalidWif(msg) => WalletError::InvalidWif(msg),
            PrimitivesError::ChecksumMismatch => {
                WalletError::InvalidWif("checksum mismatch".to_string())
            }
            other => WalletError::Primitives(other),
        }
    }
}

impl From<TransactionError> for WalletError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::InvalidInputIndex { index, input_count } => {
                WalletError::InvalidInputIndex { index, input_count }
            }
            TransactionError::SighashComputation(msg) => WalletError::SighashComputation(msg),
            TransactionError::Serialization(msg) => WalletError::Serialization(msg),
            TransactionError::Primitives(err) => WalletError::from(err),
        }
    }
}
