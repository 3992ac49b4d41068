/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// An input index referenced an input the transaction does not have.
    #[error("input index {index} out of range (tx has {input_count} inputs)")]
    InvalidInputIndex { index: usize, input_count: usize },
    /// Signature hash computation failed.
    #[error("sighash computation error: {0}")]
    SighashComputation(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An underlying primitives error (forwarded from `txsig-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] txsig_primitives::PrimitivesError),
}
