/// Transaction wire codec and signature hash computation.
///
/// Provides the Transaction type with inputs, outputs, binary/hex
/// serialization, and the sighash preimage/digest algorithms used to
/// authorize spending individual inputs.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
