/// Transaction signing wallet.
///
/// Provides the `Wallet` capability trait, the in-process `LocalWallet`
/// backend holding a single private key, per-input transaction signature
/// production, and signed-message support.

mod error;
pub use error::WalletError;

pub mod types;
pub mod signature;
pub mod wallet_trait;
pub mod local_wallet;
pub mod message;

pub use local_wallet::{LocalWallet, DEFAULT_DERIVATION_PATH};
pub use message::verify_message;
pub use signature::InputSignature;
pub use types::{InputDescriptor, SignatureResult};
pub use wallet_trait::Wallet;
