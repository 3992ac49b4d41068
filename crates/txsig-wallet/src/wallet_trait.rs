//! The wallet capability trait.

use crate::types::{InputDescriptor, SignatureResult};
use crate::WalletError;

/// Capabilities a signing backend exposes to callers.
///
/// `LocalWallet` implements this over an in-process private key;
/// hardware or remote signers can implement the same surface. All
/// methods take `&self`: implementations must not mutate shared state,
/// so a wallet can be used concurrently from multiple threads.
pub trait Wallet {
    /// The compressed public key as a hex string.
    fn public_key_hex(&self) -> String;

    /// The P2PKH address string for the wallet's key and network.
    fn address(&self) -> String;

    /// Produce one signature per descriptor, in descriptor order.
    ///
    /// The transaction is treated as inert data and never modified;
    /// placing signatures into unlocking scripts is the caller's job.
    /// Any failure yields an error and no partial results.
    fn sign_transaction(
        &self,
        tx_hex: &str,
        inputs: &[InputDescriptor],
    ) -> Result<Vec<SignatureResult>, WalletError>;

    /// Sign an arbitrary text message, returning a base64 compact
    /// recoverable signature.
    fn sign_message(&self, message: &str) -> Result<String, WalletError>;
}
