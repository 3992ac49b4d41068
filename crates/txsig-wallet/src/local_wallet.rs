//! In-process wallet backed by a single private key.

use txsig_primitives::address::{Address, Network};
use txsig_primitives::ec::{PrivateKey, PublicKey};
use txsig_primitives::hd::Xprv;
use txsig_primitives::mnemonic::seed_from_mnemonic;
use txsig_transaction::{sighash, Transaction};

use crate::message;
use crate::signature::InputSignature;
use crate::types::{InputDescriptor, SignatureResult};
use crate::wallet_trait::Wallet;
use crate::WalletError;

/// Derivation path used by `from_mnemonic` when none is given:
/// the first external BIP-44 key of the first account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/0'/0'/0/0";

/// A wallet holding one private key in memory.
///
/// The network is fixed at construction and affects address encoding
/// only. The key is never mutated after construction, so a
/// `LocalWallet` is safe to share across threads.
#[derive(Clone)]
pub struct LocalWallet {
    private_key: PrivateKey,
    network: Network,
}

impl LocalWallet {
    /// Create a wallet with a freshly generated random key.
    pub fn generate(network: Network) -> Self {
        LocalWallet {
            private_key: PrivateKey::generate(),
            network,
        }
    }

    /// Create a wallet from an existing private key.
    pub fn from_private_key(private_key: PrivateKey, network: Network) -> Self {
        LocalWallet {
            private_key,
            network,
        }
    }

    /// Create a wallet from a WIF string.
    ///
    /// The network is recovered from the WIF version prefix, so a
    /// testnet WIF always yields a testnet wallet.
    pub fn from_wif(wif: &str) -> Result<Self, WalletError> {
        let (private_key, network) = PrivateKey::from_wif(wif)?;
        Ok(LocalWallet {
            private_key,
            network,
        })
    }

    /// Create a wallet from a BIP-39 mnemonic phrase.
    ///
    /// `path` defaults to [`DEFAULT_DERIVATION_PATH`] and `passphrase`
    /// to the empty string. The same arguments always reproduce the
    /// same key and address.
    pub fn from_mnemonic(
        mnemonic: &str,
        path: Option<&str>,
        passphrase: Option<&str>,
        network: Network,
    ) -> Result<Self, WalletError> {
        let seed = seed_from_mnemonic(mnemonic, passphrase.unwrap_or(""))?;
        let node = Xprv::from_seed(&seed)?
            .derive_path(path.unwrap_or(DEFAULT_DERIVATION_PATH))?;
        Ok(LocalWallet {
            private_key: node.into_private_key(),
            network,
        })
    }

    /// The wallet's private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The wallet's public key.
    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    /// The network the wallet encodes addresses for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Export the key as a WIF string for the wallet's network.
    pub fn to_wif(&self) -> String {
        self.private_key.to_wif(self.network)
    }
}

impl Wallet for LocalWallet {
    fn public_key_hex(&self) -> String {
        self.private_key.public_key().to_hex()
    }

    fn address(&self) -> String {
        Address::from_public_key(&self.private_key.public_key(), self.network).address_string
    }

    fn sign_transaction(
        &self,
        tx_hex: &str,
        inputs: &[InputDescriptor],
    ) -> Result<Vec<SignatureResult>, WalletError> {
        let tx = Transaction::from_hex(tx_hex)?;

        // Validate every descriptor up front so a bad index late in the
        // batch cannot leave callers holding partial results.
        for descriptor in inputs {
            let index = descriptor.input_index as usize;
            if index >= tx.input_count() {
                return Err(WalletError::InvalidInputIndex {
                    index,
                    input_count: tx.input_count(),
                });
            }
        }

        let public_key_hex = self.public_key_hex();
        let mut results = Vec::with_capacity(inputs.len());
        for descriptor in inputs {
            let digest = sighash::signature_hash(
                &tx,
                descriptor.input_index as usize,
                &descriptor.locking_script,
                descriptor.sighash_type,
                descriptor.satoshis,
            )?;
            let ecdsa_sig = self.private_key.sign(&digest)?;
            let input_sig = InputSignature::new(ecdsa_sig, descriptor.sighash_type);
            results.push(SignatureResult {
                signature_hex: input_sig.to_hex(),
                public_key_hex: public_key_hex.clone(),
            });
        }
        Ok(results)
    }

    fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        message::sign_message(&self.private_key, message)
    }
}

impl std::fmt::Debug for LocalWallet {
    // Key material stays out of log output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("network", &self.network)
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::verify_message;
    use txsig_primitives::ec::Signature;
    use txsig_transaction::{TransactionInput, TransactionOutput};

    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    /// Two-input, one-output transaction plus the descriptors for both inputs.
    fn unsigned_tx() -> (Transaction, Vec<InputDescriptor>) {
        let script = hex::decode("76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac").unwrap();
        let mut tx = Transaction::new();
        for i in 0..2u8 {
            let mut input = TransactionInput::new();
            input.source_txid = [i + 1; 32];
            input.source_tx_out_index = u32::from(i);
            tx.add_input(input);
        }
        tx.add_output(TransactionOutput {
            satoshis: 900,
            locking_script: script.clone(),
        });

        let descriptors = vec![
            InputDescriptor::new(0, script.clone(), 500),
            InputDescriptor::new(1, script, 600),
        ];
        (tx, descriptors)
    }

    #[test]
    fn test_from_mnemonic_default_path() {
        let wallet =
            LocalWallet::from_mnemonic(MNEMONIC, None, None, Network::Mainnet).unwrap();
        // First external BIP-44 address of this phrase.
        assert_eq!(wallet.address(), "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    }

    #[test]
    fn test_from_mnemonic_is_reproducible() {
        let a = LocalWallet::from_mnemonic(MNEMONIC, Some("m/0'/1"), Some("pw"), Network::Testnet)
            .unwrap();
        let b = LocalWallet::from_mnemonic(MNEMONIC, Some("m/0'/1"), Some("pw"), Network::Testnet)
            .unwrap();
        assert_eq!(a.public_key_hex(), b.public_key_hex());
        assert_eq!(a.address(), b.address());

        // Passphrase and path both change the key.
        let c = LocalWallet::from_mnemonic(MNEMONIC, Some("m/0'/1"), None, Network::Testnet)
            .unwrap();
        let d = LocalWallet::from_mnemonic(MNEMONIC, Some("m/0'/2"), Some("pw"), Network::Testnet)
            .unwrap();
        assert_ne!(a.public_key_hex(), c.public_key_hex());
        assert_ne!(a.public_key_hex(), d.public_key_hex());
    }

    #[test]
    fn test_from_mnemonic_rejects_bad_inputs() {
        assert!(matches!(
            LocalWallet::from_mnemonic("not a phrase", None, None, Network::Mainnet),
            Err(WalletError::InvalidMnemonic(_))
        ));
        assert!(matches!(
            LocalWallet::from_mnemonic(MNEMONIC, Some("44'/0'"), None, Network::Mainnet),
            Err(WalletError::InvalidDerivationPath(_))
        ));
    }

    #[test]
    fn test_from_wif_recovers_network() {
        for network in [Network::Mainnet, Network::Testnet] {
            let original = LocalWallet::generate(network);
            let restored = LocalWallet::from_wif(&original.to_wif()).unwrap();
            assert_eq!(restored.network(), network);
            assert_eq!(restored.public_key_hex(), original.public_key_hex());
            assert_eq!(restored.address(), original.address());
        }
    }

    #[test]
    fn test_from_wif_rejects_garbage() {
        assert!(matches!(
            LocalWallet::from_wif("not wif"),
            Err(WalletError::InvalidWif(_))
        ));
    }

    #[test]
    fn test_generate_produces_distinct_keys() {
        let a = LocalWallet::generate(Network::Mainnet);
        let b = LocalWallet::generate(Network::Mainnet);
        assert_ne!(a.public_key_hex(), b.public_key_hex());
    }

    #[test]
    fn test_sign_transaction_order_and_verification() {
        let wallet = LocalWallet::generate(Network::Mainnet);
        let (tx, descriptors) = unsigned_tx();

        let results = wallet
            .sign_transaction(&tx.to_hex(), &descriptors)
            .unwrap();
        assert_eq!(results.len(), descriptors.len());

        for (descriptor, result) in descriptors.iter().zip(&results) {
            assert_eq!(result.public_key_hex, wallet.public_key_hex());

            // Trailing byte is the descriptor's sighash type.
            let sig_bytes = hex::decode(&result.signature_hex).unwrap();
            assert_eq!(
                u32::from(*sig_bytes.last().unwrap()),
                descriptor.sighash_type & 0xff
            );

            // The DER part verifies against the digest for this input.
            let digest = sighash::signature_hash(
                &tx,
                descriptor.input_index as usize,
                &descriptor.locking_script,
                descriptor.sighash_type,
                descriptor.satoshis,
            )
            .unwrap();
            let sig = Signature::from_der(&sig_bytes[..sig_bytes.len() - 1]).unwrap();
            assert!(wallet.public_key().verify(&digest, &sig));
        }
    }

    #[test]
    fn test_sign_transaction_is_deterministic() {
        let wallet = LocalWallet::generate(Network::Mainnet);
        let (tx, descriptors) = unsigned_tx();
        let a = wallet.sign_transaction(&tx.to_hex(), &descriptors).unwrap();
        let b = wallet.sign_transaction(&tx.to_hex(), &descriptors).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_transaction_rejects_bad_index() {
        let wallet = LocalWallet::generate(Network::Mainnet);
        let (tx, mut descriptors) = unsigned_tx();
        descriptors[1].input_index = 5;

        let err = wallet
            .sign_transaction(&tx.to_hex(), &descriptors)
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::InvalidInputIndex {
                index: 5,
                input_count: 2
            }
        ));
    }

    #[test]
    fn test_sign_transaction_rejects_bad_hex() {
        let wallet = LocalWallet::generate(Network::Mainnet);
        assert!(matches!(
            wallet.sign_transaction("zz", &[]),
            Err(WalletError::Serialization(_))
        ));

        // Structurally hostile bytes: one input declaring a script of
        // u64::MAX bytes must surface as a serialization error too.
        let hostile = format!(
            "0100000001{}00000000ff{}",
            "00".repeat(32),
            "ff".repeat(8)
        );
        assert!(matches!(
            wallet.sign_transaction(&hostile, &[]),
            Err(WalletError::Serialization(_))
        ));
    }

    #[test]
    fn test_sign_message_verifies_against_own_address() {
        let wallet = LocalWallet::generate(Network::Testnet);
        let signature = wallet.sign_message("proof of ownership").unwrap();
        assert!(verify_message(
            "proof of ownership",
            &wallet.address(),
            &signature
        ));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let wallet = LocalWallet::generate(Network::Mainnet);
        let rendered = format!("{:?}", wallet);
        assert!(!rendered.contains(&wallet.private_key().to_hex()));
        assert!(rendered.contains(&wallet.address()));
    }
}
