/// P2PKH address handling.
///
/// Supports address generation from public keys, address parsing with
/// checksum validation, and mainnet/testnet discrimination.
/// Uses Base58Check encoding with SHA-256d checksums.

use std::fmt;

use crate::ec::PublicKey;
use crate::hash::sha256d;
use crate::PrimitivesError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Mainnet WIF prefix byte.
const MAINNET_WIF: u8 = 0x80;
/// Testnet WIF prefix byte.
const TESTNET_WIF: u8 = 0xef;

/// Network tag for address and WIF prefix selection.
///
/// The network affects address encoding only; it never changes signing
/// semantics. There is no implicit default: every key constructor takes
/// the network explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Mainnet (address prefix 0x00, addresses start with '1').
    Mainnet,
    /// Testnet (address prefix 0x6f, addresses start with 'm' or 'n').
    Testnet,
}

impl Network {
    /// The WIF prefix byte for this network.
    pub fn wif_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_WIF,
            Network::Testnet => TESTNET_WIF,
        }
    }

    /// Recover the network from a WIF prefix byte.
    pub fn from_wif_prefix(prefix: u8) -> Result<Self, PrimitivesError> {
        match prefix {
            MAINNET_WIF => Ok(Network::Mainnet),
            TESTNET_WIF => Ok(Network::Testnet),
            other => Err(PrimitivesError::InvalidWif(format!(
                "unknown network prefix 0x{:02x}",
                other
            ))),
        }
    }
}

/// A P2PKH address.
///
/// Contains the 20-byte public key hash and the network it belongs to.
/// Can be serialized to/from the Base58Check string format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable Base58Check address string.
    pub address_string: String,
    /// The 20-byte RIPEMD-160(SHA-256(pubkey)) hash.
    pub public_key_hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// Decodes the string, validates the checksum, and detects the network
    /// from the version byte (0x00 = mainnet, 0x6f = testnet).
    pub fn from_string(addr: &str) -> Result<Self, PrimitivesError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|_| PrimitivesError::InvalidAddress(format!("bad char for '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(PrimitivesError::InvalidAddress(format!(
                "invalid length {} for '{}'",
                decoded.len(),
                addr
            )));
        }

        // Checksum: last 4 bytes equal sha256d of the first 21 bytes.
        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(PrimitivesError::ChecksumMismatch);
        }

        let network = match decoded[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            _ => {
                return Err(PrimitivesError::InvalidAddress(format!(
                    "unsupported version byte for '{}'",
                    addr
                )))
            }
        };

        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            public_key_hash: pkh,
            network,
        })
    }

    /// Create an address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        let version = match network {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        };

        let mut payload = Vec::with_capacity(25);
        payload.push(version);
        payload.extend_from_slice(hash);
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);

        let address_string = bs58::encode(&payload).into_string();

        Address {
            address_string,
            public_key_hash: *hash,
            network,
        }
    }

    /// Derive the P2PKH address of a public key on the given network.
    ///
    /// Computes Hash160 of the compressed key and encodes with Base58Check.
    pub fn from_public_key(public_key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&public_key.hash160(), network)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}
