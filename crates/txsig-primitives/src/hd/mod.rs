//! BIP-32 hierarchical key derivation.
//!
//! Derives a tree of private keys from a master seed via HMAC-SHA512
//! chained derivation, walking derivation path strings such as
//! `m/44'/0'/0'/0/0`. Only the private branch is implemented; extended
//! key serialization (xprv/xpub strings) is not needed by the signer.

use crate::ec::PrivateKey;
use crate::hash::sha512_hmac;
use crate::PrimitivesError;

/// Offset marking a hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for master key generation, per BIP-32.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// A BIP-32 extended private key: a private key plus a chain code.
#[derive(Clone)]
pub struct Xprv {
    key: PrivateKey,
    chain_code: [u8; 32],
    depth: u8,
}

impl Xprv {
    /// Create the master extended key from a seed.
    ///
    /// Computes HMAC-SHA512 over the seed with the fixed key
    /// `"Bitcoin seed"`; the left half becomes the private key and the
    /// right half the chain code.
    pub fn from_seed(seed: &[u8]) -> Result<Self, PrimitivesError> {
        let i = sha512_hmac(MASTER_HMAC_KEY, seed);
        let key = PrivateKey::from_bytes(&i[..32])?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        Ok(Xprv {
            key,
            chain_code,
            depth: 0,
        })
    }

    /// Derive a single child key.
    ///
    /// Indices at or above [`HARDENED_OFFSET`] use hardened derivation
    /// (the parent private key feeds the HMAC); lower indices use the
    /// parent public key.
    pub fn derive_child(&self, index: u32) -> Result<Self, PrimitivesError> {
        if self.depth == u8::MAX {
            return Err(PrimitivesError::InvalidDerivationPath(
                "maximum derivation depth exceeded".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(37);
        if index >= HARDENED_OFFSET {
            data.push(0x00);
            data.extend_from_slice(&self.key.to_bytes());
        } else {
            data.extend_from_slice(&self.key.public_key().to_compressed());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let i = sha512_hmac(&self.chain_code, &data);

        // The left half must be a valid scalar; added to the parent
        // scalar mod the curve order it must be non-zero. Both checks
        // are enforced by the PrivateKey constructors.
        let il_key = PrivateKey::from_bytes(&i[..32])?;
        let child_scalar = il_key.to_scalar() + self.key.to_scalar();
        let key = PrivateKey::from_scalar(child_scalar)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        Ok(Xprv {
            key,
            chain_code,
            depth: self.depth + 1,
        })
    }

    /// Walk a derivation path string such as `m/44'/0'/0'/0/0`.
    ///
    /// Hardened segments may use `'`, `h`, or `H` suffixes. The leading
    /// `m` (or `M`) is required; `m` alone returns the key unchanged.
    pub fn derive_path(&self, path: &str) -> Result<Self, PrimitivesError> {
        let mut current = self.clone();
        for index in parse_path(path)? {
            current = current.derive_child(index)?;
        }
        Ok(current)
    }

    /// The private key at this node.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    /// Consume the node, returning its private key.
    pub fn into_private_key(self) -> PrivateKey {
        self.key
    }

    /// The derivation depth of this node (0 for the master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }
}

impl std::fmt::Debug for Xprv {
    // Chain code and key stay out of log output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Xprv(depth={})", self.depth)
    }
}

/// Parse a derivation path string into child indices.
fn parse_path(path: &str) -> Result<Vec<u32>, PrimitivesError> {
    let bad = |msg: &str| PrimitivesError::InvalidDerivationPath(format!("{}: '{}'", msg, path));

    let mut parts = path.split('/');
    match parts.next() {
        Some("m") | Some("M") => {}
        _ => return Err(bad("path must start with 'm'")),
    }

    let mut indices = Vec::new();
    for part in parts {
        if part.is_empty() {
            return Err(bad("empty path segment"));
        }
        // At most one hardened marker; anything left over after the
        // strip must be pure digits.
        let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
            Some(rest) => (rest, true),
            None => (part, false),
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.is_empty() {
            return Err(bad("invalid child index"));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| bad("invalid child index"))?;
        if index >= HARDENED_OFFSET {
            return Err(bad("child index out of range"));
        }
        indices.push(if hardened { index + HARDENED_OFFSET } else { index });
    }
    Ok(indices)
}
