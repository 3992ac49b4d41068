//! ECDSA signature with DER serialization and RFC6979 deterministic nonces.
//!
//! Supports DER encoding/decoding, 65-byte compact (recoverable)
//! signatures with public key recovery, and low-S normalization.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{self, RecoveryId, VerifyingKey};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// The secp256k1 curve order N.
/// N = FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// Half of the secp256k1 curve order (N/2), used for low-S normalization.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// An ECDSA signature with R and S components.
///
/// Produced by deterministic RFC6979 signing and normalized to low-S per
/// BIP-0062, so a fixed key and digest always yield the same bytes.
#[derive(Clone, Debug)]
pub struct Signature {
    /// The R component of the signature (32 bytes, big-endian).
    r: [u8; 32],
    /// The S component of the signature (32 bytes, big-endian).
    s: [u8; 32],
}

impl Signature {
    /// Create a signature from raw R and S 32-byte arrays.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// Access the R component of the signature.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Access the S component of the signature.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Sign a message digest using RFC6979 deterministic nonces.
    ///
    /// Produces a low-S normalized signature per BIP-0062.
    pub fn sign(digest: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let padded = digest32(digest);
        let (k256_sig, _recovery_id) = priv_key
            .signing_key()
            .sign_prehash_recoverable(&padded)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        // Byte arrays compare lexicographically, which for fixed-width
        // big-endian values is numeric order.
        if s > HALF_ORDER {
            s = order_minus(&s);
        }

        Ok(Signature { r, s })
    }

    /// Parse a DER-encoded ECDSA signature.
    ///
    /// Expected format: 0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < 8 || bytes[0] != 0x30 {
            return Err(der_err("missing or truncated sequence header"));
        }
        let declared = bytes[1] as usize;
        if declared < 6 || declared + 2 > bytes.len() {
            return Err(der_err("bad sequence length"));
        }

        let mut body = &bytes[2..declared + 2];
        let r = be_to_32(read_der_int(&mut body)?)?;
        let s = be_to_32(read_der_int(&mut body)?)?;

        if r == [0u8; 32] || s == [0u8; 32] {
            return Err(der_err("zero integer"));
        }
        if r >= CURVE_ORDER || s >= CURVE_ORDER {
            return Err(der_err("integer not below curve order"));
        }

        Ok(Signature { r, s })
    }

    /// Serialize the signature in DER format with low-S normalization.
    ///
    /// Output format: 0x30 <len> 0x02 <r_len> <r_bytes> 0x02 <s_len> <s_bytes>
    pub fn to_der(&self) -> Vec<u8> {
        let s = if self.s > HALF_ORDER {
            order_minus(&self.s)
        } else {
            self.s
        };

        let mut body = Vec::with_capacity(70);
        write_der_int(&mut body, &self.r);
        write_der_int(&mut body, &s);

        let mut out = Vec::with_capacity(body.len() + 2);
        out.push(0x30);
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        out
    }

    /// Serialize the signature in 65-byte compact format with recovery ID.
    ///
    /// Format: <recovery_id_byte> <32-byte R> <32-byte S> where the header
    /// byte encodes `27 + iteration + 4` (4 marks a compressed public key).
    /// Re-signs the digest recoverably to obtain the recovery ID.
    pub fn to_compact(
        digest: &[u8],
        priv_key: &PrivateKey,
    ) -> Result<Vec<u8>, PrimitivesError> {
        let padded = digest32(digest);
        let (k256_sig, recovery_id) = priv_key
            .signing_key()
            .sign_prehash_recoverable(&padded)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let mut result = vec![0u8; 65];
        result[0] = 27 + recovery_id.to_byte() + 4; // +4 for compressed
        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        result[1..33].copy_from_slice(&r_bytes);
        result[33..65].copy_from_slice(&s_bytes);
        Ok(result)
    }

    /// Recover the public key from a compact signature and message digest.
    pub fn recover_public_key(
        compact_sig: &[u8],
        digest: &[u8],
    ) -> Result<PublicKey, PrimitivesError> {
        if compact_sig.len() != 65 {
            return Err(PrimitivesError::InvalidSignature(
                "invalid compact signature size".to_string(),
            ));
        }

        let header = compact_sig[0];
        if header < 27 {
            return Err(PrimitivesError::InvalidSignature(
                "invalid compact signature header".to_string(),
            ));
        }
        let iteration = (header - 27) & !4u8;

        let recovery_id = RecoveryId::from_byte(iteration)
            .ok_or_else(|| PrimitivesError::InvalidSignature("invalid recovery id".to_string()))?;

        let k256_sig = ecdsa::Signature::from_scalars(
            *k256::FieldBytes::from_slice(&compact_sig[1..33]),
            *k256::FieldBytes::from_slice(&compact_sig[33..65]),
        )
        .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let padded = digest32(digest);
        let recovered_key = VerifyingKey::recover_from_prehash(&padded, &k256_sig, recovery_id)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        PublicKey::from_bytes(recovered_key.to_encoded_point(true).as_bytes())
    }

    /// Verify this signature against a message digest and public key.
    pub fn verify(&self, digest: &[u8], pub_key: &PublicKey) -> bool {
        let Ok(k256_sig) = ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) else {
            return false;
        };

        pub_key
            .verifying_key()
            .verify_prehash(&digest32(digest), &k256_sig)
            .is_ok()
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.s == other.s
    }
}

impl Eq for Signature {}

fn der_err(msg: &str) -> PrimitivesError {
    PrimitivesError::InvalidSignature(format!("malformed DER signature: {}", msg))
}

/// Normalize an arbitrary-length digest to exactly 32 bytes: shorter
/// digests are left-padded with zeros, longer ones truncated.
fn digest32(digest: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let n = digest.len().min(32);
    out[32 - n..].copy_from_slice(&digest[..n]);
    out
}

/// Consume one DER INTEGER from the front of `body`, returning its
/// big-endian value bytes.
fn read_der_int<'a>(body: &mut &'a [u8]) -> Result<&'a [u8], PrimitivesError> {
    if body.len() < 2 || body[0] != 0x02 {
        return Err(der_err("missing integer tag"));
    }
    let len = body[1] as usize;
    if len == 0 || body.len() < 2 + len {
        return Err(der_err("bad integer length"));
    }
    let (value, rest) = body[2..].split_at(len);
    *body = rest;
    Ok(value)
}

/// Append one DER INTEGER: leading zeros stripped, a 0x00 pad byte
/// inserted when the high bit is set.
fn write_der_int(out: &mut Vec<u8>, val: &[u8; 32]) {
    let skip = val.iter().take_while(|&&b| b == 0).count().min(31);
    let trimmed = &val[skip..];
    let pad = trimmed[0] & 0x80 != 0;

    out.push(0x02);
    out.push(trimmed.len() as u8 + u8::from(pad));
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
}

/// Left-pad a variable-length big-endian integer to 32 bytes.
fn be_to_32(bytes: &[u8]) -> Result<[u8; 32], PrimitivesError> {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let trimmed = &bytes[first..];
    if trimmed.len() > 32 {
        return Err(der_err("integer wider than 32 bytes"));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}

/// Compute N - val, folding a high S into the low half of the order.
fn order_minus(val: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0u16;
    for i in (0..32).rev() {
        let diff = u16::from(CURVE_ORDER[i]).wrapping_sub(u16::from(val[i]) + borrow);
        out[i] = diff as u8;
        borrow = (diff >> 8) & 1;
    }
    out
}
