//! Transaction output with satoshi value and locking script.

use txsig_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::TransactionError;

/// A single transaction output.
///
/// Pairs a satoshi value with the raw locking script bytes that define
/// the spending conditions.
///
/// # Wire format
///
/// | Field          | Size         |
/// |----------------|--------------|
/// | satoshis       | 8 bytes (LE) |
/// | script length  | VarInt       |
/// | locking_script | variable     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// The number of satoshis locked by this output.
    pub satoshis: u64,

    /// Raw locking script bytes.
    pub locking_script: Vec<u8>,
}

impl TransactionOutput {
    /// Create a new output with zero satoshis and an empty script.
    pub fn new() -> Self {
        TransactionOutput {
            satoshis: 0,
            locking_script: Vec::new(),
        }
    }

    /// Deserialize an output from a `ByteReader`.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let satoshis = reader.read_u64_le().map_err(|e| {
            TransactionError::Serialization(format!("reading satoshis: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::Serialization(format!("reading script length: {}", e))
        })?;

        let locking_script = reader
            .read_bytes(script_len.value() as usize)
            .map_err(|e| {
                TransactionError::Serialization(format!("reading locking script: {}", e))
            })?
            .to_vec();

        Ok(TransactionOutput {
            satoshis,
            locking_script,
        })
    }

    /// Serialize this output into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.satoshis);
        writer.write_varint(VarInt::from(self.locking_script.len()));
        writer.write_bytes(&self.locking_script);
    }

    /// Serialize this output to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Return the locking script as a hex-encoded string.
    pub fn locking_script_hex(&self) -> String {
        hex::encode(&self.locking_script)
    }
}

impl Default for TransactionOutput {
    fn default() -> Self {
        Self::new()
    }
}
