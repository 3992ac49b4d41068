//! Transaction input referencing a previous output.

use txsig_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single transaction input.
///
/// References an output of a previous transaction by its transaction ID
/// (`source_txid`, internal little-endian byte order) and output index.
/// The `unlocking_script` carries raw script bytes; script interpretation
/// is out of scope for this crate.
///
/// # Wire format
///
/// | Field               | Size          |
/// |---------------------|---------------|
/// | source_txid         | 32 bytes (LE) |
/// | source_tx_out_index | 4 bytes (LE)  |
/// | script length       | VarInt        |
/// | unlocking_script    | variable      |
/// | sequence_number     | 4 bytes (LE)  |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// The 32-byte transaction ID of the output being spent, in internal
    /// (little-endian) byte order.
    pub source_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub source_tx_out_index: u32,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence_number: u32,

    /// Raw unlocking script bytes. Empty when the input is unsigned.
    pub unlocking_script: Vec<u8>,
}

impl TransactionInput {
    /// Create a new input with a zeroed outpoint and a finalized sequence.
    pub fn new() -> Self {
        TransactionInput {
            source_txid: [0u8; 32],
            source_tx_out_index: 0,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: Vec::new(),
        }
    }

    /// Deserialize an input from a `ByteReader`.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let txid_bytes = reader.read_bytes(32).map_err(|e| {
            TransactionError::Serialization(format!("reading source txid: {}", e))
        })?;
        let mut source_txid = [0u8; 32];
        source_txid.copy_from_slice(txid_bytes);

        let source_tx_out_index = reader.read_u32_le().map_err(|e| {
            TransactionError::Serialization(format!("reading output index: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::Serialization(format!("reading script length: {}", e))
        })?;

        let unlocking_script = reader
            .read_bytes(script_len.value() as usize)
            .map_err(|e| {
                TransactionError::Serialization(format!("reading unlocking script: {}", e))
            })?
            .to_vec();

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::Serialization(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            source_txid,
            source_tx_out_index,
            sequence_number,
            unlocking_script,
        })
    }

    /// Serialize this input into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_tx_out_index);
        writer.write_varint(VarInt::from(self.unlocking_script.len()));
        writer.write_bytes(&self.unlocking_script);
        writer.write_u32_le(self.sequence_number);
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self::new()
    }
}
