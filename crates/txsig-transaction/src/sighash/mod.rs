//! Signature hash computation for transaction signing.
//!
//! Computes the digest that ECDSA signs to authorize spending a
//! transaction input. Two algorithms are supported, selected by the
//! FORKID bit of the sighash type:
//!
//! * with FORKID, the BIP-143-style algorithm that commits to the value
//!   of the output being spent;
//! * without it, the original algorithm that serializes a modified copy
//!   of the transaction, including its well-known SIGHASH_SINGLE
//!   out-of-range quirk.

use txsig_primitives::hash::sha256d;
use txsig_primitives::util::{ByteWriter, VarInt};

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with another flag: only sign the current input, allowing other
/// inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Replay-protection flag selecting the value-committing digest algorithm.
pub const SIGHASH_FORKID: u32 = 0x40;

/// The default sighash type used by the signer: ALL | FORKID.
pub const SIGHASH_ALL_FORKID: u32 = SIGHASH_ALL | SIGHASH_FORKID;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

// -----------------------------------------------------------------------
// Digest computation
// -----------------------------------------------------------------------

/// Compute the 32-byte signature hash for a given input.
///
/// `prev_output_script` is the locking script of the output being spent
/// (the scriptCode) and `satoshis` its value; both come from the caller,
/// since the transaction itself does not carry source output data.
///
/// Legacy SIGHASH_SINGLE with an input index that has no matching output
/// yields the digest `0x01` followed by 31 zero bytes, which historic
/// implementations sign as if it were a real hash.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    satoshis: u64,
) -> Result<[u8; 32], TransactionError> {
    check_index(tx, input_index)?;

    let base_type = sighash_type & SIGHASH_MASK;
    if sighash_type & SIGHASH_FORKID == 0
        && base_type == SIGHASH_SINGLE
        && input_index >= tx.outputs.len()
    {
        let mut digest = [0u8; 32];
        digest[0] = 0x01;
        return Ok(digest);
    }

    let preimage = calc_preimage(tx, input_index, prev_output_script, sighash_type, satoshis)?;
    Ok(sha256d(&preimage))
}

/// Compute the raw preimage bytes that are double-hashed into the digest.
///
/// Dispatches on the FORKID bit. Legacy SIGHASH_SINGLE out of range has
/// no preimage (the digest is a constant) and returns an error here; use
/// [`signature_hash`] to get the digest in that case.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    satoshis: u64,
) -> Result<Vec<u8>, TransactionError> {
    check_index(tx, input_index)?;

    if sighash_type & SIGHASH_FORKID != 0 {
        Ok(forkid_preimage(
            tx,
            input_index,
            prev_output_script,
            sighash_type,
            satoshis,
        ))
    } else {
        legacy_preimage(tx, input_index, prev_output_script, sighash_type)
    }
}

fn check_index(tx: &Transaction, input_index: usize) -> Result<(), TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidInputIndex {
            index: input_index,
            input_count: tx.inputs.len(),
        });
    }
    Ok(())
}

// -----------------------------------------------------------------------
// BIP-143 (FORKID) preimage
// -----------------------------------------------------------------------

/// Build the value-committing preimage:
///
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes) - sha256d of all outpoints unless ANYONECANPAY
/// 3. hashSequence (32 bytes) - sha256d of all sequences unless ANYONECANPAY/SINGLE/NONE
/// 4. outpoint (32+4 bytes) - txid + vout of the input being signed
/// 5. scriptCode (varint + script) - the locking script being satisfied
/// 6. value (8 bytes LE) - satoshis of the output being spent
/// 7. nSequence (4 bytes LE) - sequence of the input being signed
/// 8. hashOutputs (32 bytes) - sha256d of all outputs or one output
/// 9. nLocktime (4 bytes LE)
/// 10. sighashType (4 bytes LE)
fn forkid_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    satoshis: u64,
) -> Vec<u8> {
    let input = &tx.inputs[input_index];
    let base_type = sighash_type & SIGHASH_MASK;

    let hash_prevouts = if sighash_type & SIGHASH_ANYONECANPAY == 0 {
        prevouts_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_sequence = if sighash_type & SIGHASH_ANYONECANPAY == 0
        && base_type != SIGHASH_SINGLE
        && base_type != SIGHASH_NONE
    {
        sequence_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        outputs_hash(tx, None)
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        outputs_hash(tx, Some(input_index))
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::with_capacity(256);
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    writer.write_bytes(&input.source_txid);
    writer.write_u32_le(input.source_tx_out_index);
    writer.write_varint(VarInt::from(prev_output_script.len()));
    writer.write_bytes(prev_output_script);
    writer.write_u64_le(satoshis);
    writer.write_u32_le(input.sequence_number);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);
    writer.into_bytes()
}

/// Double-SHA256 of all input outpoints concatenated (txid + vout each).
fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        writer.write_bytes(&input.source_txid);
        writer.write_u32_le(input.source_tx_out_index);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of all input sequence numbers concatenated.
fn sequence_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence_number);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of serialized outputs: all of them, or a single one for
/// SIGHASH_SINGLE.
fn outputs_hash(tx: &Transaction, single: Option<usize>) -> [u8; 32] {
    let mut writer = ByteWriter::new();
    match single {
        None => {
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
        Some(n) => tx.outputs[n].write_to(&mut writer),
    }
    sha256d(writer.as_bytes())
}

// -----------------------------------------------------------------------
// Legacy preimage
// -----------------------------------------------------------------------

/// Build the original preimage: a modified serialization of the whole
/// transaction followed by the 4-byte sighash type.
///
/// The input being signed has its script replaced by the scriptCode;
/// every other input gets an empty script. ANYONECANPAY keeps only the
/// signed input. NONE drops all outputs; SINGLE keeps outputs up to the
/// input index, blanking the earlier ones (value `u64::MAX`, empty
/// script). NONE and SINGLE also zero the other inputs' sequences.
fn legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    if base_type == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return Err(TransactionError::SighashComputation(
            "SIGHASH_SINGLE input index has no matching output".to_string(),
        ));
    }

    let mut writer = ByteWriter::with_capacity(256);
    writer.write_u32_le(tx.version);

    // Inputs.
    if anyone_can_pay {
        writer.write_varint(VarInt::from(1u64));
        write_legacy_input(&mut writer, tx, input_index, input_index, prev_output_script, base_type);
    } else {
        writer.write_varint(VarInt::from(tx.inputs.len()));
        for i in 0..tx.inputs.len() {
            write_legacy_input(&mut writer, tx, i, input_index, prev_output_script, base_type);
        }
    }

    // Outputs.
    match base_type {
        SIGHASH_NONE => {
            writer.write_varint(VarInt::from(0u64));
        }
        SIGHASH_SINGLE => {
            writer.write_varint(VarInt::from(input_index + 1));
            for _ in 0..input_index {
                // Blanked output: maximal value and an empty script.
                writer.write_u64_le(u64::MAX);
                writer.write_varint(VarInt::from(0u64));
            }
            tx.outputs[input_index].write_to(&mut writer);
        }
        _ => {
            writer.write_varint(VarInt::from(tx.outputs.len()));
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
    }

    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);
    Ok(writer.into_bytes())
}

fn write_legacy_input(
    writer: &mut ByteWriter,
    tx: &Transaction,
    index: usize,
    signed_index: usize,
    prev_output_script: &[u8],
    base_type: u32,
) {
    let input = &tx.inputs[index];
    writer.write_bytes(&input.source_txid);
    writer.write_u32_le(input.source_tx_out_index);

    if index == signed_index {
        writer.write_varint(VarInt::from(prev_output_script.len()));
        writer.write_bytes(prev_output_script);
        writer.write_u32_le(input.sequence_number);
    } else {
        writer.write_varint(VarInt::from(0u64));
        let sequence = if base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE {
            0
        } else {
            input.sequence_number
        };
        writer.write_u32_le(sequence);
    }
}
