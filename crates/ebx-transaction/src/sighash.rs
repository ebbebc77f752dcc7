//! Signature hash computation.
//!
//! A signature commits to a reconstructed preimage of the whole
//! transaction shape, double BLAKE3 hashed to the 32-byte digest that
//! is actually signed:
//!
//! ```text
//! version || hash_prevouts || hash_lock_rels || prev_tx_id
//!         || prev_out_index || varint(len(sub_script)) || sub_script
//!         || value || lock_rel || hash_outputs || lock_abs || hash_type
//! ```
//!
//! The three sub-hashes each cover every input or output of the
//! transaction, which is what binds a signature to the full shape. A
//! [`HashCache`] memoizes them so signing or verifying N inputs costs
//! O(N) hash work instead of O(N^2).

use ebx_primitives::hash::double_blake3_hash;
use ebx_primitives::util::{ByteWriter, VarInt};

use crate::transaction::Tx;
use crate::TransactionError;

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u8 = 0x01;

/// Sign all inputs but no outputs.
pub const SIGHASH_NONE: u8 = 0x02;

/// Sign all inputs and only the output at the signed input's index.
pub const SIGHASH_SINGLE: u8 = 0x03;

/// Combined with a base type: commit to the current input only.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Mask extracting the base type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u8 = 0x1f;

/// Memoized sub-hashes for one transaction's signing or verification
/// pass. Never share a cache across transactions.
#[derive(Debug, Clone, Default)]
pub struct HashCache {
    hash_prevouts: Option<[u8; 32]>,
    hash_lock_rels: Option<[u8; 32]>,
    hash_outputs: Option<[u8; 32]>,
}

impl HashCache {
    pub fn new() -> Self {
        HashCache::default()
    }

    /// Double BLAKE3 of all input outpoints (prev_tx_id + index).
    fn prevouts(&mut self, tx: &Tx) -> [u8; 32] {
        *self.hash_prevouts.get_or_insert_with(|| {
            let mut writer = ByteWriter::new();
            for input in &tx.inputs {
                writer.write_bytes(&input.prev_tx_id);
                writer.write_u32_be(input.prev_out_index);
            }
            double_blake3_hash(&writer.into_bytes())
        })
    }

    /// Double BLAKE3 of all input `lock_rel` fields.
    fn lock_rels(&mut self, tx: &Tx) -> [u8; 32] {
        *self.hash_lock_rels.get_or_insert_with(|| {
            let mut writer = ByteWriter::new();
            for input in &tx.inputs {
                writer.write_u32_be(input.lock_rel);
            }
            double_blake3_hash(&writer.into_bytes())
        })
    }

    /// Double BLAKE3 of all serialized outputs.
    fn outputs(&mut self, tx: &Tx) -> [u8; 32] {
        *self.hash_outputs.get_or_insert_with(|| {
            let mut writer = ByteWriter::new();
            for output in &tx.outputs {
                output.put_bytes(&mut writer);
            }
            double_blake3_hash(&writer.into_bytes())
        })
    }
}

/// The preimage bytes committed to by a signature over input
/// `input_index`, before double hashing.
///
/// `sub_script` is the locking script of the output being spent (or,
/// during interpreter execution, the running script's own bytes);
/// `value` is that output's amount.
pub fn sighash_preimage(
    tx: &Tx,
    input_index: usize,
    sub_script: &[u8],
    value: u64,
    hash_type: u8,
    cache: &mut HashCache,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(TransactionError::InputIndexOutOfRange(input_index))?;

    let anyone_can_pay = hash_type & SIGHASH_ANYONECANPAY != 0;
    let base_type = hash_type & SIGHASH_MASK;

    let hash_prevouts = if anyone_can_pay { [0u8; 32] } else { cache.prevouts(tx) };

    let hash_lock_rels =
        if anyone_can_pay || base_type == SIGHASH_SINGLE || base_type == SIGHASH_NONE {
            [0u8; 32]
        } else {
            cache.lock_rels(tx)
        };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        cache.outputs(tx)
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        double_blake3_hash(&tx.outputs[input_index].to_bytes())
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::new();
    writer.write_u8(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_lock_rels);
    writer.write_bytes(&input.prev_tx_id);
    writer.write_u32_be(input.prev_out_index);
    writer.write_var_int(sub_script.len() as u64);
    writer.write_bytes(sub_script);
    writer.write_u64_be(value);
    writer.write_u32_be(input.lock_rel);
    writer.write_bytes(&hash_outputs);
    writer.write_u64_be(tx.lock_abs);
    writer.write_u8(hash_type);
    Ok(writer.into_bytes())
}

/// The 32-byte digest signed for input `input_index`.
pub fn signature_hash(
    tx: &Tx,
    input_index: usize,
    sub_script: &[u8],
    value: u64,
    hash_type: u8,
    cache: &mut HashCache,
) -> Result<[u8; 32], TransactionError> {
    let preimage = sighash_preimage(tx, input_index, sub_script, value, hash_type, cache)?;
    Ok(double_blake3_hash(&preimage))
}

/// Expected preimage length for a given subscript, useful for sizing.
pub fn preimage_size(sub_script_len: usize) -> usize {
    1 + 32 + 32 + 32 + 4 + VarInt(sub_script_len as u64).size() + sub_script_len + 8 + 4 + 32 + 8 + 1
}
