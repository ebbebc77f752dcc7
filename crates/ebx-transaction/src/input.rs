//! Transaction input referencing a previous output.

use ebx_primitives::util::{ByteReader, ByteWriter, VarInt};
use ebx_script::Script;

use crate::TransactionError;

/// `lock_rel` value marking a coinbase input, which spends nothing.
pub const COINBASE_LOCK_REL: u32 = 0xffff_ffff;

/// A single input in a transaction.
///
/// Each input references an output of a previous transaction by its
/// transaction id and output index. The unlocking script supplies the
/// push values that satisfy the referenced output's locking script.
/// `lock_rel` declares how many blocks the referenced output has been
/// buried under; `OP_CHECKLOCKRELVERIFY` checks spend eligibility
/// against it and the verifier separately checks it against the actual
/// confirmation depth.
///
/// # Wire format
///
/// | Field            | Size           |
/// |------------------|----------------|
/// | prev_tx_id       | 32 bytes       |
/// | prev_out_index   | 4 bytes (BE)   |
/// | script length    | VarInt         |
/// | unlocking_script | variable       |
/// | lock_rel         | 4 bytes (BE)   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    /// Id of the transaction holding the output being spent.
    pub prev_tx_id: [u8; 32],
    /// Index of the output within that transaction.
    pub prev_out_index: u32,
    /// The unlocking script proving spend authorization.
    pub unlocking_script: Script,
    /// Relative lock value in blocks.
    pub lock_rel: u32,
}

impl TxIn {
    pub fn new(
        prev_tx_id: [u8; 32],
        prev_out_index: u32,
        unlocking_script: Script,
        lock_rel: u32,
    ) -> Self {
        TxIn { prev_tx_id, prev_out_index, unlocking_script, lock_rel }
    }

    /// A coinbase input: all-zero prev id and the coinbase lock marker.
    /// The script may carry arbitrary data.
    pub fn from_coinbase(script: Script) -> Self {
        TxIn {
            prev_tx_id: [0u8; 32],
            prev_out_index: COINBASE_LOCK_REL,
            unlocking_script: script,
            lock_rel: COINBASE_LOCK_REL,
        }
    }

    /// Whether this input has the coinbase shape.
    pub fn is_coinbase(&self) -> bool {
        self.prev_tx_id == [0u8; 32] && self.lock_rel == COINBASE_LOCK_REL
    }

    pub fn from_reader(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let prev_tx_id = reader.read_fixed::<32>()?;
        let prev_out_index = reader.read_u32_be()?;
        let script_len = reader.read_var_int()?;
        let script_bytes = reader.read_bytes(script_len as usize)?;
        let unlocking_script = Script::from_bytes(&script_bytes)?;
        let lock_rel = reader.read_u32_be()?;
        Ok(TxIn { prev_tx_id, prev_out_index, unlocking_script, lock_rel })
    }

    pub fn put_bytes(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.prev_tx_id);
        writer.write_u32_be(self.prev_out_index);
        let script_bytes = self.unlocking_script.to_bytes();
        writer.write_var_int(script_bytes.len() as u64);
        writer.write_bytes(&script_bytes);
        writer.write_u32_be(self.lock_rel);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.put_bytes(&mut writer);
        writer.into_bytes()
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> usize {
        let script_len = self.unlocking_script.size();
        32 + 4 + VarInt(script_len as u64).size() + script_len + 4
    }
}
