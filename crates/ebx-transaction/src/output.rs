//! Transaction output carrying value and a locking script.

use ebx_primitives::util::{ByteReader, ByteWriter, VarInt};
use ebx_script::Script;

use crate::TransactionError;

/// A single output in a transaction.
///
/// # Wire format
///
/// | Field          | Size         |
/// |----------------|--------------|
/// | value          | 8 bytes (BE) |
/// | script length  | VarInt       |
/// | locking_script | variable     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Amount carried by this output, in base units.
    pub value: u64,
    /// The locking script guarding the output.
    pub locking_script: Script,
}

impl TxOut {
    pub fn new(value: u64, locking_script: Script) -> Self {
        TxOut { value, locking_script }
    }

    pub fn from_reader(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_be()?;
        let script_len = reader.read_var_int()?;
        let script_bytes = reader.read_bytes(script_len as usize)?;
        let locking_script = Script::from_bytes(&script_bytes)?;
        Ok(TxOut { value, locking_script })
    }

    pub fn put_bytes(&self, writer: &mut ByteWriter) {
        writer.write_u64_be(self.value);
        let script_bytes = self.locking_script.to_bytes();
        writer.write_var_int(script_bytes.len() as u64);
        writer.write_bytes(&script_bytes);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.put_bytes(&mut writer);
        writer.into_bytes()
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> usize {
        let script_len = self.locking_script.size();
        8 + VarInt(script_len as u64).size() + script_len
    }
}
