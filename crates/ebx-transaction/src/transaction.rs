//! The transaction container: version, inputs, outputs, lock_abs.

use ebx_primitives::ec::{PrivateKey, PublicKey};
use ebx_primitives::hash::double_blake3_hash;
use ebx_primitives::util::{ByteReader, ByteWriter, VarInt};
use ebx_primitives::PrimitivesError;
use ebx_script::Script;

use crate::input::TxIn;
use crate::output::TxOut;
use crate::sighash::{self, HashCache};
use crate::tx_signature::TxSignature;
use crate::TransactionError;

/// The only transaction version currently valid.
pub const TX_VERSION: u8 = 1;

/// A transaction: a set of inputs spending previous outputs, a set of
/// new outputs, and an absolute lock value.
///
/// # Wire format
///
/// | Field     | Size         |
/// |-----------|--------------|
/// | version   | 1 byte       |
/// | n_inputs  | VarInt       |
/// | inputs    | variable     |
/// | n_outputs | VarInt       |
/// | outputs   | variable     |
/// | lock_abs  | 8 bytes (BE) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub version: u8,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_abs: u64,
}

impl Tx {
    pub fn new(version: u8, inputs: Vec<TxIn>, outputs: Vec<TxOut>, lock_abs: u64) -> Self {
        Tx { version, inputs, outputs, lock_abs }
    }

    /// A coinbase transaction: one coinbase input and the given reward
    /// output.
    pub fn from_coinbase(input_script: Script, output_script: Script, value: u64) -> Self {
        Tx {
            version: TX_VERSION,
            inputs: vec![TxIn::from_coinbase(input_script)],
            outputs: vec![TxOut::new(value, output_script)],
            lock_abs: 0,
        }
    }

    /// Whether this transaction has the coinbase shape: exactly one
    /// input, and that input is a coinbase input.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_coinbase()
    }

    pub fn from_reader(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader.read_u8()?;
        let n_inputs = reader.read_var_int()?;
        let mut inputs = Vec::with_capacity(n_inputs as usize);
        for _ in 0..n_inputs {
            inputs.push(TxIn::from_reader(reader)?);
        }
        let n_outputs = reader.read_var_int()?;
        let mut outputs = Vec::with_capacity(n_outputs as usize);
        for _ in 0..n_outputs {
            outputs.push(TxOut::from_reader(reader)?);
        }
        let lock_abs = reader.read_u64_be()?;
        Ok(Tx { version, inputs, outputs, lock_abs })
    }

    /// Decodes a transaction, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::from_reader(&mut reader)?;
        if !reader.eof() {
            return Err(PrimitivesError::TooMuchData(reader.remaining()).into());
        }
        Ok(tx)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_u8(self.version);
        writer.write_var_int(self.inputs.len() as u64);
        for input in &self.inputs {
            input.put_bytes(&mut writer);
        }
        writer.write_var_int(self.outputs.len() as u64);
        for output in &self.outputs {
            output.put_bytes(&mut writer);
        }
        writer.write_u64_be(self.lock_abs);
        writer.into_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(s).map_err(ebx_script::ScriptError::from)?;
        Self::from_bytes(&bytes)
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> usize {
        1 + VarInt(self.inputs.len() as u64).size()
            + self.inputs.iter().map(TxIn::size).sum::<usize>()
            + VarInt(self.outputs.len() as u64).size()
            + self.outputs.iter().map(TxOut::size).sum::<usize>()
            + 8
    }

    /// Transaction id: double BLAKE3 of the full serialization. Used
    /// as the referencing key for this transaction's outputs.
    pub fn id(&self) -> [u8; 32] {
        double_blake3_hash(&self.to_bytes())
    }

    pub fn id_hex(&self) -> String {
        hex::encode(self.id())
    }

    /// Signs input `input_index`, producing the 65-byte signature that
    /// goes in its unlocking script.
    pub fn sign_input(
        &self,
        input_index: usize,
        priv_key: &PrivateKey,
        sub_script: &[u8],
        value: u64,
        hash_type: u8,
        cache: &mut HashCache,
    ) -> Result<TxSignature, TransactionError> {
        let digest =
            sighash::signature_hash(self, input_index, sub_script, value, hash_type, cache)?;
        let sig = priv_key.sign_digest(&digest)?;
        Ok(TxSignature::new(hash_type, sig))
    }

    /// Recomputes the digest a signature commits to and verifies it.
    pub fn verify_input_sig(
        &self,
        input_index: usize,
        pub_key: &PublicKey,
        sig: &TxSignature,
        sub_script: &[u8],
        value: u64,
        cache: &mut HashCache,
    ) -> Result<bool, TransactionError> {
        let digest =
            sighash::signature_hash(self, input_index, sub_script, value, sig.hash_type, cache)?;
        Ok(pub_key.verify_digest(&digest, &sig.sig))
    }
}
