//! Block header and difficulty target adjustment.

use ebx_primitives::hash::double_blake3_hash;
use ebx_primitives::util::{ByteReader, ByteWriter};
use ebx_primitives::PrimitivesError;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::TransactionError;

/// Encoded header length in bytes.
pub const HEADER_SIZE: usize = 141;

/// Blocks between difficulty target recalculations.
pub const BLOCKS_PER_TARGET_ADJ_PERIOD: u32 = 2016;

/// Intended seconds between blocks.
pub const BLOCK_INTERVAL: u64 = 600;

/// A block header.
///
/// # Wire format (fixed 141 bytes)
///
/// | Field         | Size         |
/// |---------------|--------------|
/// | version       | 1 byte       |
/// | prev_block_id | 32 bytes     |
/// | merkle_root   | 32 bytes     |
/// | timestamp     | 8 bytes (BE) |
/// | block_num     | 4 bytes (BE) |
/// | target        | 32 bytes     |
/// | nonce         | 32 bytes     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub prev_block_id: [u8; 32],
    pub merkle_root: [u8; 32],
    pub timestamp: u64,
    pub block_num: u32,
    pub target: [u8; 32],
    pub nonce: [u8; 32],
}

impl Header {
    /// The genesis header: block 0 with an all-zero previous id.
    pub fn from_genesis(merkle_root: [u8; 32], initial_target: [u8; 32], timestamp: u64) -> Self {
        Header {
            version: 1,
            prev_block_id: [0u8; 32],
            merkle_root,
            timestamp,
            block_num: 0,
            target: initial_target,
            nonce: [0u8; 32],
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.block_num == 0 && self.prev_block_id == [0u8; 32]
    }

    pub fn from_reader(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        Ok(Header {
            version: reader.read_u8()?,
            prev_block_id: reader.read_fixed::<32>()?,
            merkle_root: reader.read_fixed::<32>()?,
            timestamp: reader.read_u64_be()?,
            block_num: reader.read_u32_be()?,
            target: reader.read_fixed::<32>()?,
            nonce: reader.read_fixed::<32>()?,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let header = Self::from_reader(&mut reader)?;
        if !reader.eof() {
            return Err(PrimitivesError::TooMuchData(reader.remaining()).into());
        }
        Ok(header)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_u8(self.version);
        writer.write_bytes(&self.prev_block_id);
        writer.write_bytes(&self.merkle_root);
        writer.write_u64_be(self.timestamp);
        writer.write_u32_be(self.block_num);
        writer.write_bytes(&self.target);
        writer.write_bytes(&self.nonce);
        writer.into_bytes()
    }

    /// Block id: double BLAKE3 of the serialized header.
    pub fn id(&self) -> [u8; 32] {
        double_blake3_hash(&self.to_bytes())
    }

    /// The retargeted difficulty: the old target scaled by the ratio of
    /// the real time span of the last adjustment period to the ideal
    /// span. A larger target is easier. The result is clamped to
    /// `[1, 2^256 - 1]`.
    pub fn adjust_target(old_target: &[u8; 32], real_time_span: u64) -> [u8; 32] {
        let ideal_span = BLOCKS_PER_TARGET_ADJ_PERIOD as u64 * BLOCK_INTERVAL;
        let new_target =
            BigUint::from_bytes_be(old_target) * real_time_span / ideal_span;

        let new_target = if new_target.is_zero() {
            BigUint::one()
        } else if new_target.bits() > 256 {
            (BigUint::one() << 256u32) - BigUint::one()
        } else {
            new_target
        };

        let bytes = new_target.to_bytes_be();
        let mut target = [0u8; 32];
        target[32 - bytes.len()..].copy_from_slice(&bytes);
        target
    }
}
