//! The 65-byte signature placed in unlocking scripts.

use ebx_primitives::ec::COMPACT_SIG_SIZE;

use crate::TransactionError;

/// Encoded length: one hash-type byte plus the compact signature.
pub const TX_SIGNATURE_SIZE: usize = COMPACT_SIG_SIZE + 1;

/// A compact ECDSA signature tagged with the hash type it commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSignature {
    pub hash_type: u8,
    pub sig: [u8; COMPACT_SIG_SIZE],
}

impl TxSignature {
    pub fn new(hash_type: u8, sig: [u8; COMPACT_SIG_SIZE]) -> Self {
        TxSignature { hash_type, sig }
    }

    pub fn to_bytes(&self) -> [u8; TX_SIGNATURE_SIZE] {
        let mut bytes = [0u8; TX_SIGNATURE_SIZE];
        bytes[0] = self.hash_type;
        bytes[1..].copy_from_slice(&self.sig);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.len() != TX_SIGNATURE_SIZE {
            return Err(TransactionError::InvalidSignature);
        }
        let mut sig = [0u8; COMPACT_SIG_SIZE];
        sig.copy_from_slice(&bytes[1..]);
        Ok(TxSignature { hash_type: bytes[0], sig })
    }
}
