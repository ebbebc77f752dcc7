//! Base58 encoding and the checksummed `ebx` string form.
//!
//! Human-readable values (keys, public key hashes) are rendered as
//! `<prefix><8 hex chars><base58>`: a fixed ASCII prefix, the first
//! four bytes of the BLAKE3 hash of the payload in hex, then the
//! payload in base58.

use crate::hash::blake3_hash;
use crate::PrimitivesError;

/// Length of the hex checksum segment in the string form.
const CHECK_HEX_LEN: usize = 8;

/// Encodes `data` as plain base58.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decodes a plain base58 string.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Renders `data` in the checksummed `<prefix><check><base58>` form.
pub fn check_encode(prefix: &str, data: &[u8]) -> String {
    let check = &blake3_hash(data)[..CHECK_HEX_LEN / 2];
    format!("{}{}{}", prefix, hex::encode(check), encode(data))
}

/// Parses a checksummed string, requiring `prefix`, a valid checksum,
/// and a payload of exactly `expected_len` bytes.
pub fn check_decode(
    prefix: &str,
    s: &str,
    expected_len: usize,
) -> Result<Vec<u8>, PrimitivesError> {
    let rest = s
        .strip_prefix(prefix)
        .ok_or_else(|| PrimitivesError::InvalidEncoding(format!("missing {} prefix", prefix)))?;
    if rest.len() < CHECK_HEX_LEN {
        return Err(PrimitivesError::InvalidEncoding(
            "string too short for checksum".to_string(),
        ));
    }
    let (check_hex, payload_b58) = rest.split_at(CHECK_HEX_LEN);
    let check =
        hex::decode(check_hex).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
    let data = decode(payload_b58)?;
    if data.len() != expected_len {
        return Err(PrimitivesError::InvalidSize {
            expected: expected_len,
            got: data.len(),
        });
    }
    if blake3_hash(&data)[..CHECK_HEX_LEN / 2] != check[..] {
        return Err(PrimitivesError::InvalidChecksum);
    }
    Ok(data)
}
