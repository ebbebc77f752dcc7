//! BLAKE3 hash functions.
//!
//! Every hash in this system is BLAKE3: transaction and block ids are
//! double BLAKE3, public key hashes are double BLAKE3 of the compressed
//! key, and MACs use the keyed mode.

/// BLAKE3 of `data`.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// BLAKE3 applied twice. Used for transaction ids, block ids, and
/// public key hashes.
pub fn double_blake3_hash(data: &[u8]) -> [u8; 32] {
    blake3_hash(&blake3_hash(data))
}

/// Keyed BLAKE3 MAC.
pub fn blake3_mac(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    *blake3::keyed_hash(key, data).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake3_empty_input() {
        assert_eq!(
            hex::encode(blake3_hash(b"")),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn blake3_abc() {
        assert_eq!(
            hex::encode(blake3_hash(b"abc")),
            "6437b3ac38465133ffb63b75273a8db548c558465d79db03fd359c6cd5bd9d85"
        );
    }

    #[test]
    fn double_blake3_is_blake3_of_blake3() {
        let data = b"earthbucks";
        assert_eq!(double_blake3_hash(data), blake3_hash(&blake3_hash(data)));
    }

    #[test]
    fn mac_differs_from_plain_hash() {
        let key = [7u8; 32];
        let data = b"message";
        assert_ne!(blake3_mac(&key, data), blake3_hash(data));
        // and is keyed
        assert_ne!(blake3_mac(&key, data), blake3_mac(&[8u8; 32], data));
    }
}
