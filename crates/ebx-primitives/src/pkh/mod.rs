//! Public key hashes.
//!
//! A `Pkh` is the double BLAKE3 of a 33-byte compressed public key and
//! is the payment identity used by the pkh family of output scripts.

use std::fmt;
use std::str::FromStr;

use crate::base58;
use crate::ec::PublicKey;
use crate::hash::double_blake3_hash;
use crate::PrimitivesError;

/// String-form prefix for public key hashes.
const PREFIX: &str = "ebxpkh";

/// Byte length of a public key hash.
pub const PKH_SIZE: usize = 32;

/// Double BLAKE3 of a compressed public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pkh([u8; PKH_SIZE]);

impl Pkh {
    pub fn from_pub_key(pub_key: &PublicKey) -> Self {
        Self::from_pub_key_bytes(&pub_key.to_bytes())
    }

    pub fn from_pub_key_bytes(pub_key: &[u8; 33]) -> Self {
        Pkh(double_blake3_hash(pub_key))
    }

    pub fn from_bytes(bytes: [u8; PKH_SIZE]) -> Self {
        Pkh(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; PKH_SIZE] =
            bytes.try_into().map_err(|_| PrimitivesError::InvalidSize {
                expected: PKH_SIZE,
                got: bytes.len(),
            })?;
        Ok(Pkh(arr))
    }

    pub fn to_bytes(&self) -> [u8; PKH_SIZE] {
        self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Pkh {
    /// Renders the checksummed `ebxpkh...` string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", base58::check_encode(PREFIX, &self.0))
    }
}

impl FromStr for Pkh {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base58::check_decode(PREFIX, s, PKH_SIZE)?;
        Self::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::PrivateKey;

    #[test]
    fn pkh_is_double_blake3_of_pub_key() {
        let pub_key = PrivateKey::from_random().public_key();
        let pkh = Pkh::from_pub_key(&pub_key);
        assert_eq!(pkh.to_bytes(), double_blake3_hash(&pub_key.to_bytes()));
    }

    #[test]
    fn string_form_round_trip() {
        let pkh = Pkh::from_bytes([3u8; 32]);
        let s = pkh.to_string();
        assert!(s.starts_with("ebxpkh"));
        let again: Pkh = s.parse().unwrap();
        assert_eq!(pkh, again);
    }

    #[test]
    fn corrupt_string_is_rejected() {
        let mut s = Pkh::from_bytes([3u8; 32]).to_string();
        s.push('1');
        assert!(s.parse::<Pkh>().is_err());
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let err = Pkh::from_slice(&[0u8; 20]).unwrap_err();
        assert_eq!(err, PrimitivesError::InvalidSize { expected: 32, got: 20 });
    }
}
