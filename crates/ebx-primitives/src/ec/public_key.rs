use std::fmt;
use std::str::FromStr;

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::base58;
use crate::ec::{COMPACT_SIG_SIZE, PUB_KEY_SIZE};
use crate::PrimitivesError;

/// String-form prefix for public keys.
const PREFIX: &str = "ebxpub";

/// A secp256k1 public key, always handled in compressed SEC1 form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    pub(crate) fn from_verifying_key(inner: VerifyingKey) -> Self {
        PublicKey { inner }
    }

    /// Parses a 33-byte compressed SEC1 encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PUB_KEY_SIZE {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PUB_KEY_SIZE,
                got: bytes.len(),
            });
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| PrimitivesError::InvalidPublicKey)?;
        Ok(PublicKey { inner })
    }

    pub fn from_hex(s: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(s).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; PUB_KEY_SIZE] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; PUB_KEY_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verifies a 64-byte compact signature over a 32-byte digest.
    /// Malformed signature bytes verify as false.
    pub fn verify_digest(&self, digest: &[u8; 32], sig: &[u8; COMPACT_SIG_SIZE]) -> bool {
        match Signature::from_slice(sig) {
            Ok(sig) => self.inner.verify_prehash(digest, &sig).is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Display for PublicKey {
    /// Renders the checksummed `ebxpub...` string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", base58::check_encode(PREFIX, &self.to_bytes()))
    }
}

impl FromStr for PublicKey {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base58::check_decode(PREFIX, s, PUB_KEY_SIZE)?;
        Self::from_bytes(&bytes)
    }
}
