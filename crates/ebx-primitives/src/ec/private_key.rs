use std::fmt;
use std::str::FromStr;

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;

use crate::base58;
use crate::ec::{PublicKey, COMPACT_SIG_SIZE, PRIV_KEY_SIZE};
use crate::PrimitivesError;

/// String-form prefix for private keys.
const PREFIX: &str = "ebxprv";

/// A secp256k1 private key.
///
/// Signs 32-byte digests with deterministic ECDSA (RFC 6979) and
/// produces 64-byte compact signatures.
#[derive(Debug, Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generates a fresh key from the OS RNG.
    pub fn from_random() -> Self {
        PrivateKey { inner: SigningKey::random(&mut OsRng) }
    }

    /// Builds a key from a 32-byte scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; PRIV_KEY_SIZE] =
            bytes.try_into().map_err(|_| PrimitivesError::InvalidKeyLength {
                expected: PRIV_KEY_SIZE,
                got: bytes.len(),
            })?;
        let inner = SigningKey::from_bytes(&arr.into())
            .map_err(|_| PrimitivesError::InvalidPrivateKey)?;
        Ok(PrivateKey { inner })
    }

    pub fn from_hex(s: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(s).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; PRIV_KEY_SIZE] {
        self.inner.to_bytes().into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derives the compressed public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(*self.inner.verifying_key())
    }

    /// Signs a 32-byte digest, returning the compact (r || s) form.
    pub fn sign_digest(
        &self,
        digest: &[u8; 32],
    ) -> Result<[u8; COMPACT_SIG_SIZE], PrimitivesError> {
        let sig: Signature = self
            .inner
            .sign_prehash(digest)
            .map_err(|_| PrimitivesError::InvalidSignature)?;
        Ok(sig.to_bytes().into())
    }
}

impl fmt::Display for PrivateKey {
    /// Renders the checksummed `ebxprv...` string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", base58::check_encode(PREFIX, &self.to_bytes()))
    }
}

impl FromStr for PrivateKey {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base58::check_decode(PREFIX, s, PRIV_KEY_SIZE)?;
        Self::from_bytes(&bytes)
    }
}
