use crate::ec::{PrivateKey, PublicKey};
use crate::PrimitivesError;

/// A private key together with its derived public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    priv_key: PrivateKey,
    pub_key: PublicKey,
}

impl KeyPair {
    pub fn new(priv_key: PrivateKey) -> Self {
        let pub_key = priv_key.public_key();
        KeyPair { priv_key, pub_key }
    }

    pub fn from_random() -> Self {
        Self::new(PrivateKey::from_random())
    }

    pub fn from_priv_key_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        Ok(Self::new(PrivateKey::from_bytes(bytes)?))
    }

    pub fn priv_key(&self) -> &PrivateKey {
        &self.priv_key
    }

    pub fn pub_key(&self) -> &PublicKey {
        &self.pub_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pub_key_matches_derivation() {
        let pair = KeyPair::from_random();
        assert_eq!(pair.pub_key(), &pair.priv_key().public_key());
    }

    #[test]
    fn from_priv_key_bytes_round_trip() {
        let pair = KeyPair::from_random();
        let again = KeyPair::from_priv_key_bytes(&pair.priv_key().to_bytes()).unwrap();
        assert_eq!(pair.pub_key(), again.pub_key());
    }
}
