//! secp256k1 elliptic curve keys.
//!
//! Keys sign and verify 32-byte digests directly; callers hash first.
//! Signatures are 64-byte compact (r || s) values.

mod key_pair;
mod private_key;
mod public_key;

pub use key_pair::KeyPair;
pub use private_key::PrivateKey;
pub use public_key::PublicKey;

/// Length of a compressed SEC1 public key.
pub const PUB_KEY_SIZE: usize = 33;

/// Length of a private key scalar.
pub const PRIV_KEY_SIZE: usize = 32;

/// Length of a compact ECDSA signature.
pub const COMPACT_SIG_SIZE: usize = 64;
