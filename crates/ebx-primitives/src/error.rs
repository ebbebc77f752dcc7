use thiserror::Error;

/// Errors produced by the primitives crate.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PrimitivesError {
    /// A read ran past the end of the input buffer.
    #[error("not enough data: needed {needed} bytes, {available} available")]
    NotEnoughData { needed: usize, available: usize },

    /// Input had bytes left over after the value was fully decoded.
    #[error("too much data: {0} trailing bytes")]
    TooMuchData(usize),

    /// A value was encoded in more bytes than required.
    #[error("non-minimal encoding")]
    NonMinimalEncoding,

    /// A fixed-size value had the wrong length.
    #[error("invalid size: expected {expected}, got {got}")]
    InvalidSize { expected: usize, got: usize },

    /// A checksummed string failed its checksum.
    #[error("invalid checksum")]
    InvalidChecksum,

    /// A string form did not match the expected layout.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Key material had the wrong length.
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    /// Key bytes were not a valid secp256k1 scalar.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Bytes were not a valid compressed secp256k1 point.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Signature bytes were not a valid compact signature.
    #[error("invalid signature")]
    InvalidSignature,

    /// A hex string failed to parse.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A base58 string failed to parse.
    #[error("invalid base58: {0}")]
    InvalidBase58(String),
}
