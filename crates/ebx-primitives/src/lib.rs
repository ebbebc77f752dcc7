/// EarthBucks core primitives.
///
/// Foundational building blocks shared by the script and transaction
/// crates:
/// - BLAKE3 hash functions (plain, double, keyed MAC)
/// - Big-endian byte reader/writer and variable-length integers
/// - Base58 encoding with the `ebx`-prefixed checksummed string form
/// - secp256k1 key pairs signing 32-byte digests
/// - Public key hashes (`Pkh`) used as payment identities

pub mod base58;
pub mod ec;
pub mod hash;
pub mod pkh;
pub mod util;

mod error;
pub use error::PrimitivesError;
