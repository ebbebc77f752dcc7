/// EarthBucks transaction model.
///
/// Provides transaction inputs, outputs, and the whole-transaction
/// container with binary serialization, id computation, and the
/// sighash protocol binding signatures to an exact transaction shape.
/// On top of those sit the unspent-output map and the builder, signer,
/// and verifier that turn spendable outputs into verified spends, plus
/// the block header with its target-adjustment arithmetic.

pub mod builder;
pub mod header;
pub mod input;
pub mod output;
pub mod sighash;
pub mod signer;
pub mod transaction;
pub mod tx_out_bn;
pub mod tx_signature;
pub mod verifier;

mod error;
pub use builder::TxBuilder;
pub use error::TransactionError;
pub use header::Header;
pub use input::TxIn;
pub use output::TxOut;
pub use signer::{PkhKeyMap, TxSigner};
pub use transaction::Tx;
pub use tx_out_bn::{TxOutBn, TxOutBnMap};
pub use tx_signature::TxSignature;
pub use verifier::TxVerifier;
