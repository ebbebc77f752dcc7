use ebx_primitives::PrimitivesError;
use ebx_script::ScriptError;

/// Error type for transaction construction, signing, and verification.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// An input index past the end of the transaction's input list.
    #[error("input index {0} out of range")]
    InputIndexOutOfRange(usize),
    /// The selected unspent outputs cannot cover the requested outputs.
    #[error("not enough funds: needed {needed}, available {available}")]
    NotEnoughFunds { needed: u64, available: u64 },
    /// No key pair registered for the pkh a locking script demands.
    #[error("no key found for pkh {0}")]
    KeyNotFound(String),
    /// An input references an output absent from the unspent-output set.
    #[error("unspent output {0} not found")]
    MissingPrevOut(String),
    /// An unlocking script whose shape matches no branch of the
    /// referenced output's template.
    #[error("input {0} has an unsupported unlocking script shape")]
    UnsupportedInputShape(usize),
    /// A locking script that matches no known template.
    #[error("locking script matches no known template")]
    UnsupportedScriptType,
    /// A malformed `<tx_id_hex>:<index>` unspent-output key.
    #[error("invalid unspent output name: {0}")]
    InvalidOutputName(String),
    /// A signature buffer of the wrong length.
    #[error("invalid signature encoding")]
    InvalidSignature,
    /// An underlying script error (forwarded from `ebx-script`).
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    /// An underlying primitives error (forwarded from `ebx-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}
