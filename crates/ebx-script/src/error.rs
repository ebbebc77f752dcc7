/// Error types for script parsing and construction.
///
/// Interpreter execution failures use the separate
/// [`crate::interpreter::InterpreterError`] type so tests can assert
/// exact failure codes.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A byte that is not a known opcode.
    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    /// A string token that names no opcode.
    #[error("unknown opcode name: {0}")]
    UnknownOpcodeName(String),

    /// Push payload exceeds the 32-bit length range.
    #[error("push data too big: {0} bytes")]
    DataTooBig(usize),

    /// A push was encoded with a wider opcode than the payload needs.
    #[error("non-minimal push encoding")]
    NonMinimalPush,

    /// An unlocking script contained a non-push chunk where only push
    /// data is allowed.
    #[error("script is not push-only")]
    NotPushOnly,

    /// Invalid hex string.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Error from the primitives codec.
    #[error("primitives error: {0}")]
    Primitives(#[from] ebx_primitives::PrimitivesError),
}
