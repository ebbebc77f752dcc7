/// EarthBucks script model and interpreter.
///
/// Provides the script chunk and opcode definitions, the chunk-sequence
/// Script type, the standard output-script templates (pkh, expiring
/// pkhx, expiring-with-recovery pkhxr), and a stack-machine interpreter
/// with precise failure semantics.

pub mod chunk;
pub mod interpreter;
pub mod opcodes;
pub mod script;
pub mod templates;

mod error;
pub use chunk::ScriptChunk;
pub use error::ScriptError;
pub use script::Script;
pub use templates::ScriptTemplate;
