//! Interpreter error codes.
//!
//! Execution failures carry a closed code plus a human-readable
//! description, so callers and tests can match on the exact condition.

use std::fmt;

/// Error codes for the script interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterErrorCode {
    InvalidOpcode,
    UnbalancedConditional,
    InvalidStackOperation,
    InvalidOperandSize,
    DivisionByZero,
    NumberTooBig,
    MinimalData,
    InvalidSignatureLength,
    InvalidPublicKeyLength,
    InvalidPubKeyCount,
    InvalidSignatureCount,
    Verify,
    EqualVerify,
    NumEqualVerify,
    CheckSigVerify,
    CheckMultiSigVerify,
    LockAbsNotMet,
    LockRelNotMet,
    InvalidParams,
    ScriptTooBig,
    TooManyOperations,
    StackOverflow,
    EmptyStack,
    EvalFalse,
}

impl fmt::Display for InterpreterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A script interpreter error with an error code and description.
#[derive(Debug, Clone)]
pub struct InterpreterError {
    pub code: InterpreterErrorCode,
    pub description: String,
}

impl InterpreterError {
    pub fn new(code: InterpreterErrorCode, description: impl Into<String>) -> Self {
        InterpreterError { code, description: description.into() }
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl std::error::Error for InterpreterError {}
