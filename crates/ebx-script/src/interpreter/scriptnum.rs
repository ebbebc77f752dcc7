//! Script numbers: minimally-encoded signed integers.
//!
//! Byte form is little-endian magnitude with the sign carried in the
//! top bit of the last byte; the empty string is zero. Decoding
//! enforces minimality (no redundant trailing byte).

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

use crate::interpreter::error::{InterpreterError, InterpreterErrorCode};

/// Arbitrary-precision script number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScriptNum {
    pub val: BigInt,
}

impl ScriptNum {
    pub fn new(val: BigInt) -> Self {
        ScriptNum { val }
    }

    pub fn from_i64(v: i64) -> Self {
        ScriptNum { val: BigInt::from(v) }
    }

    /// Decodes a minimally-encoded signed number.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InterpreterError> {
        if bytes.is_empty() {
            return Ok(Self::from_i64(0));
        }
        let last = bytes[bytes.len() - 1];
        // a trailing byte carrying only the sign bit is redundant
        // unless the byte below it needs its top bit free
        if last & 0x7f == 0 && (bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::MinimalData,
                "non-minimal script number",
            ));
        }
        let mut magnitude = bytes.to_vec();
        let negative = last & 0x80 != 0;
        let idx = magnitude.len() - 1;
        magnitude[idx] &= 0x7f;
        let val = BigInt::from_bytes_le(Sign::Plus, &magnitude);
        Ok(ScriptNum { val: if negative { -val } else { val } })
    }

    /// Minimal signed-number encoding; zero is the empty string.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.val.is_zero() {
            return Vec::new();
        }
        let negative = self.val.is_negative();
        let (_, mut bytes) = self.val.to_bytes_le();
        let last = bytes[bytes.len() - 1];
        if last & 0x80 != 0 {
            bytes.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            let idx = bytes.len() - 1;
            bytes[idx] |= 0x80;
        }
        bytes
    }

    pub fn to_i64(&self) -> Result<i64, InterpreterError> {
        self.val.to_i64().ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::NumberTooBig,
                "script number out of 64-bit range",
            )
        })
    }

    /// Non-negative index conversion for PICK/ROLL style operands.
    pub fn to_usize(&self) -> Result<usize, InterpreterError> {
        self.val.to_usize().ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                "index is negative or out of range",
            )
        })
    }

    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.val.is_negative()
    }
}
