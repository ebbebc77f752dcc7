//! Numeric opcodes over minimally-encoded script numbers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::interpreter::error::{InterpreterError, InterpreterErrorCode};
use crate::interpreter::machine::Interpreter;
use crate::interpreter::scriptnum::ScriptNum;

/// Shift counts larger than this would let a script manufacture huge
/// values from a tiny operand.
const MAX_SHIFT: usize = 65_536;

impl Interpreter<'_> {
    fn pop_two_nums(&mut self) -> Result<(BigInt, BigInt), InterpreterError> {
        let b = self.stack.pop_num()?;
        let a = self.stack.pop_num()?;
        Ok((a.val, b.val))
    }

    pub(crate) fn op_unary_num(
        &mut self,
        f: impl Fn(BigInt) -> BigInt,
    ) -> Result<(), InterpreterError> {
        let a = self.stack.pop_num()?;
        self.stack.push_num(&ScriptNum::new(f(a.val)));
        Ok(())
    }

    pub(crate) fn op_binary_num(
        &mut self,
        f: impl Fn(BigInt, BigInt) -> BigInt,
    ) -> Result<(), InterpreterError> {
        let (a, b) = self.pop_two_nums()?;
        self.stack.push_num(&ScriptNum::new(f(a, b)));
        Ok(())
    }

    /// Boolean-valued comparison of two numbers.
    pub(crate) fn op_num_cmp(
        &mut self,
        f: impl Fn(&BigInt, &BigInt) -> bool,
    ) -> Result<(), InterpreterError> {
        let (a, b) = self.pop_two_nums()?;
        self.stack.push_bool(f(&a, &b));
        Ok(())
    }

    pub(crate) fn op_abs(&mut self) -> Result<(), InterpreterError> {
        self.op_unary_num(|a| a.abs())
    }

    pub(crate) fn op_not(&mut self) -> Result<(), InterpreterError> {
        let a = self.stack.pop_num()?;
        self.stack.push_bool(a.is_zero());
        Ok(())
    }

    pub(crate) fn op_0notequal(&mut self) -> Result<(), InterpreterError> {
        let a = self.stack.pop_num()?;
        self.stack.push_bool(!a.is_zero());
        Ok(())
    }

    /// Truncated division, like the fixed-width arithmetic it models.
    pub(crate) fn op_div(&mut self) -> Result<(), InterpreterError> {
        let (a, b) = self.pop_two_nums()?;
        if b.is_zero() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::DivisionByZero,
                "division by zero",
            ));
        }
        let (quotient, _) = a.div_rem(&b);
        self.stack.push_num(&ScriptNum::new(quotient));
        Ok(())
    }

    pub(crate) fn op_mod(&mut self) -> Result<(), InterpreterError> {
        let (a, b) = self.pop_two_nums()?;
        if b.is_zero() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::DivisionByZero,
                "modulo by zero",
            ));
        }
        let (_, remainder) = a.div_rem(&b);
        self.stack.push_num(&ScriptNum::new(remainder));
        Ok(())
    }

    pub(crate) fn op_shift(&mut self, left: bool) -> Result<(), InterpreterError> {
        let count = self.stack.pop_num()?;
        if count.is_negative() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                "negative shift count",
            ));
        }
        let count = count.val.to_usize().filter(|&c| c <= MAX_SHIFT).ok_or_else(|| {
            InterpreterError::new(InterpreterErrorCode::NumberTooBig, "shift count too large")
        })?;
        let a = self.stack.pop_num()?;
        let shifted = if left { a.val << count } else { a.val >> count };
        self.stack.push_num(&ScriptNum::new(shifted));
        Ok(())
    }

    pub(crate) fn op_numequal(&mut self, verify: bool) -> Result<(), InterpreterError> {
        let (a, b) = self.pop_two_nums()?;
        let equal = a == b;
        if verify {
            if equal {
                Ok(())
            } else {
                Err(InterpreterError::new(
                    InterpreterErrorCode::NumEqualVerify,
                    "NUMEQUALVERIFY failed",
                ))
            }
        } else {
            self.stack.push_bool(equal);
            Ok(())
        }
    }

    /// `min <= x < max`
    pub(crate) fn op_within(&mut self) -> Result<(), InterpreterError> {
        let max = self.stack.pop_num()?.val;
        let min = self.stack.pop_num()?.val;
        let x = self.stack.pop_num()?.val;
        self.stack.push_bool(min <= x && x < max);
        Ok(())
    }
}
