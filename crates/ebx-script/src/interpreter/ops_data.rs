//! Byte-string opcodes: splice, bitwise, and equality.

use num_bigint::BigInt;

use crate::interpreter::error::{InterpreterError, InterpreterErrorCode};
use crate::interpreter::machine::Interpreter;
use crate::interpreter::scriptnum::ScriptNum;

fn range_err(description: &str) -> InterpreterError {
    InterpreterError::new(InterpreterErrorCode::InvalidStackOperation, description)
}

impl Interpreter<'_> {
    pub(crate) fn op_cat(&mut self) -> Result<(), InterpreterError> {
        let tail = self.stack.pop()?;
        let mut head = self.stack.pop()?;
        head.extend_from_slice(&tail);
        self.stack.push(head);
        Ok(())
    }

    pub(crate) fn op_substr(&mut self) -> Result<(), InterpreterError> {
        let size = self.stack.pop_num()?.to_usize()?;
        let begin = self.stack.pop_num()?.to_usize()?;
        let data = self.stack.pop()?;
        let end = begin.checked_add(size).ok_or_else(|| range_err("substr overflow"))?;
        if end > data.len() {
            return Err(range_err("substr out of range"));
        }
        self.stack.push(data[begin..end].to_vec());
        Ok(())
    }

    pub(crate) fn op_left(&mut self) -> Result<(), InterpreterError> {
        let size = self.stack.pop_num()?.to_usize()?;
        let data = self.stack.pop()?;
        if size > data.len() {
            return Err(range_err("left out of range"));
        }
        self.stack.push(data[..size].to_vec());
        Ok(())
    }

    pub(crate) fn op_right(&mut self) -> Result<(), InterpreterError> {
        let size = self.stack.pop_num()?.to_usize()?;
        let data = self.stack.pop()?;
        if size > data.len() {
            return Err(range_err("right out of range"));
        }
        self.stack.push(data[data.len() - size..].to_vec());
        Ok(())
    }

    /// Pushes the length of the top item without consuming it.
    pub(crate) fn op_size(&mut self) -> Result<(), InterpreterError> {
        let len = self.stack.peek(0)?.len();
        self.stack.push_num(&ScriptNum::new(BigInt::from(len)));
        Ok(())
    }

    pub(crate) fn op_invert(&mut self) -> Result<(), InterpreterError> {
        let mut data = self.stack.pop()?;
        for byte in &mut data {
            *byte = !*byte;
        }
        self.stack.push(data);
        Ok(())
    }

    /// AND/OR/XOR over equal-length operands.
    pub(crate) fn op_bitwise(
        &mut self,
        f: impl Fn(u8, u8) -> u8,
    ) -> Result<(), InterpreterError> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        if a.len() != b.len() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidOperandSize,
                "bitwise operands differ in length",
            ));
        }
        let out = a.iter().zip(&b).map(|(&x, &y)| f(x, y)).collect();
        self.stack.push(out);
        Ok(())
    }

    pub(crate) fn op_equal(&mut self, verify: bool) -> Result<(), InterpreterError> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let equal = a == b;
        if verify {
            if equal {
                Ok(())
            } else {
                Err(InterpreterError::new(
                    InterpreterErrorCode::EqualVerify,
                    "EQUALVERIFY failed",
                ))
            }
        } else {
            self.stack.push_bool(equal);
            Ok(())
        }
    }
}
