//! Stack-manipulation opcodes.

use num_bigint::BigInt;

use crate::interpreter::error::InterpreterError;
use crate::interpreter::machine::Interpreter;
use crate::interpreter::scriptnum::ScriptNum;
use crate::interpreter::stack::as_bool;

impl Interpreter<'_> {
    pub(crate) fn op_toaltstack(&mut self) -> Result<(), InterpreterError> {
        let item = self.stack.pop()?;
        self.alt_stack.push(item);
        Ok(())
    }

    pub(crate) fn op_fromaltstack(&mut self) -> Result<(), InterpreterError> {
        let item = self.alt_stack.pop()?;
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_2drop(&mut self) -> Result<(), InterpreterError> {
        self.stack.pop()?;
        self.stack.pop()?;
        Ok(())
    }

    /// DUP, 2DUP, 3DUP: copy the top `n` items in place.
    pub(crate) fn op_dup_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        for _ in 0..n {
            let item = self.stack.peek(n - 1)?.clone();
            self.stack.push(item);
        }
        Ok(())
    }

    pub(crate) fn op_2over(&mut self) -> Result<(), InterpreterError> {
        for _ in 0..2 {
            let item = self.stack.peek(3)?.clone();
            self.stack.push(item);
        }
        Ok(())
    }

    pub(crate) fn op_2rot(&mut self) -> Result<(), InterpreterError> {
        let a = self.stack.remove(5)?;
        let b = self.stack.remove(4)?;
        self.stack.push(a);
        self.stack.push(b);
        Ok(())
    }

    pub(crate) fn op_2swap(&mut self) -> Result<(), InterpreterError> {
        let a = self.stack.remove(3)?;
        let b = self.stack.remove(2)?;
        self.stack.push(a);
        self.stack.push(b);
        Ok(())
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), InterpreterError> {
        let top = self.stack.peek(0)?;
        if as_bool(top) {
            let copy = top.clone();
            self.stack.push(copy);
        }
        Ok(())
    }

    pub(crate) fn op_depth(&mut self) -> Result<(), InterpreterError> {
        let depth = ScriptNum::new(BigInt::from(self.stack.depth()));
        self.stack.push_num(&depth);
        Ok(())
    }

    pub(crate) fn op_over(&mut self) -> Result<(), InterpreterError> {
        let item = self.stack.peek(1)?.clone();
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_pick(&mut self) -> Result<(), InterpreterError> {
        let n = self.stack.pop_num()?.to_usize()?;
        let item = self.stack.peek(n)?.clone();
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_roll(&mut self) -> Result<(), InterpreterError> {
        let n = self.stack.pop_num()?.to_usize()?;
        let item = self.stack.remove(n)?;
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_rot(&mut self) -> Result<(), InterpreterError> {
        let item = self.stack.remove(2)?;
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_swap(&mut self) -> Result<(), InterpreterError> {
        let item = self.stack.remove(1)?;
        self.stack.push(item);
        Ok(())
    }

    pub(crate) fn op_tuck(&mut self) -> Result<(), InterpreterError> {
        let top = self.stack.peek(0)?.clone();
        self.stack.insert(2, top)
    }
}
