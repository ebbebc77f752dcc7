//! The interpreter's value stack.

use crate::interpreter::error::{InterpreterError, InterpreterErrorCode};
use crate::interpreter::scriptnum::ScriptNum;

/// Script truthiness: all-zero bytes are false, anything else true.
pub fn as_bool(bytes: &[u8]) -> bool {
    bytes.iter().any(|&b| b != 0)
}

/// Canonical boolean encoding: `[1]` for true, empty for false.
pub fn from_bool(b: bool) -> Vec<u8> {
    if b {
        vec![1]
    } else {
        Vec::new()
    }
}

fn underflow() -> InterpreterError {
    InterpreterError::new(InterpreterErrorCode::InvalidStackOperation, "stack underflow")
}

/// A stack of byte strings. Depths count from the top (0 = top).
#[derive(Debug, Default, Clone)]
pub struct Stack {
    items: Vec<Vec<u8>>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    /// Stack pre-seeded with `values`, first value deepest.
    pub fn from_values(values: Vec<Vec<u8>>) -> Self {
        Stack { items: values }
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Vec<u8>] {
        &self.items
    }

    pub fn push(&mut self, item: Vec<u8>) {
        self.items.push(item);
    }

    pub fn push_bool(&mut self, b: bool) {
        self.push(from_bool(b));
    }

    pub fn push_num(&mut self, n: &ScriptNum) {
        self.push(n.to_bytes());
    }

    pub fn pop(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.items.pop().ok_or_else(underflow)
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        Ok(as_bool(&self.pop()?))
    }

    pub fn pop_num(&mut self) -> Result<ScriptNum, InterpreterError> {
        ScriptNum::from_bytes(&self.pop()?)
    }

    /// Borrows the item `depth` entries below the top.
    pub fn peek(&self, depth: usize) -> Result<&Vec<u8>, InterpreterError> {
        if depth >= self.items.len() {
            return Err(underflow());
        }
        Ok(&self.items[self.items.len() - 1 - depth])
    }

    /// Removes and returns the item `depth` entries below the top.
    pub fn remove(&mut self, depth: usize) -> Result<Vec<u8>, InterpreterError> {
        if depth >= self.items.len() {
            return Err(underflow());
        }
        let idx = self.items.len() - 1 - depth;
        Ok(self.items.remove(idx))
    }

    /// Inserts `item` so it ends up `depth` entries below the top.
    pub fn insert(&mut self, depth: usize, item: Vec<u8>) -> Result<(), InterpreterError> {
        if depth > self.items.len() {
            return Err(underflow());
        }
        let idx = self.items.len() - depth;
        self.items.insert(idx, item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!as_bool(&[]));
        assert!(!as_bool(&[0, 0, 0]));
        assert!(as_bool(&[1]));
        assert!(as_bool(&[0, 0, 4]));
        // the sign bit is a nonzero byte under this rule
        assert!(as_bool(&[0x80]));
    }

    #[test]
    fn peek_remove_insert_count_from_top() {
        let mut stack = Stack::from_values(vec![vec![1], vec![2], vec![3]]);
        assert_eq!(stack.peek(0).unwrap(), &vec![3]);
        assert_eq!(stack.peek(2).unwrap(), &vec![1]);
        assert_eq!(stack.remove(1).unwrap(), vec![2]);
        assert_eq!(stack.depth(), 2);
        stack.insert(2, vec![9]).unwrap();
        assert_eq!(stack.items(), &[vec![9], vec![1], vec![3]]);
    }

    #[test]
    fn underflow_is_invalid_stack_operation() {
        let mut stack = Stack::new();
        assert_eq!(
            stack.pop().unwrap_err().code,
            InterpreterErrorCode::InvalidStackOperation
        );
        assert!(stack.peek(0).is_err());
        assert!(stack.remove(0).is_err());
    }
}
