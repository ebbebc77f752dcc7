//! The fetch/decode/execute loop and flow-control opcodes.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::chunk::ScriptChunk;
use crate::interpreter::error::{InterpreterError, InterpreterErrorCode};
use crate::interpreter::scriptnum::ScriptNum;
use crate::interpreter::stack::{as_bool, Stack};
use crate::interpreter::{TxContext, MAX_OPS, MAX_SCRIPT_SIZE, MAX_STACK_DEPTH};
use crate::opcodes::*;
use crate::script::Script;

fn err(code: InterpreterErrorCode, description: impl Into<String>) -> InterpreterError {
    InterpreterError::new(code, description)
}

/// One script evaluation. Owns the stacks; borrows the script and the
/// optional transaction context for the duration of `eval`.
pub struct Interpreter<'a> {
    pub(crate) script: &'a Script,
    pub(crate) tx_ctx: Option<&'a dyn TxContext>,
    pub(crate) input_idx: usize,
    pub(crate) value: u64,
    pub(crate) stack: Stack,
    pub(crate) alt_stack: Stack,
    if_stack: Vec<bool>,
    num_ops: usize,
    returned: bool,
}

impl<'a> Interpreter<'a> {
    pub fn new(script: &'a Script) -> Self {
        Self::with_stack(script, Vec::new())
    }

    /// Evaluation over a pre-seeded stack (unlocking-script values).
    pub fn with_stack(script: &'a Script, values: Vec<Vec<u8>>) -> Self {
        Interpreter {
            script,
            tx_ctx: None,
            input_idx: 0,
            value: 0,
            stack: Stack::from_values(values),
            alt_stack: Stack::new(),
            if_stack: Vec::new(),
            num_ops: 0,
            returned: false,
        }
    }

    /// Evaluation with transaction facts for the signature and
    /// timelock opcodes.
    pub fn with_tx_context(
        script: &'a Script,
        values: Vec<Vec<u8>>,
        tx_ctx: &'a dyn TxContext,
        input_idx: usize,
        value: u64,
    ) -> Self {
        let mut machine = Self::with_stack(script, values);
        machine.tx_ctx = Some(tx_ctx);
        machine.input_idx = input_idx;
        machine.value = value;
        machine
    }

    /// The final stack, for inspecting results after `eval`.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub(crate) fn tx_context(&self) -> Result<&'a dyn TxContext, InterpreterError> {
        self.tx_ctx.ok_or_else(|| {
            err(InterpreterErrorCode::InvalidParams, "no transaction context")
        })
    }

    /// The committed subscript: the executing script's own bytes.
    pub(crate) fn sub_script(&self) -> Vec<u8> {
        self.script.to_bytes()
    }

    fn executing(&self) -> bool {
        self.if_stack.iter().all(|&b| b)
    }

    /// Runs the script to completion. `Ok(())` means the script ended
    /// with a truthy top-of-stack and no terminal error.
    pub fn eval(&mut self) -> Result<(), InterpreterError> {
        if self.script.size() > MAX_SCRIPT_SIZE {
            return Err(err(
                InterpreterErrorCode::ScriptTooBig,
                format!("script is {} bytes", self.script.size()),
            ));
        }
        let script = self.script;
        for chunk in &script.chunks {
            let executing = self.executing();
            let is_conditional =
                matches!(chunk.opcode, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF);
            if !executing && !is_conditional {
                continue;
            }
            if !is_push_opcode(chunk.opcode) {
                self.num_ops += 1;
                if self.num_ops > MAX_OPS {
                    return Err(err(
                        InterpreterErrorCode::TooManyOperations,
                        "op count limit exceeded",
                    ));
                }
            }
            if chunk.opcode == OP_RETURN {
                // hard stop; the usual final stack check still applies
                self.returned = true;
                break;
            }
            self.execute_chunk(chunk, executing)?;
            if self.stack.depth() + self.alt_stack.depth() > MAX_STACK_DEPTH {
                return Err(err(InterpreterErrorCode::StackOverflow, "stack depth limit"));
            }
        }
        if !self.returned && !self.if_stack.is_empty() {
            return Err(err(
                InterpreterErrorCode::UnbalancedConditional,
                "IF without matching ENDIF",
            ));
        }
        if self.stack.is_empty() {
            return Err(err(InterpreterErrorCode::EmptyStack, "stack empty at end of script"));
        }
        if !as_bool(self.stack.peek(0)?) {
            return Err(err(InterpreterErrorCode::EvalFalse, "script evaluated to false"));
        }
        Ok(())
    }

    fn execute_chunk(
        &mut self,
        chunk: &ScriptChunk,
        executing: bool,
    ) -> Result<(), InterpreterError> {
        if let Some(value) = chunk.push_value() {
            self.stack.push(value);
            return Ok(());
        }
        match chunk.opcode {
            // flow control
            OP_NOP => Ok(()),
            OP_IF => self.op_if(false, executing),
            OP_NOTIF => self.op_if(true, executing),
            OP_ELSE => self.op_else(),
            OP_ENDIF => self.op_endif(),
            OP_VERIFY => self.op_verify(),

            // stack
            OP_TOALTSTACK => self.op_toaltstack(),
            OP_FROMALTSTACK => self.op_fromaltstack(),
            OP_2DROP => self.op_2drop(),
            OP_2DUP => self.op_dup_n(2),
            OP_3DUP => self.op_dup_n(3),
            OP_2OVER => self.op_2over(),
            OP_2ROT => self.op_2rot(),
            OP_2SWAP => self.op_2swap(),
            OP_IFDUP => self.op_ifdup(),
            OP_DEPTH => self.op_depth(),
            OP_DROP => self.stack.pop().map(|_| ()),
            OP_DUP => self.op_dup_n(1),
            OP_NIP => self.stack.remove(1).map(|_| ()),
            OP_OVER => self.op_over(),
            OP_PICK => self.op_pick(),
            OP_ROLL => self.op_roll(),
            OP_ROT => self.op_rot(),
            OP_SWAP => self.op_swap(),
            OP_TUCK => self.op_tuck(),

            // byte strings
            OP_CAT => self.op_cat(),
            OP_SUBSTR => self.op_substr(),
            OP_LEFT => self.op_left(),
            OP_RIGHT => self.op_right(),
            OP_SIZE => self.op_size(),
            OP_INVERT => self.op_invert(),
            OP_AND => self.op_bitwise(|a, b| a & b),
            OP_OR => self.op_bitwise(|a, b| a | b),
            OP_XOR => self.op_bitwise(|a, b| a ^ b),
            OP_EQUAL => self.op_equal(false),
            OP_EQUALVERIFY => self.op_equal(true),

            // arithmetic
            OP_1ADD => self.op_unary_num(|a| a + 1),
            OP_1SUB => self.op_unary_num(|a| a - 1),
            OP_2MUL => self.op_unary_num(|a| a * 2),
            OP_2DIV => self.op_unary_num(|a| a / 2),
            OP_NEGATE => self.op_unary_num(|a| -a),
            OP_ABS => self.op_abs(),
            OP_NOT => self.op_not(),
            OP_0NOTEQUAL => self.op_0notequal(),
            OP_ADD => self.op_binary_num(|a, b| a + b),
            OP_SUB => self.op_binary_num(|a, b| a - b),
            OP_MUL => self.op_binary_num(|a, b| a * b),
            OP_DIV => self.op_div(),
            OP_MOD => self.op_mod(),
            OP_LSHIFT => self.op_shift(true),
            OP_RSHIFT => self.op_shift(false),
            OP_BOOLAND => self.op_num_cmp(|a, b| !a.is_zero() && !b.is_zero()),
            OP_BOOLOR => self.op_num_cmp(|a, b| !a.is_zero() || !b.is_zero()),
            OP_NUMEQUAL => self.op_numequal(false),
            OP_NUMEQUALVERIFY => self.op_numequal(true),
            OP_NUMNOTEQUAL => self.op_num_cmp(|a, b| a != b),
            OP_LESSTHAN => self.op_num_cmp(|a, b| a < b),
            OP_GREATERTHAN => self.op_num_cmp(|a, b| a > b),
            OP_LESSTHANOREQUAL => self.op_num_cmp(|a, b| a <= b),
            OP_GREATERTHANOREQUAL => self.op_num_cmp(|a, b| a >= b),
            OP_MIN => self.op_binary_num(|a, b| a.min(b)),
            OP_MAX => self.op_binary_num(|a, b| a.max(b)),
            OP_WITHIN => self.op_within(),

            // crypto
            OP_BLAKE3 => self.op_blake3(false),
            OP_DOUBLEBLAKE3 => self.op_blake3(true),
            OP_CHECKSIG => self.op_checksig(false),
            OP_CHECKSIGVERIFY => self.op_checksig(true),
            OP_CHECKMULTISIG => self.op_checkmultisig(false),
            OP_CHECKMULTISIGVERIFY => self.op_checkmultisig(true),

            // timelocks
            OP_CHECKLOCKABSVERIFY => self.op_check_lock_abs_verify(),
            OP_CHECKLOCKRELVERIFY => self.op_check_lock_rel_verify(),

            op => Err(err(
                InterpreterErrorCode::InvalidOpcode,
                format!("unimplemented opcode 0x{:02x}", op),
            )),
        }
    }

    // ----- flow control -----

    fn op_if(&mut self, negate: bool, executing: bool) -> Result<(), InterpreterError> {
        if !executing {
            // track nesting without touching the data stack
            self.if_stack.push(false);
            return Ok(());
        }
        let cond = self.stack.pop_bool().map_err(|_| {
            err(InterpreterErrorCode::UnbalancedConditional, "IF with empty stack")
        })?;
        self.if_stack.push(cond != negate);
        Ok(())
    }

    fn op_else(&mut self) -> Result<(), InterpreterError> {
        match self.if_stack.last_mut() {
            Some(top) => {
                *top = !*top;
                Ok(())
            }
            None => Err(err(
                InterpreterErrorCode::UnbalancedConditional,
                "ELSE without IF",
            )),
        }
    }

    fn op_endif(&mut self) -> Result<(), InterpreterError> {
        self.if_stack.pop().map(|_| ()).ok_or_else(|| {
            err(InterpreterErrorCode::UnbalancedConditional, "ENDIF without IF")
        })
    }

    fn op_verify(&mut self) -> Result<(), InterpreterError> {
        if self.stack.pop_bool()? {
            Ok(())
        } else {
            Err(err(InterpreterErrorCode::Verify, "VERIFY failed"))
        }
    }

    // ----- timelocks -----

    /// Top of stack is peeked, not popped.
    fn op_check_lock_abs_verify(&mut self) -> Result<(), InterpreterError> {
        let n = ScriptNum::from_bytes(self.stack.peek(0)?)?;
        let lock_abs = self.tx_context()?.lock_abs();
        if n.is_negative() || n.val > BigInt::from(lock_abs) {
            return Err(err(
                InterpreterErrorCode::LockAbsNotMet,
                "CHECKLOCKABSVERIFY failed",
            ));
        }
        Ok(())
    }

    /// Top of stack is peeked, not popped.
    fn op_check_lock_rel_verify(&mut self) -> Result<(), InterpreterError> {
        let n = ScriptNum::from_bytes(self.stack.peek(0)?)?;
        let lock_rel = self.tx_context()?.input_lock_rel(self.input_idx);
        if n.is_negative() || n.val > BigInt::from(lock_rel) {
            return Err(err(
                InterpreterErrorCode::LockRelNotMet,
                "CHECKLOCKRELVERIFY failed",
            ));
        }
        Ok(())
    }
}
