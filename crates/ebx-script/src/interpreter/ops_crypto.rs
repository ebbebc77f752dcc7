//! Hash and signature opcodes.

use ebx_primitives::ec::{COMPACT_SIG_SIZE, PUB_KEY_SIZE};
use ebx_primitives::hash::{blake3_hash, double_blake3_hash};
use num_traits::ToPrimitive;

use crate::interpreter::error::{InterpreterError, InterpreterErrorCode};
use crate::interpreter::machine::Interpreter;
use crate::interpreter::MAX_MULTISIG_KEYS;

/// Full signature length: hash-type byte + compact signature.
const SIG_SIZE: usize = COMPACT_SIG_SIZE + 1;

fn err(code: InterpreterErrorCode, description: impl Into<String>) -> InterpreterError {
    InterpreterError::new(code, description)
}

impl Interpreter<'_> {
    pub(crate) fn op_blake3(&mut self, double: bool) -> Result<(), InterpreterError> {
        let data = self.stack.pop()?;
        let digest = if double { double_blake3_hash(&data) } else { blake3_hash(&data) };
        self.stack.push(digest.to_vec());
        Ok(())
    }

    fn pop_pub_key(&mut self) -> Result<Vec<u8>, InterpreterError> {
        let pub_key = self.stack.pop()?;
        if pub_key.len() != PUB_KEY_SIZE {
            return Err(err(
                InterpreterErrorCode::InvalidPublicKeyLength,
                format!("public key is {} bytes", pub_key.len()),
            ));
        }
        Ok(pub_key)
    }

    fn pop_sig(&mut self) -> Result<Vec<u8>, InterpreterError> {
        let sig = self.stack.pop()?;
        if sig.len() != SIG_SIZE {
            return Err(err(
                InterpreterErrorCode::InvalidSignatureLength,
                format!("signature is {} bytes", sig.len()),
            ));
        }
        Ok(sig)
    }

    pub(crate) fn op_checksig(&mut self, verify: bool) -> Result<(), InterpreterError> {
        let pub_key = self.pop_pub_key()?;
        let sig = self.pop_sig()?;
        let sub_script = self.sub_script();
        let ctx = self.tx_context()?;
        let ok = ctx.check_signature(&sig, &pub_key, &sub_script, self.input_idx, self.value)?;
        if verify {
            if ok {
                Ok(())
            } else {
                Err(err(InterpreterErrorCode::CheckSigVerify, "CHECKSIGVERIFY failed"))
            }
        } else {
            self.stack.push_bool(ok);
            Ok(())
        }
    }

    /// Each signature consumes the first remaining key that verifies
    /// it, so signatures may arrive in any order but no key can be
    /// used twice.
    pub(crate) fn op_checkmultisig(&mut self, verify: bool) -> Result<(), InterpreterError> {
        let n = self
            .stack
            .pop_num()?
            .val
            .to_usize()
            .filter(|&n| n <= MAX_MULTISIG_KEYS)
            .ok_or_else(|| err(InterpreterErrorCode::InvalidPubKeyCount, "key count out of range"))?;
        let mut keys = Vec::with_capacity(n);
        for _ in 0..n {
            keys.push(self.pop_pub_key()?);
        }
        let m = self
            .stack
            .pop_num()?
            .val
            .to_usize()
            .filter(|&m| m <= n)
            .ok_or_else(|| {
                err(InterpreterErrorCode::InvalidSignatureCount, "signature count out of range")
            })?;
        let mut sigs = Vec::with_capacity(m);
        for _ in 0..m {
            sigs.push(self.pop_sig()?);
        }

        let sub_script = self.sub_script();
        let ctx = self.tx_context()?;
        let mut success = true;
        'sigs: for sig in &sigs {
            for (i, key) in keys.iter().enumerate() {
                if ctx.check_signature(sig, key, &sub_script, self.input_idx, self.value)? {
                    keys.remove(i);
                    continue 'sigs;
                }
            }
            success = false;
            break;
        }

        if verify {
            if success {
                Ok(())
            } else {
                Err(err(
                    InterpreterErrorCode::CheckMultiSigVerify,
                    "CHECKMULTISIGVERIFY failed",
                ))
            }
        } else {
            self.stack.push_bool(success);
            Ok(())
        }
    }
}
