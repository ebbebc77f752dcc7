//! Stack-machine script interpreter.
//!
//! The interpreter executes a locking script over a stack pre-seeded
//! with the push values of the matching unlocking script. Transaction
//! facts (sighash verification, lock values) reach the machine through
//! the [`TxContext`] trait so this crate stays independent of the
//! transaction model.

pub mod error;
pub mod scriptnum;
pub mod stack;

mod machine;
mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_stack;

pub use error::{InterpreterError, InterpreterErrorCode};
pub use machine::Interpreter;
pub use scriptnum::ScriptNum;
pub use stack::Stack;

/// Maximum encoded script length in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Maximum executed non-push opcodes per evaluation.
pub const MAX_OPS: usize = 10_000;
/// Maximum combined main + alt stack depth.
pub const MAX_STACK_DEPTH: usize = 1_000;
/// Maximum keys accepted by CHECKMULTISIG.
pub const MAX_MULTISIG_KEYS: usize = 16;

/// Transaction facts consumed by the signature and timelock opcodes.
pub trait TxContext {
    /// Verifies `sig` (one hash-type byte plus a 64-byte compact
    /// signature) from input `input_idx` spending an output worth
    /// `value`, committing to `sub_script`.
    fn check_signature(
        &self,
        sig: &[u8],
        pub_key: &[u8],
        sub_script: &[u8],
        input_idx: usize,
        value: u64,
    ) -> Result<bool, InterpreterError>;

    /// The transaction's absolute lock value.
    fn lock_abs(&self) -> u64;

    /// The `lock_rel` field of input `input_idx`.
    fn input_lock_rel(&self, input_idx: usize) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ScriptChunk;
    use crate::opcodes::*;
    use crate::script::Script;
    use ebx_primitives::ec::{KeyPair, PublicKey};
    use ebx_primitives::hash::blake3_hash;

    /// Verifies signatures over `blake3(sub_script)`, ignoring the
    /// transaction fields the real sighash would commit to.
    struct MockContext {
        lock_abs: u64,
        lock_rel: u32,
    }

    impl Default for MockContext {
        fn default() -> Self {
            MockContext { lock_abs: 0, lock_rel: 0 }
        }
    }

    impl TxContext for MockContext {
        fn check_signature(
            &self,
            sig: &[u8],
            pub_key: &[u8],
            sub_script: &[u8],
            _input_idx: usize,
            _value: u64,
        ) -> Result<bool, InterpreterError> {
            let digest = blake3_hash(sub_script);
            let pub_key = match PublicKey::from_bytes(pub_key) {
                Ok(k) => k,
                Err(_) => return Ok(false),
            };
            let compact: [u8; 64] = match sig[1..].try_into() {
                Ok(c) => c,
                Err(_) => return Ok(false),
            };
            Ok(pub_key.verify_digest(&digest, &compact))
        }

        fn lock_abs(&self) -> u64 {
            self.lock_abs
        }

        fn input_lock_rel(&self, _input_idx: usize) -> u32 {
            self.lock_rel
        }
    }

    fn eval_str(s: &str) -> Result<(), InterpreterError> {
        let script: Script = s.parse().unwrap();
        Interpreter::new(&script).eval()
    }

    fn code_of(s: &str) -> InterpreterErrorCode {
        eval_str(s).unwrap_err().code
    }

    /// Signs `blake3(script bytes)` the way MockContext verifies.
    fn mock_sig(script: &Script, key_pair: &KeyPair) -> [u8; 65] {
        let digest = blake3_hash(&script.to_bytes());
        let compact = key_pair.priv_key().sign_digest(&digest).unwrap();
        let mut sig = [0u8; 65];
        sig[0] = 0x01;
        sig[1..].copy_from_slice(&compact);
        sig
    }

    #[test]
    fn arithmetic_ops() {
        assert!(eval_str("2 3 ADD 5 NUMEQUAL").is_ok());
        assert!(eval_str("7 3 SUB 4 NUMEQUAL").is_ok());
        assert!(eval_str("6 7 MUL 0x2a NUMEQUAL").is_ok());
        assert!(eval_str("7 2 DIV 3 NUMEQUAL").is_ok());
        assert!(eval_str("7 2 MOD 1 NUMEQUAL").is_ok());
        assert!(eval_str("1NEGATE ABS 1 NUMEQUAL").is_ok());
        assert!(eval_str("5 NEGATE 5 ADD 0 NUMEQUAL").is_ok());
        assert!(eval_str("3 1ADD 4 NUMEQUAL").is_ok());
        assert!(eval_str("2 5 MIN 2 NUMEQUAL").is_ok());
        assert!(eval_str("2 5 MAX 5 NUMEQUAL").is_ok());
        assert!(eval_str("3 1 5 WITHIN").is_ok());
        assert!(eval_str("1 4 LSHIFT 16 NUMEQUAL").is_ok());
        assert!(eval_str("16 2 RSHIFT 4 NUMEQUAL").is_ok());
    }

    #[test]
    fn truncated_division_semantics() {
        // -7 / 2 == -3 and -7 % 2 == -1
        assert!(eval_str("7 NEGATE 2 DIV 3 NEGATE NUMEQUAL").is_ok());
        assert!(eval_str("7 NEGATE 2 MOD 1 NEGATE NUMEQUAL").is_ok());
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(code_of("1 0 DIV"), InterpreterErrorCode::DivisionByZero);
        assert_eq!(code_of("1 0 MOD"), InterpreterErrorCode::DivisionByZero);
    }

    #[test]
    fn comparisons() {
        assert!(eval_str("2 3 LESSTHAN").is_ok());
        assert!(eval_str("3 3 LESSTHANOREQUAL").is_ok());
        assert!(eval_str("4 3 GREATERTHAN").is_ok());
        assert_eq!(code_of("3 2 LESSTHAN"), InterpreterErrorCode::EvalFalse);
        assert!(eval_str("1 2 BOOLAND").is_ok());
        assert!(eval_str("0 2 BOOLOR").is_ok());
        assert_eq!(code_of("0 2 BOOLAND"), InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn conditional_branches() {
        assert!(eval_str("1 IF 2 ELSE 3 ENDIF 2 NUMEQUAL").is_ok());
        assert!(eval_str("0 IF 2 ELSE 3 ENDIF 3 NUMEQUAL").is_ok());
        assert!(eval_str("1 NOTIF 2 ELSE 3 ENDIF 3 NUMEQUAL").is_ok());
        // a skipped branch must not touch the data stack
        assert!(eval_str("0 IF IF 1 ELSE 2 ENDIF ELSE 3 ENDIF 3 NUMEQUAL").is_ok());
    }

    #[test]
    fn unbalanced_conditionals() {
        assert_eq!(code_of("1 IF 1"), InterpreterErrorCode::UnbalancedConditional);
        assert_eq!(code_of("1 ELSE 1 ENDIF"), InterpreterErrorCode::UnbalancedConditional);
        assert_eq!(code_of("1 ENDIF"), InterpreterErrorCode::UnbalancedConditional);
        // IF with nothing to pop
        assert_eq!(code_of("IF 1 ENDIF"), InterpreterErrorCode::UnbalancedConditional);
    }

    #[test]
    fn verify_and_equal() {
        assert!(eval_str("1 VERIFY 1").is_ok());
        assert_eq!(code_of("1 0 VERIFY"), InterpreterErrorCode::Verify);
        assert!(eval_str("0xdead 0xdead EQUAL").is_ok());
        assert_eq!(code_of("0xdead 0xbeef EQUAL"), InterpreterErrorCode::EvalFalse);
        assert_eq!(
            code_of("0xdead 0xbeef EQUALVERIFY 1"),
            InterpreterErrorCode::EqualVerify
        );
    }

    #[test]
    fn terminal_stack_states() {
        assert_eq!(code_of("0"), InterpreterErrorCode::EvalFalse);
        assert_eq!(code_of("NOP"), InterpreterErrorCode::EmptyStack);
        // multi-byte zero is still false
        assert_eq!(code_of("0x0000"), InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn return_is_a_hard_stop_not_an_error() {
        // everything after RETURN is dead, including the false push
        assert!(eval_str("1 RETURN 0").is_ok());
        assert_eq!(code_of("RETURN 1"), InterpreterErrorCode::EmptyStack);
        assert_eq!(code_of("0 RETURN"), InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn stack_manipulation_ops() {
        assert!(eval_str("1 2 SWAP 1 NUMEQUAL").is_ok());
        assert!(eval_str("1 2 DROP 1 NUMEQUAL").is_ok());
        assert!(eval_str("1 DUP ADD 2 NUMEQUAL").is_ok());
        assert!(eval_str("1 2 OVER 1 NUMEQUAL").is_ok());
        assert!(eval_str("1 2 NIP 2 NUMEQUAL").is_ok());
        assert!(eval_str("1 2 3 ROT 1 NUMEQUAL").is_ok());
        assert!(eval_str("1 2 TUCK DROP DROP 2 NUMEQUAL").is_ok());
        assert!(eval_str("5 6 7 2 PICK 5 NUMEQUAL").is_ok());
        assert!(eval_str("5 6 7 2 ROLL 5 NUMEQUAL").is_ok());
        assert!(eval_str("1 2 DEPTH 2 NUMEQUAL").is_ok());
        assert!(eval_str("1 TOALTSTACK 2 FROMALTSTACK ADD 3 NUMEQUAL").is_ok());
        assert_eq!(code_of("1 SWAP"), InterpreterErrorCode::InvalidStackOperation);
    }

    #[test]
    fn byte_string_ops() {
        assert!(eval_str("0xdead 0xbeef CAT 0xdeadbeef EQUAL").is_ok());
        assert!(eval_str("0xdeadbeef 1 2 SUBSTR 0xadbe EQUAL").is_ok());
        assert!(eval_str("0xdeadbeef 2 LEFT 0xdead EQUAL").is_ok());
        assert!(eval_str("0xdeadbeef 2 RIGHT 0xbeef EQUAL").is_ok());
        assert!(eval_str("0xdeadbeef SIZE 4 NUMEQUAL").is_ok());
        assert!(eval_str("0x00ff INVERT 0xff00 EQUAL").is_ok());
        assert!(eval_str("0x0f 0x03 AND 0x03 EQUAL").is_ok());
        assert!(eval_str("0x0f0f 0xf0f0 OR 0xffff EQUAL").is_ok());
        assert!(eval_str("0xff 0x0f XOR 0xf0 EQUAL").is_ok());
        assert_eq!(
            code_of("0xdeadbeef 3 3 SUBSTR"),
            InterpreterErrorCode::InvalidStackOperation
        );
        assert_eq!(
            code_of("0xff 0xffff AND"),
            InterpreterErrorCode::InvalidOperandSize
        );
    }

    #[test]
    fn blake3_ops() {
        let digest = blake3_hash(&[0xde, 0xad]);
        let script = format!("0xdead BLAKE3 0x{} EQUAL", hex::encode(digest));
        assert!(eval_str(&script).is_ok());
        let double = blake3_hash(&digest);
        let script = format!("0xdead DOUBLEBLAKE3 0x{} EQUAL", hex::encode(double));
        assert!(eval_str(&script).is_ok());
    }

    #[test]
    fn check_lock_abs_verify() {
        let script: Script = "0x2a CHECKLOCKABSVERIFY".parse().unwrap();
        let ctx = MockContext { lock_abs: 41, ..Default::default() };
        let err = Interpreter::with_tx_context(&script, vec![], &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::LockAbsNotMet);

        let ctx = MockContext { lock_abs: 42, ..Default::default() };
        assert!(Interpreter::with_tx_context(&script, vec![], &ctx, 0, 0).eval().is_ok());
    }

    /// CHECKLOCKRELVERIFY peeks: on success the operand stays put.
    #[test]
    fn check_lock_rel_verify() {
        let script: Script = "10 CHECKLOCKRELVERIFY".parse().unwrap();
        let ctx = MockContext { lock_rel: 5, ..Default::default() };
        let err = Interpreter::with_tx_context(&script, vec![], &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::LockRelNotMet);

        let ctx = MockContext { lock_rel: 10, ..Default::default() };
        let mut machine = Interpreter::with_tx_context(&script, vec![], &ctx, 0, 0);
        assert!(machine.eval().is_ok());
        assert_eq!(machine.stack().items(), &[vec![10u8]]);
    }

    #[test]
    fn checksig_round_trip() {
        let key_pair = KeyPair::from_random();
        let pub_key = key_pair.pub_key().to_bytes();
        let locking: Script = "CHECKSIG".parse().unwrap();
        let sig = mock_sig(&locking, &key_pair);

        let ctx = MockContext::default();
        let stack = vec![sig.to_vec(), pub_key.to_vec()];
        assert!(Interpreter::with_tx_context(&locking, stack, &ctx, 0, 0).eval().is_ok());

        // tampered signature pushes false
        let mut bad = sig;
        bad[10] ^= 1;
        let stack = vec![bad.to_vec(), pub_key.to_vec()];
        let err = Interpreter::with_tx_context(&locking, stack, &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn checksig_length_checks() {
        let ctx = MockContext::default();
        let locking: Script = "CHECKSIG".parse().unwrap();
        let stack = vec![vec![0; 65], vec![0; 32]];
        let err = Interpreter::with_tx_context(&locking, stack, &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::InvalidPublicKeyLength);

        let stack = vec![vec![0; 64], vec![0; 33]];
        let err = Interpreter::with_tx_context(&locking, stack, &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::InvalidSignatureLength);
    }

    #[test]
    fn checksig_without_context_is_invalid_params() {
        let locking: Script = "CHECKSIG".parse().unwrap();
        let mut machine =
            Interpreter::with_stack(&locking, vec![vec![0; 65], vec![0; 33]]);
        assert_eq!(machine.eval().unwrap_err().code, InterpreterErrorCode::InvalidParams);
    }

    /// Signatures may arrive in any order; each consumes one key.
    #[test]
    fn multisig_accepts_out_of_order_signatures() {
        let a = KeyPair::from_random();
        let b = KeyPair::from_random();
        let c = KeyPair::from_random();
        let locking: Script = "CHECKMULTISIG".parse().unwrap();
        let sig_a = mock_sig(&locking, &a);
        let sig_b = mock_sig(&locking, &b);

        // bottom to top: sigB sigA m=2 A B C n=3
        let stack = vec![
            sig_b.to_vec(),
            sig_a.to_vec(),
            vec![2],
            a.pub_key().to_bytes().to_vec(),
            b.pub_key().to_bytes().to_vec(),
            c.pub_key().to_bytes().to_vec(),
            vec![3],
        ];
        let ctx = MockContext::default();
        assert!(Interpreter::with_tx_context(&locking, stack, &ctx, 0, 0).eval().is_ok());
    }

    #[test]
    fn multisig_rejects_reusing_one_key() {
        let a = KeyPair::from_random();
        let b = KeyPair::from_random();
        let locking: Script = "CHECKMULTISIG".parse().unwrap();
        let sig_a = mock_sig(&locking, &a);

        // the same signature twice cannot consume B
        let stack = vec![
            sig_a.to_vec(),
            sig_a.to_vec(),
            vec![2],
            a.pub_key().to_bytes().to_vec(),
            b.pub_key().to_bytes().to_vec(),
            vec![2],
        ];
        let ctx = MockContext::default();
        let err = Interpreter::with_tx_context(&locking, stack, &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn multisig_count_checks() {
        let ctx = MockContext::default();
        let locking: Script = "CHECKMULTISIG".parse().unwrap();
        let err = Interpreter::with_tx_context(&locking, vec![vec![17]], &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::InvalidPubKeyCount);

        // m > n
        let stack = vec![vec![2], vec![0; 33], vec![1]];
        let err = Interpreter::with_tx_context(&locking, stack, &ctx, 0, 0)
            .eval()
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::InvalidSignatureCount);
    }

    #[test]
    fn script_size_limit() {
        let mut chunks = vec![ScriptChunk::new(OP_1)];
        chunks.extend((0..MAX_SCRIPT_SIZE).map(|_| ScriptChunk::new(OP_NOP)));
        let script = Script::new(chunks);
        let err = Interpreter::new(&script).eval().unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::ScriptTooBig);
    }

    #[test]
    fn stack_depth_limit() {
        let chunks = (0..=MAX_STACK_DEPTH).map(|_| ScriptChunk::new(OP_1)).collect();
        let script = Script::new(chunks);
        let err = Interpreter::new(&script).eval().unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::StackOverflow);
    }
}
