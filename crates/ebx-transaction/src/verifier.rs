//! Transaction verifier: re-runs every input script and checks value
//! conservation.

use std::cell::RefCell;

use ebx_primitives::ec::PublicKey;
use ebx_script::interpreter::{Interpreter, InterpreterError, InterpreterErrorCode, TxContext};

use crate::sighash::{self, HashCache};
use crate::transaction::Tx;
use crate::tx_out_bn::TxOutBnMap;
use crate::tx_signature::TxSignature;

/// Independent re-verification of a signed transaction against the
/// unspent outputs it claims to spend.
///
/// Owns a per-transaction [`HashCache`] behind a `RefCell` so the
/// interpreter's shared-reference context can still memoize the
/// sub-hashes across inputs.
pub struct TxVerifier<'a> {
    tx: &'a Tx,
    tx_out_bn_map: &'a TxOutBnMap,
    hash_cache: RefCell<HashCache>,
    working_block_num: u32,
}

impl<'a> TxVerifier<'a> {
    pub fn new(tx: &'a Tx, tx_out_bn_map: &'a TxOutBnMap, working_block_num: u32) -> Self {
        TxVerifier {
            tx,
            tx_out_bn_map,
            hash_cache: RefCell::new(HashCache::new()),
            working_block_num,
        }
    }

    /// Runs the interpreter for one input: the stack is pre-seeded with
    /// the unlocking script's push values and the referenced output's
    /// locking script executes over it.
    pub fn verify_input_script(&self, input_index: usize) -> bool {
        let Some(input) = self.tx.inputs.get(input_index) else {
            return false;
        };
        let Some(tx_out_bn) = self.tx_out_bn_map.get(&input.prev_tx_id, input.prev_out_index)
        else {
            return false;
        };
        if !input.unlocking_script.is_push_only() {
            return false;
        }
        let Ok(stack) = input.unlocking_script.push_values() else {
            return false;
        };
        let mut machine = Interpreter::with_tx_context(
            &tx_out_bn.tx_out.locking_script,
            stack,
            self,
            input_index,
            tx_out_bn.tx_out.value,
        );
        machine.eval().is_ok()
    }

    /// Checks that the referenced output has accrued at least the
    /// relative lock the input declares.
    pub fn verify_input_lock_rel(&self, input_index: usize) -> bool {
        let Some(input) = self.tx.inputs.get(input_index) else {
            return false;
        };
        let Some(tx_out_bn) = self.tx_out_bn_map.get(&input.prev_tx_id, input.prev_out_index)
        else {
            return false;
        };
        tx_out_bn.block_num as u64 + input.lock_rel as u64 <= self.working_block_num as u64
    }

    pub fn verify_inputs(&self) -> bool {
        (0..self.tx.inputs.len())
            .all(|i| self.verify_input_script(i) && self.verify_input_lock_rel(i))
    }

    /// Total output value must not exceed total input value. The
    /// surplus is an implicit fee; equality is not required.
    pub fn verify_no_inflation(&self) -> bool {
        let mut total_in: u128 = 0;
        for input in &self.tx.inputs {
            let Some(tx_out_bn) =
                self.tx_out_bn_map.get(&input.prev_tx_id, input.prev_out_index)
            else {
                return false;
            };
            total_in += tx_out_bn.tx_out.value as u128;
        }
        let total_out: u128 = self.tx.outputs.iter().map(|o| o.value as u128).sum();
        total_out <= total_in
    }

    /// Full verification of a non-coinbase transaction.
    pub fn verify(&self) -> bool {
        !self.tx.inputs.is_empty() && self.verify_no_inflation() && self.verify_inputs()
    }
}

impl TxContext for TxVerifier<'_> {
    fn check_signature(
        &self,
        sig: &[u8],
        pub_key: &[u8],
        sub_script: &[u8],
        input_idx: usize,
        value: u64,
    ) -> Result<bool, InterpreterError> {
        let Ok(tx_sig) = TxSignature::from_bytes(sig) else {
            return Ok(false);
        };
        let Ok(pub_key) = PublicKey::from_bytes(pub_key) else {
            return Ok(false);
        };
        let mut cache = self.hash_cache.borrow_mut();
        let digest = sighash::signature_hash(
            self.tx,
            input_idx,
            sub_script,
            value,
            tx_sig.hash_type,
            &mut cache,
        )
        .map_err(|e| {
            InterpreterError::new(InterpreterErrorCode::InvalidParams, e.to_string())
        })?;
        Ok(pub_key.verify_digest(&digest, &tx_sig.sig))
    }

    fn lock_abs(&self) -> u64 {
        self.tx.lock_abs
    }

    fn input_lock_rel(&self, input_idx: usize) -> u32 {
        self.tx.inputs.get(input_idx).map_or(0, |input| input.lock_rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TxBuilder;
    use crate::output::TxOut;
    use crate::signer::{PkhKeyMap, TxSigner};
    use ebx_primitives::ec::KeyPair;
    use ebx_primitives::pkh::Pkh;
    use ebx_script::Script;

    fn signed_pkh_spend() -> (Tx, TxOutBnMap) {
        let key_pair = KeyPair::from_random();
        let pkh = Pkh::from_pub_key(key_pair.pub_key());
        let mut key_map = PkhKeyMap::new();
        key_map.add(key_pair);
        let mut map = TxOutBnMap::new();
        map.add(&[1u8; 32], 0, TxOut::new(100, Script::from_pkh_output(&pkh)), 0);

        let mut builder = TxBuilder::new(&map, Script::from_pkh_output(&pkh), 0, 1);
        builder.add_output(TxOut::new(50, Script::from_pkh_output(&pkh)));
        let tx = builder.build().unwrap();
        let tx = TxSigner::new(tx, &map, &key_map, 1).sign().unwrap();
        (tx, map)
    }

    #[test]
    fn verifies_signed_pkh_spend() {
        let (tx, map) = signed_pkh_spend();
        let verifier = TxVerifier::new(&tx, &map, 1);
        assert!(verifier.verify_input_script(0));
        assert!(verifier.verify_input_lock_rel(0));
        assert!(verifier.verify_no_inflation());
        assert!(verifier.verify());
    }

    #[test]
    fn rejects_tampered_outputs() {
        let (mut tx, map) = signed_pkh_spend();
        tx.outputs[0].value = 1;
        let verifier = TxVerifier::new(&tx, &map, 1);
        assert!(!verifier.verify_input_script(0));
    }

    #[test]
    fn rejects_unsigned_placeholder() {
        let key_pair = KeyPair::from_random();
        let pkh = Pkh::from_pub_key(key_pair.pub_key());
        let mut map = TxOutBnMap::new();
        map.add(&[1u8; 32], 0, TxOut::new(100, Script::from_pkh_output(&pkh)), 0);

        let mut builder = TxBuilder::new(&map, Script::from_pkh_output(&pkh), 0, 1);
        builder.add_output(TxOut::new(50, Script::from_pkh_output(&pkh)));
        let tx = builder.build().unwrap();

        let verifier = TxVerifier::new(&tx, &map, 1);
        assert!(!verifier.verify_input_script(0));
    }

    #[test]
    fn rejects_inflation() {
        let (mut tx, map) = signed_pkh_spend();
        tx.outputs[0].value = 200;
        let verifier = TxVerifier::new(&tx, &map, 1);
        assert!(!verifier.verify_no_inflation());
        assert!(!verifier.verify());
    }

    #[test]
    fn lock_rel_needs_confirmation_depth() {
        let key_pair = KeyPair::from_random();
        let pkh = Pkh::from_pub_key(key_pair.pub_key());
        let mut map = TxOutBnMap::new();
        map.add(&[1u8; 32], 0, TxOut::new(100, Script::from_pkhx_1h_output(&pkh)), 0);
        let key_map = PkhKeyMap::new();

        // expired spend declares lock_rel = 6
        let mut builder = TxBuilder::new(&map, Script::from_pkh_output(&pkh), 0, 6);
        builder.add_output(TxOut::new(100, Script::from_pkh_output(&pkh)));
        let tx = builder.build().unwrap();
        let tx = TxSigner::new(tx, &map, &key_map, 6).sign().unwrap();

        assert!(TxVerifier::new(&tx, &map, 6).verify());
        // five confirmations is one short of the declared lock
        assert!(!TxVerifier::new(&tx, &map, 5).verify_input_lock_rel(0));
    }

    #[test]
    fn missing_prev_out_fails_verification() {
        let (tx, _) = signed_pkh_spend();
        let empty = TxOutBnMap::new();
        let verifier = TxVerifier::new(&tx, &empty, 1);
        assert!(!verifier.verify_input_script(0));
        assert!(!verifier.verify_no_inflation());
    }
}
