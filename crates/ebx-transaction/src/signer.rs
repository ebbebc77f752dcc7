//! Transaction signer: fills placeholder unlocking scripts with real
//! signatures.

use std::collections::HashMap;

use ebx_primitives::ec::KeyPair;
use ebx_primitives::pkh::{Pkh, PKH_SIZE};
use ebx_script::{Script, ScriptTemplate};

use crate::sighash::{HashCache, SIGHASH_ALL};
use crate::transaction::Tx;
use crate::tx_out_bn::TxOutBnMap;
use crate::TransactionError;

/// Key pairs indexed by the pkh of their public key.
#[derive(Debug, Clone, Default)]
pub struct PkhKeyMap {
    map: HashMap<[u8; PKH_SIZE], KeyPair>,
}

impl PkhKeyMap {
    pub fn new() -> Self {
        PkhKeyMap::default()
    }

    pub fn add(&mut self, key_pair: KeyPair) {
        let pkh = Pkh::from_pub_key(key_pair.pub_key());
        self.map.insert(pkh.to_bytes(), key_pair);
    }

    pub fn remove(&mut self, pkh: &Pkh) -> Option<KeyPair> {
        self.map.remove(&pkh.to_bytes())
    }

    pub fn get(&self, pkh: &Pkh) -> Option<&KeyPair> {
        self.map.get(&pkh.to_bytes())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Signs a built transaction input by input.
///
/// Each input's referenced output is classified by template, and the
/// placeholder unlocking script's shape selects the spend branch:
/// unexpired branches are signed with the key matching the template's
/// primary pkh, recovery branches with the key matching the recovery
/// pkh, and expired branches need no key at all. The builder produces
/// unexpired or expired placeholders; callers opting into a recovery
/// spend set a recovery placeholder on the input first.
pub struct TxSigner<'a> {
    tx: Tx,
    tx_out_bn_map: &'a TxOutBnMap,
    key_map: &'a PkhKeyMap,
    working_block_num: u32,
    prohibit_signing_expired: bool,
}

impl<'a> TxSigner<'a> {
    pub fn new(
        tx: Tx,
        tx_out_bn_map: &'a TxOutBnMap,
        key_map: &'a PkhKeyMap,
        working_block_num: u32,
    ) -> Self {
        TxSigner {
            tx,
            tx_out_bn_map,
            key_map,
            working_block_num,
            prohibit_signing_expired: false,
        }
    }

    /// When set, `sign` satisfies every input whose referenced output
    /// has already expired through the key-free expired branch, even
    /// if its placeholder asked for a signature. No live signature is
    /// ever produced for an expired output.
    pub fn prohibit_signing_expired(mut self, prohibit: bool) -> Self {
        self.prohibit_signing_expired = prohibit;
        self
    }

    /// Whether `template` has expired for an output confirmed at
    /// `prev_block_num`.
    fn is_expired(&self, template: ScriptTemplate, prev_block_num: u32) -> bool {
        let new_block_num = self.working_block_num;
        match template {
            ScriptTemplate::Pkhx90d => Script::is_pkhx_90d_expired(new_block_num, prev_block_num),
            ScriptTemplate::Pkhx1h => Script::is_pkhx_1h_expired(new_block_num, prev_block_num),
            ScriptTemplate::Pkhxr90d60d => {
                Script::is_pkhxr_90d_60d_expired(new_block_num, prev_block_num)
            }
            ScriptTemplate::Pkhxr1h40m => {
                Script::is_pkhxr_1h_40m_expired(new_block_num, prev_block_num)
            }
            ScriptTemplate::Pkh | ScriptTemplate::Unknown => false,
        }
    }

    /// The relative lock an expired-branch spend must carry.
    fn expired_lock_rel(template: ScriptTemplate) -> u32 {
        match template {
            ScriptTemplate::Pkhx90d | ScriptTemplate::Pkhxr90d60d => {
                ebx_script::templates::PKHX_90D_LOCK_REL
            }
            _ => ebx_script::templates::PKHX_1H_LOCK_REL,
        }
    }

    /// Rewrites every input whose referenced output has expired to the
    /// key-free expired branch, setting the matching `lock_rel`. Every
    /// signature commits to every input's `lock_rel` through the
    /// sighash, so all rewrites must land before the first signature.
    fn resolve_expired_inputs(&mut self) -> Result<(), TransactionError> {
        for input_index in 0..self.tx.inputs.len() {
            let input = &self.tx.inputs[input_index];
            let name = TxOutBnMap::name(&input.prev_tx_id, input.prev_out_index);
            let tx_out_bn = self
                .tx_out_bn_map
                .get(&input.prev_tx_id, input.prev_out_index)
                .ok_or(TransactionError::MissingPrevOut(name))?;
            let template = tx_out_bn.tx_out.locking_script.classify();
            if !self.is_expired(template, tx_out_bn.block_num) {
                continue;
            }
            let new_script = match template {
                ScriptTemplate::Pkhx90d | ScriptTemplate::Pkhx1h => {
                    Script::from_pkhx_expired_input()
                }
                ScriptTemplate::Pkhxr90d60d | ScriptTemplate::Pkhxr1h40m => {
                    Script::from_pkhxr_expired_input()
                }
                ScriptTemplate::Pkh | ScriptTemplate::Unknown => continue,
            };
            let input = &mut self.tx.inputs[input_index];
            input.unlocking_script = new_script;
            input.lock_rel = Self::expired_lock_rel(template);
        }
        Ok(())
    }

    fn sign_with_pkh(
        &self,
        input_index: usize,
        pkh: &Pkh,
        sub_script: &[u8],
        value: u64,
        cache: &mut HashCache,
    ) -> Result<(ebx_primitives::ec::PublicKey, [u8; 65]), TransactionError> {
        let key_pair = self
            .key_map
            .get(pkh)
            .ok_or_else(|| TransactionError::KeyNotFound(pkh.to_string()))?;
        let sig = self.tx.sign_input(
            input_index,
            key_pair.priv_key(),
            sub_script,
            value,
            SIGHASH_ALL,
            cache,
        )?;
        Ok((key_pair.pub_key().clone(), sig.to_bytes()))
    }

    /// Signs input `input_index` in place.
    pub fn sign_input(
        &mut self,
        input_index: usize,
        cache: &mut HashCache,
    ) -> Result<(), TransactionError> {
        let input = self
            .tx
            .inputs
            .get(input_index)
            .ok_or(TransactionError::InputIndexOutOfRange(input_index))?;

        let name = TxOutBnMap::name(&input.prev_tx_id, input.prev_out_index);
        let tx_out_bn = self
            .tx_out_bn_map
            .get(&input.prev_tx_id, input.prev_out_index)
            .ok_or(TransactionError::MissingPrevOut(name))?;
        let locking_script = tx_out_bn.tx_out.locking_script.clone();
        let value = tx_out_bn.tx_out.value;
        let sub_script = locking_script.to_bytes();
        let shape = &input.unlocking_script;

        let new_script = match locking_script.classify() {
            ScriptTemplate::Pkh => {
                if !shape.is_pkh_input() {
                    return Err(TransactionError::UnsupportedInputShape(input_index));
                }
                let pkh = locking_script
                    .pkh_output_pkh()
                    .ok_or(TransactionError::UnsupportedScriptType)?;
                let (pub_key, sig) =
                    self.sign_with_pkh(input_index, &pkh, &sub_script, value, cache)?;
                Script::from_pkh_input(&sig, &pub_key.to_bytes())
            }
            ScriptTemplate::Pkhx90d | ScriptTemplate::Pkhx1h => {
                if shape.is_pkhx_unexpired_input() {
                    let pkh = locking_script
                        .pkhx_output_pkh()
                        .ok_or(TransactionError::UnsupportedScriptType)?;
                    let (pub_key, sig) =
                        self.sign_with_pkh(input_index, &pkh, &sub_script, value, cache)?;
                    Script::from_pkhx_unexpired_input(&sig, &pub_key.to_bytes())
                } else if shape.is_pkhx_expired_input() {
                    // the expired branch carries no signature
                    Script::from_pkhx_expired_input()
                } else {
                    return Err(TransactionError::UnsupportedInputShape(input_index));
                }
            }
            ScriptTemplate::Pkhxr90d60d | ScriptTemplate::Pkhxr1h40m => {
                let (pkh, recovery_pkh) = locking_script
                    .pkhxr_output_pkhs()
                    .ok_or(TransactionError::UnsupportedScriptType)?;
                if shape.is_pkhxr_unexpired_input() {
                    let (pub_key, sig) =
                        self.sign_with_pkh(input_index, &pkh, &sub_script, value, cache)?;
                    Script::from_pkhxr_unexpired_input(&sig, &pub_key.to_bytes())
                } else if shape.is_pkhxr_recovery_input() {
                    let (pub_key, sig) = self.sign_with_pkh(
                        input_index,
                        &recovery_pkh,
                        &sub_script,
                        value,
                        cache,
                    )?;
                    Script::from_pkhxr_recovery_input(&sig, &pub_key.to_bytes())
                } else if shape.is_pkhxr_expired_input() {
                    Script::from_pkhxr_expired_input()
                } else {
                    return Err(TransactionError::UnsupportedInputShape(input_index));
                }
            }
            ScriptTemplate::Unknown => return Err(TransactionError::UnsupportedScriptType),
        };

        self.tx.inputs[input_index].unlocking_script = new_script;
        Ok(())
    }

    /// Signs every input and returns the finished transaction.
    pub fn sign(mut self) -> Result<Tx, TransactionError> {
        if self.prohibit_signing_expired {
            self.resolve_expired_inputs()?;
        }
        let mut cache = HashCache::new();
        for input_index in 0..self.tx.inputs.len() {
            self.sign_input(input_index, &mut cache)?;
        }
        Ok(self.tx)
    }
}
