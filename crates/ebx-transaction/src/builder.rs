//! Transaction builder: selects unspent outputs to fund a target
//! output set and produces an unsigned transaction with placeholder
//! unlocking scripts.

use ebx_script::templates::{PKHX_1H_LOCK_REL, PKHX_90D_LOCK_REL};
use ebx_script::{Script, ScriptTemplate};

use crate::input::TxIn;
use crate::output::TxOut;
use crate::transaction::{Tx, TX_VERSION};
use crate::tx_out_bn::TxOutBnMap;
use crate::TransactionError;

/// Builds an unsigned transaction from a set of unspent outputs.
///
/// Selection is greedy over outputs ordered by `(block_num, name)`, so
/// older outputs are spent first and ties break deterministically.
/// Each selected input gets a placeholder unlocking script matching
/// its template's spend branch, so serialized size estimates are
/// accurate before signing. Any surplus over the requested outputs
/// goes to a change output paying `change_script`.
pub struct TxBuilder<'a> {
    tx_out_bn_map: &'a TxOutBnMap,
    outputs: Vec<TxOut>,
    change_script: Script,
    lock_abs: u64,
    working_block_num: u32,
}

impl<'a> TxBuilder<'a> {
    pub fn new(
        tx_out_bn_map: &'a TxOutBnMap,
        change_script: Script,
        lock_abs: u64,
        working_block_num: u32,
    ) -> Self {
        TxBuilder {
            tx_out_bn_map,
            outputs: Vec::new(),
            change_script,
            lock_abs,
            working_block_num,
        }
    }

    pub fn add_output(&mut self, tx_out: TxOut) -> &mut Self {
        self.outputs.push(tx_out);
        self
    }

    /// The placeholder unlocking script and input `lock_rel` for
    /// spending `locking_script` at the working block number.
    ///
    /// Time-gated templates whose expiry has passed get the expired
    /// branch, which requires declaring the template's lock_rel on the
    /// input. Recovery-branch spends are opted into at signing time,
    /// never chosen here.
    fn placeholder_for(
        &self,
        locking_script: &Script,
        prev_block_num: u32,
    ) -> Result<(Script, u32), TransactionError> {
        match locking_script.classify() {
            ScriptTemplate::Pkh => Ok((Script::from_pkh_input_placeholder(), 0)),
            ScriptTemplate::Pkhx90d => {
                if Script::is_pkhx_90d_expired(self.working_block_num, prev_block_num) {
                    Ok((Script::from_pkhx_expired_input(), PKHX_90D_LOCK_REL))
                } else {
                    Ok((Script::from_pkhx_unexpired_input_placeholder(), 0))
                }
            }
            ScriptTemplate::Pkhx1h => {
                if Script::is_pkhx_1h_expired(self.working_block_num, prev_block_num) {
                    Ok((Script::from_pkhx_expired_input(), PKHX_1H_LOCK_REL))
                } else {
                    Ok((Script::from_pkhx_unexpired_input_placeholder(), 0))
                }
            }
            ScriptTemplate::Pkhxr90d60d => {
                if Script::is_pkhxr_90d_60d_expired(self.working_block_num, prev_block_num) {
                    Ok((Script::from_pkhxr_expired_input(), PKHX_90D_LOCK_REL))
                } else {
                    Ok((Script::from_pkhxr_unexpired_input_placeholder(), 0))
                }
            }
            ScriptTemplate::Pkhxr1h40m => {
                if Script::is_pkhxr_1h_40m_expired(self.working_block_num, prev_block_num) {
                    Ok((Script::from_pkhxr_expired_input(), PKHX_1H_LOCK_REL))
                } else {
                    Ok((Script::from_pkhxr_unexpired_input_placeholder(), 0))
                }
            }
            ScriptTemplate::Unknown => Err(TransactionError::UnsupportedScriptType),
        }
    }

    /// Produces the unsigned transaction.
    pub fn build(&self) -> Result<Tx, TransactionError> {
        let total_out: u64 = self.outputs.iter().map(|o| o.value).sum();

        let mut candidates: Vec<(&String, &crate::tx_out_bn::TxOutBn)> =
            self.tx_out_bn_map.iter().collect();
        candidates.sort_by(|a, b| (a.1.block_num, a.0).cmp(&(b.1.block_num, b.0)));

        let mut inputs = Vec::new();
        let mut input_amount: u64 = 0;
        for (name, tx_out_bn) in candidates {
            if input_amount >= total_out {
                break;
            }
            let prev_tx_id = TxOutBnMap::name_to_tx_id(name)?;
            let prev_out_index = TxOutBnMap::name_to_out_index(name)?;
            let (unlocking_script, lock_rel) =
                self.placeholder_for(&tx_out_bn.tx_out.locking_script, tx_out_bn.block_num)?;
            inputs.push(TxIn::new(prev_tx_id, prev_out_index, unlocking_script, lock_rel));
            input_amount += tx_out_bn.tx_out.value;
        }

        if input_amount < total_out {
            return Err(TransactionError::NotEnoughFunds {
                needed: total_out,
                available: input_amount,
            });
        }

        let mut outputs = self.outputs.clone();
        if input_amount > total_out {
            outputs.push(TxOut::new(input_amount - total_out, self.change_script.clone()));
        }

        Ok(Tx::new(TX_VERSION, inputs, outputs, self.lock_abs))
    }
}
