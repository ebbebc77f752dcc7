//! Unspent outputs keyed by `<tx_id_hex>:<index>`.

use std::collections::HashMap;

use crate::output::TxOut;
use crate::TransactionError;

/// An unspent output together with the block number that confirmed it.
/// The block number drives the expiry arithmetic of the time-gated
/// templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutBn {
    pub tx_out: TxOut,
    pub block_num: u32,
}

impl TxOutBn {
    pub fn new(tx_out: TxOut, block_num: u32) -> Self {
        TxOutBn { tx_out, block_num }
    }
}

/// A working view of spendable outputs for one build/sign/verify pass.
/// This is not the ledger UTXO set; callers populate it with whatever
/// outputs they are willing to spend.
#[derive(Debug, Clone, Default)]
pub struct TxOutBnMap {
    map: HashMap<String, TxOutBn>,
}

impl TxOutBnMap {
    pub fn new() -> Self {
        TxOutBnMap::default()
    }

    /// The map key for an output: `<tx_id_hex>:<index>`.
    pub fn name(tx_id: &[u8; 32], out_index: u32) -> String {
        format!("{}:{}", hex::encode(tx_id), out_index)
    }

    pub fn name_to_tx_id(name: &str) -> Result<[u8; 32], TransactionError> {
        let (tx_id_hex, _) = name
            .split_once(':')
            .ok_or_else(|| TransactionError::InvalidOutputName(name.to_string()))?;
        let bytes = hex::decode(tx_id_hex)
            .map_err(|_| TransactionError::InvalidOutputName(name.to_string()))?;
        bytes
            .try_into()
            .map_err(|_| TransactionError::InvalidOutputName(name.to_string()))
    }

    pub fn name_to_out_index(name: &str) -> Result<u32, TransactionError> {
        let (_, index) = name
            .split_once(':')
            .ok_or_else(|| TransactionError::InvalidOutputName(name.to_string()))?;
        index
            .parse()
            .map_err(|_| TransactionError::InvalidOutputName(name.to_string()))
    }

    pub fn add(&mut self, tx_id: &[u8; 32], out_index: u32, tx_out: TxOut, block_num: u32) {
        self.map.insert(Self::name(tx_id, out_index), TxOutBn::new(tx_out, block_num));
    }

    pub fn remove(&mut self, tx_id: &[u8; 32], out_index: u32) -> Option<TxOutBn> {
        self.map.remove(&Self::name(tx_id, out_index))
    }

    pub fn get(&self, tx_id: &[u8; 32], out_index: u32) -> Option<&TxOutBn> {
        self.map.get(&Self::name(tx_id, out_index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TxOutBn)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebx_script::Script;

    #[test]
    fn name_round_trip() {
        let tx_id = [0xabu8; 32];
        let name = TxOutBnMap::name(&tx_id, 7);
        assert_eq!(TxOutBnMap::name_to_tx_id(&name).unwrap(), tx_id);
        assert_eq!(TxOutBnMap::name_to_out_index(&name).unwrap(), 7);
    }

    #[test]
    fn malformed_names_are_rejected() {
        assert!(TxOutBnMap::name_to_tx_id("nocolon").is_err());
        assert!(TxOutBnMap::name_to_tx_id("zz:0").is_err());
        assert!(TxOutBnMap::name_to_tx_id("abcd:0").is_err());
        assert!(TxOutBnMap::name_to_out_index("abcd:notanumber").is_err());
    }

    #[test]
    fn add_get_remove() {
        let mut map = TxOutBnMap::new();
        let tx_id = [1u8; 32];
        map.add(&tx_id, 0, TxOut::new(100, Script::empty()), 5);
        assert_eq!(map.len(), 1);

        let tx_out_bn = map.get(&tx_id, 0).unwrap();
        assert_eq!(tx_out_bn.tx_out.value, 100);
        assert_eq!(tx_out_bn.block_num, 5);
        assert!(map.get(&tx_id, 1).is_none());

        assert!(map.remove(&tx_id, 0).is_some());
        assert!(map.is_empty());
    }
}
