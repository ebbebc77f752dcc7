use proptest::prelude::*;

use ebx_script::{Script, ScriptChunk};
use ebx_transaction::header::Header;
use ebx_transaction::sighash::{self, HashCache, SIGHASH_ALL};
use ebx_transaction::{Tx, TxIn, TxOut};

fn arb_script() -> impl Strategy<Value = Script> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 0..4)
        .prop_map(|pushes| {
            Script::new(
                pushes
                    .into_iter()
                    .map(|data| ScriptChunk::from_data(data).unwrap())
                    .collect(),
            )
        })
}

fn arb_tx_in() -> impl Strategy<Value = TxIn> {
    (
        prop::array::uniform32(any::<u8>()),
        any::<u32>(),
        arb_script(),
        any::<u32>(),
    )
        .prop_map(|(prev_tx_id, prev_out_index, script, lock_rel)| {
            TxIn::new(prev_tx_id, prev_out_index, script, lock_rel)
        })
}

fn arb_tx_out() -> impl Strategy<Value = TxOut> {
    (any::<u64>(), arb_script()).prop_map(|(value, script)| TxOut::new(value, script))
}

fn arb_tx() -> impl Strategy<Value = Tx> {
    (
        prop::collection::vec(arb_tx_in(), 1..4),
        prop::collection::vec(arb_tx_out(), 0..4),
        any::<u64>(),
    )
        .prop_map(|(inputs, outputs, lock_abs)| Tx::new(1, inputs, outputs, lock_abs))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tx_in_roundtrip(tx_in in arb_tx_in()) {
        let bytes = tx_in.to_bytes();
        prop_assert_eq!(bytes.len(), tx_in.size());
        let mut reader = ebx_primitives::util::ByteReader::new(&bytes);
        prop_assert_eq!(TxIn::from_reader(&mut reader).unwrap(), tx_in);
        prop_assert!(reader.eof());
    }

    #[test]
    fn tx_out_roundtrip(tx_out in arb_tx_out()) {
        let bytes = tx_out.to_bytes();
        prop_assert_eq!(bytes.len(), tx_out.size());
        let mut reader = ebx_primitives::util::ByteReader::new(&bytes);
        prop_assert_eq!(TxOut::from_reader(&mut reader).unwrap(), tx_out);
        prop_assert!(reader.eof());
    }

    #[test]
    fn tx_roundtrip(tx in arb_tx()) {
        let bytes = tx.to_bytes();
        prop_assert_eq!(bytes.len(), tx.size());
        prop_assert_eq!(Tx::from_bytes(&bytes).unwrap(), tx);
    }

    #[test]
    fn header_roundtrip(
        prev_block_id in prop::array::uniform32(any::<u8>()),
        merkle_root in prop::array::uniform32(any::<u8>()),
        timestamp in any::<u64>(),
        block_num in any::<u32>(),
        target in prop::array::uniform32(any::<u8>()),
        nonce in prop::array::uniform32(any::<u8>()),
    ) {
        let header = Header {
            version: 1,
            prev_block_id,
            merkle_root,
            timestamp,
            block_num,
            target,
            nonce,
        };
        prop_assert_eq!(Header::from_bytes(&header.to_bytes()).unwrap(), header);
    }

    /// ECDSA signatures vary per run, but both of two independent
    /// signatures over the same digest must verify.
    #[test]
    fn sighash_determinism(tx in arb_tx(), value in any::<u64>()) {
        let key_pair = ebx_primitives::ec::KeyPair::from_random();
        let sub_script = [0x76u8, 0xaa, 0x88, 0xac];

        let digest_a = sighash::signature_hash(
            &tx, 0, &sub_script, value, SIGHASH_ALL, &mut HashCache::new(),
        ).unwrap();
        let digest_b = sighash::signature_hash(
            &tx, 0, &sub_script, value, SIGHASH_ALL, &mut HashCache::new(),
        ).unwrap();
        prop_assert_eq!(digest_a, digest_b);

        let sig_a = key_pair.priv_key().sign_digest(&digest_a).unwrap();
        let sig_b = key_pair.priv_key().sign_digest(&digest_b).unwrap();
        prop_assert!(key_pair.pub_key().verify_digest(&digest_a, &sig_a));
        prop_assert!(key_pair.pub_key().verify_digest(&digest_a, &sig_b));
    }
}
