//! # Persisted Wire Format Tests
//!
//! The value stored under a block hash must be exactly the block layout:
//!
//! ```text
//! version(4) | prev(32) | merkle(32) | timestamp(4) | bits(4) | nonce(4)
//! | varint(tx_count) | transactions...
//! ```

#[cfg(test)]
mod tests {
    use mc_01_block_production::domain::genesis_coinbase_tx;
    use mc_01_block_production::{BlockAssembler, FixedTimeSource, PoWConfig, EASY_BITS};
    use mc_02_block_storage::{ChainStore, FileBackedKVStore, KeyValueStore, TIP_KEY};
    use shared_types::{encode_var_int, Block, Transaction, TxIn, TxOut, HEADER_SIZE};
    use tempfile::TempDir;

    fn assembler() -> BlockAssembler<FixedTimeSource> {
        BlockAssembler::new(PoWConfig::with_bits(EASY_BITS), FixedTimeSource(0x6553_f100))
    }

    #[test]
    fn test_transaction_layout() {
        let tx = Transaction::new(
            1,
            vec![TxIn {
                prev_tx_id: [0x11; 32],
                prev_out_index: 2,
                unlock_script: vec![0xaa, 0xbb],
                sequence: 0xffff_ffff,
            }],
            vec![TxOut::new(5, vec![0xcc])],
            0,
        );

        let mut expected = vec![0x01, 0x00, 0x00, 0x00, 0x01];
        expected.extend_from_slice(&[0x11; 32]);
        expected.extend_from_slice(&[0x02, 0x00, 0x00, 0x00]);
        expected.extend_from_slice(&[0x02, 0xaa, 0xbb]);
        expected.extend_from_slice(&[0xff; 4]);
        expected.push(0x01);
        expected.extend_from_slice(&[0x05, 0, 0, 0, 0, 0, 0, 0]);
        expected.extend_from_slice(&[0x01, 0xcc]);
        expected.extend_from_slice(&[0x00; 4]);

        assert_eq!(tx.serialize(), expected);
    }

    #[test]
    fn test_stored_block_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocks_wire");

        let mut chain: ChainStore<FileBackedKVStore, _> =
            ChainStore::initialize_with_address(&path, "alice", assembler()).unwrap();
        let block = chain.append_block(vec![genesis_coinbase_tx("bob")]).unwrap();
        let kv = chain.close();

        let stored = kv.get(&block.hash()).unwrap().unwrap();
        let header = &block.header;
        assert_eq!(&stored[0..4], &header.version.to_le_bytes());
        assert_eq!(&stored[4..36], &header.prev_block_hash);
        assert_eq!(&stored[36..68], &header.merkle_root);
        assert_eq!(&stored[68..72], &0x6553_f100u32.to_le_bytes());
        assert_eq!(&stored[72..76], &EASY_BITS.to_le_bytes());
        assert_eq!(&stored[76..80], &header.nonce.to_le_bytes());
        assert_eq!(stored[HEADER_SIZE..HEADER_SIZE + 1], encode_var_int(1)[..]);
        assert_eq!(&stored[HEADER_SIZE + 1..], block.transactions[0].serialize().as_slice());

        assert_eq!(Block::deserialize(&stored, 1).unwrap(), block);
        assert_eq!(kv.get(TIP_KEY).unwrap(), Some(block.hash().to_vec()));
    }

    #[test]
    fn test_reopened_raw_store_keeps_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocks_raw");

        let chain: ChainStore<FileBackedKVStore, _> =
            ChainStore::initialize_with_address(&path, "alice", assembler()).unwrap();
        let tip = chain.tip().hash;
        let genesis = chain.get_block(&tip).unwrap();
        drop(chain);

        let kv = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(kv.get(&tip).unwrap(), Some(genesis.serialize()));
    }
}
