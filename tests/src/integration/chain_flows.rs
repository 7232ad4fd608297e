//! # Chain Flow Integration Tests
//!
//! Drives block production (mc-01) and block storage (mc-02) together:
//!
//! 1. **Genesis → append → reopen**: height and tip survive a restart
//! 2. **Fees across blocks**: inputs resolve against stored transactions
//! 3. **Bounded mining**: a stopped search leaves the store untouched
//! 4. **Concurrent readers**: snapshot iteration from several threads

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use mc_01_block_production::domain::{genesis_coinbase_tx, new_coinbase_tx, COINBASE_REWARD};
    use mc_01_block_production::{
        validate, BlockAssembler, CancelFlag, Deadline, FixedTimeSource, PoWConfig, EASY_BITS,
    };
    use mc_02_block_storage::{
        ChainStore, FileBackedKVStore, InMemoryKVStore, KeyValueStore, StorageError, TIP_KEY,
    };
    use shared_types::{build_merkle_root, Block, Hash, Transaction, TxIn, TxOut, ZERO_HASH};
    use tempfile::TempDir;

    type FileChain = ChainStore<FileBackedKVStore, FixedTimeSource>;
    type MemoryChain = ChainStore<InMemoryKVStore, FixedTimeSource>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn assembler_with(bits: u32, check_interval: u64) -> BlockAssembler<FixedTimeSource> {
        BlockAssembler::new(
            PoWConfig {
                bits,
                check_interval,
            },
            FixedTimeSource(1_700_000_000),
        )
    }

    fn assembler() -> BlockAssembler<FixedTimeSource> {
        assembler_with(EASY_BITS, 1024)
    }

    fn spend(prev: &Transaction, index: u32, value: i64, to: &str) -> Transaction {
        Transaction::new(
            1,
            vec![TxIn {
                prev_tx_id: prev.id(),
                prev_out_index: index,
                unlock_script: b"sig".to_vec(),
                sequence: u32::MAX,
            }],
            vec![TxOut::new(value, to.as_bytes().to_vec())],
            0,
        )
    }

    fn collect(chain: &FileChain) -> Vec<Block> {
        chain.iterate().collect::<Result<_, _>>().unwrap()
    }

    // =============================================================================
    // GENESIS → APPEND → REOPEN
    // =============================================================================

    #[test]
    fn test_restart_keeps_chain() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocks_3000");

        let mut chain = FileChain::initialize_with_address(&path, "alice", assembler()).unwrap();
        for n in 0..4 {
            chain
                .append_block(vec![new_coinbase_tx("alice", &format!("round {n}"))])
                .unwrap();
        }
        let before = collect(&chain);
        chain.close();

        let chain = FileChain::open(&path, assembler()).unwrap();
        let after = collect(&chain);

        assert_eq!(before, after);
        assert_eq!(after.len(), 5);
        assert_eq!(chain.height(), 4);
        assert_eq!(chain.tip().hash, after[0].hash());
        assert_eq!(after[4].header.prev_block_hash, ZERO_HASH);

        for (block, expected_height) in after.iter().zip((0..=4u64).rev()) {
            assert_eq!(block.height, expected_height);
            assert!(validate(&block.header));
            assert_eq!(
                build_merkle_root(&block.transaction_ids()),
                Some(block.header.merkle_root)
            );
        }
    }

    // =============================================================================
    // FEES ACROSS BLOCKS
    // =============================================================================

    #[test]
    fn test_fee_resolves_against_stored_transactions() {
        let mut chain =
            MemoryChain::initialize_in(
                InMemoryKVStore::new(),
                assembler()
                    .assemble_genesis(genesis_coinbase_tx("alice"), EASY_BITS)
                    .unwrap(),
                assembler(),
            )
            .unwrap();

        let genesis_coinbase = chain.get_block(&chain.tip().hash).unwrap().transactions[0].clone();
        let payment = spend(&genesis_coinbase, 0, 7, "bob");
        let block = chain
            .append_block(vec![new_coinbase_tx("miner", ""), payment.clone()])
            .unwrap();
        assert_eq!(block.transactions[1].id(), payment.id());

        let resolved: HashMap<Hash, Transaction> = chain
            .iterate()
            .flat_map(|block| block.unwrap().transactions)
            .map(|tx| (tx.id(), tx))
            .collect();

        assert_eq!(payment.calculate_fee(&resolved).unwrap(), COINBASE_REWARD - 7);
        assert_eq!(block.transactions[0].calculate_fee(&resolved).unwrap(), -COINBASE_REWARD);
        assert!(spend(&genesis_coinbase, 1, 1, "bob")
            .calculate_fee(&resolved)
            .is_err());
    }

    // =============================================================================
    // BOUNDED MINING
    // =============================================================================

    #[test]
    fn test_deadline_bounds_append() {
        let genesis = assembler()
            .assemble_genesis(genesis_coinbase_tx("alice"), EASY_BITS)
            .unwrap();
        // target = 1: never met
        let mut chain =
            MemoryChain::initialize_in(InMemoryKVStore::new(), genesis, assembler_with(0x0300_0001, 256))
                .unwrap();
        let tip = chain.tip();

        let err = chain
            .append_block_with(
                vec![new_coinbase_tx("alice", "")],
                &Deadline::after(Duration::from_millis(20)),
            )
            .unwrap_err();

        assert!(matches!(err, StorageError::Production(_)));
        assert_eq!(chain.tip(), tip);
        let kv = chain.close();
        assert_eq!(kv.get(TIP_KEY).unwrap(), Some(tip.hash.to_vec()));
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let genesis = assembler()
            .assemble_genesis(genesis_coinbase_tx("alice"), EASY_BITS)
            .unwrap();
        let mut chain =
            MemoryChain::initialize_in(InMemoryKVStore::new(), genesis, assembler_with(0x0300_0001, 256))
                .unwrap();

        let flag = CancelFlag::new();
        let remote = flag.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let err = chain
            .append_block_with(vec![new_coinbase_tx("alice", "")], &flag)
            .unwrap_err();
        canceller.join().unwrap();

        assert!(matches!(err, StorageError::Production(_)));
        assert_eq!(chain.height(), 0);
    }

    // =============================================================================
    // CONCURRENT READERS
    // =============================================================================

    #[test]
    fn test_concurrent_iteration() {
        let genesis = assembler()
            .assemble_genesis(genesis_coinbase_tx("alice"), EASY_BITS)
            .unwrap();
        let mut chain = MemoryChain::initialize_in(InMemoryKVStore::new(), genesis, assembler()).unwrap();
        for n in 0..3 {
            chain
                .append_block(vec![new_coinbase_tx("bob", &n.to_string())])
                .unwrap();
        }

        let chain = &chain;
        let counts: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || chain.iterate().map(|b| b.unwrap()).count()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(counts, vec![4; 4]);
    }
}
