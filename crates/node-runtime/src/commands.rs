//! Node commands: create, extend and print the chain.

use std::io::Write;

use anyhow::{Context, Result};
use mc_01_block_production::domain::new_coinbase_tx;
use mc_01_block_production::{validate, BlockAssembler, SystemTimeSource, TimeSource};
use mc_02_block_storage::{ChainStore, FileBackedKVStore, KeyValueStore, StoreBackend};
use shared_types::Block;

use crate::config::{Backend, Command, NodeConfig};

/// Run the configured command, writing its report to `out`.
pub fn run(config: &NodeConfig, out: &mut dyn Write) -> Result<()> {
    config
        .pow
        .validate()
        .context("Invalid mining configuration")?;

    match config.backend {
        Backend::File => run_with::<FileBackedKVStore>(config, out),
        #[cfg(feature = "rocksdb")]
        Backend::RocksDb => run_with::<mc_02_block_storage::RocksDbStore>(config, out),
        #[cfg(not(feature = "rocksdb"))]
        Backend::RocksDb => anyhow::bail!("MC_BACKEND=rocksdb requires the `rocksdb` feature"),
    }
}

fn run_with<KV: StoreBackend>(config: &NodeConfig, out: &mut dyn Write) -> Result<()> {
    let path = config.store.path();
    let assembler = BlockAssembler::new(config.pow.clone(), SystemTimeSource);

    match config.command {
        Command::Init => {
            let chain = ChainStore::<KV, _>::initialize_with_address(&path, &config.address, assembler)
                .with_context(|| format!("Failed to create chain at {}", path.display()))?;
            writeln!(out, "Done! Genesis block {}", hex::encode(chain.tip().hash))?;
        }
        Command::Append => {
            let mut chain = ChainStore::<KV, _>::open(&path, assembler)
                .with_context(|| format!("Failed to open chain at {}", path.display()))?;
            let coinbase = new_coinbase_tx(&config.address, &config.data);
            let block = chain.append_block(vec![coinbase]).context("Failed to append block")?;
            writeln!(
                out,
                "Added block {} at height {}",
                hex::encode(block.hash()),
                block.height
            )?;
        }
        Command::Print => {
            let chain = ChainStore::<KV, _>::open(&path, assembler)
                .with_context(|| format!("Failed to open chain at {}", path.display()))?;
            print_chain(&chain, out)?;
        }
    }
    Ok(())
}

/// Write every block from tip to genesis.
pub fn print_chain<KV: KeyValueStore, TS: TimeSource>(
    chain: &ChainStore<KV, TS>,
    out: &mut dyn Write,
) -> Result<()> {
    for block in chain.iterate() {
        let block = block.context("Failed to read block")?;
        write!(out, "{}", format_block(&block))?;
    }
    Ok(())
}

/// One block as printed by `print`.
pub fn format_block(block: &Block) -> String {
    let mut text = format!(
        "============ Block {} ============\n\
         Height: {}\n\
         Prev. block: {}\n",
        hex::encode(block.hash()),
        block.height,
        hex::encode(block.header.prev_block_hash),
    );
    for id in block.transaction_ids() {
        text.push_str(&format!("Transaction: {}\n", hex::encode(id)));
    }
    text.push_str(&format!("PoW: {}\n\n", validate(&block.header)));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_01_block_production::EASY_BITS;
    use mc_02_block_storage::{StorageError, StoreConfig};
    use tempfile::TempDir;

    fn config(dir: &TempDir, command: Command) -> NodeConfig {
        let mut config = NodeConfig {
            store: StoreConfig {
                data_dir: dir.path().to_path_buf(),
                node_id: "test".to_string(),
            },
            command,
            address: "alice".to_string(),
            ..NodeConfig::default()
        };
        config.pow.bits = EASY_BITS;
        config
    }

    fn run_to_string(config: &NodeConfig) -> Result<String> {
        let mut out = Vec::new();
        run(config, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_init_append_print() {
        let dir = TempDir::new().unwrap();

        let init = run_to_string(&config(&dir, Command::Init)).unwrap();
        assert!(init.starts_with("Done! Genesis block "));

        let added = run_to_string(&config(&dir, Command::Append)).unwrap();
        assert!(added.ends_with("at height 1\n"));

        let printed = run_to_string(&config(&dir, Command::Print)).unwrap();
        assert_eq!(printed.matches("============ Block").count(), 2);
        assert!(printed.contains("Height: 1\n"));
        assert!(printed.contains(&format!("Prev. block: {}\n", "0".repeat(64))));
        assert_eq!(printed.matches("PoW: true").count(), 2);
    }

    #[test]
    fn test_print_before_init() {
        let dir = TempDir::new().unwrap();
        let err = run_to_string(&config(&dir, Command::Print)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn test_init_twice() {
        let dir = TempDir::new().unwrap();
        run_to_string(&config(&dir, Command::Init)).unwrap();
        let err = run_to_string(&config(&dir, Command::Init)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_invalid_bits_rejected_before_store() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir, Command::Init);
        config.pow.bits = 0x0100_0001;
        assert!(run_to_string(&config).is_err());
        assert!(!config.store.path().exists());
    }
}
