use std::path::PathBuf;

use serde::Deserialize;

/// Where a node keeps its chain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Parent directory for per-node stores.
    pub data_dir: PathBuf,
    /// Node identifier; each node gets its own store.
    pub node_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./tmp"),
            node_id: "node_1".to_string(),
        }
    }
}

impl StoreConfig {
    /// `<data_dir>/blocks_<node_id>`
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("blocks_{}", self.node_id))
    }
}
