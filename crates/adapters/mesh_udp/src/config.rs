//! UDP mesh adapter configuration.

use serde::Deserialize;

/// Peer table size of the radio (the ESP-NOW limit).
pub const DEFAULT_MAX_PEERS: usize = 20;

/// Configuration for the radio link.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Local `host:port` the gateway listens on for radio datagrams.
    pub bind: String,
    /// `host:port` of the radio co-processor.
    pub radio: String,
    /// Maximum number of peers the radio can unicast to.
    pub max_peers: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:4210".to_string(),
            radio: "127.0.0.1:4211".to_string(),
            max_peers: DEFAULT_MAX_PEERS,
        }
    }
}
