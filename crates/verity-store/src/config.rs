//! Blob store service configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Default listen port for the blob store service.
pub const DEFAULT_PORT: u16 = 4000;

/// Default maximum accepted blob size (10 MiB).
pub const DEFAULT_MAX_BLOB_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the blob store HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Port to listen on. Port 0 asks the OS for an ephemeral port.
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    pub max_blob_bytes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_blob_bytes: DEFAULT_MAX_BLOB_BYTES,
        }
    }
}

impl StoreConfig {
    /// Configuration for tests: ephemeral port, default limits.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            ..Self::default()
        }
    }

    /// The socket address the service binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }
}
