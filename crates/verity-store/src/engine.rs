//! In-memory content-addressed storage engine.

use parking_lot::RwLock;
use std::collections::HashMap;
use verity_crypto::content_hash;
use verity_types::ContentHash;

/// Content-addressed blob map.
///
/// Keys are derived from the stored bytes, so a put is idempotent: storing
/// the same bytes twice yields the same address and leaves one copy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<ContentHash, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes and return their content address.
    pub fn put(&self, bytes: &[u8]) -> ContentHash {
        let hash = content_hash(bytes);
        self.blobs.write().insert(hash, bytes.to_vec());
        hash
    }

    /// Fetch the bytes stored under a content address.
    #[must_use]
    pub fn get(&self, hash: &ContentHash) -> Option<Vec<u8>> {
        self.blobs.read().get(hash).cloned()
    }

    /// Whether a blob is stored under the given address.
    #[must_use]
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.blobs.read().contains_key(hash)
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Whether the store holds no blobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}
