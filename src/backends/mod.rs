//! Storage backend abstraction.
//!
//! Both backends expose the same minimal contract: `get` returns `None` for
//! an absent key, `delete` of an absent key is a no-op success, and values
//! are opaque byte payloads.

pub mod lmdb;
pub mod memcached;

use crate::{BenchConfig, BenchResult};

/// Uniform contract over the benchmarked backends. One client is created per
/// invocation and reused across all runs.
pub trait StorageClient {
    fn name(&self) -> &'static str;

    /// Fetch a value. An absent key is `None`, never an error.
    fn get(&mut self, key: &str) -> BenchResult<Option<Vec<u8>>>;

    /// Store a value. TTL is backend-defined; the embedded store ignores it.
    fn set(&mut self, key: &str, value: &[u8], ttl: Option<u32>) -> BenchResult<()>;

    /// Remove a key. Deleting an absent key must succeed.
    fn delete(&mut self, key: &str) -> BenchResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    /// Network cache over the memcached binary protocol.
    Memcached,
    /// Embedded transactional memory-mapped store.
    Lmdb,
}

/// Build the configured backend client.
pub fn connect(cfg: &BenchConfig) -> BenchResult<Box<dyn StorageClient>> {
    match cfg.backend {
        BackendKind::Memcached => Ok(Box::new(memcached::MemcachedClient::connect(cfg)?)),
        BackendKind::Lmdb => Ok(Box::new(lmdb::LmdbClient::open(&cfg.store_dir)?)),
    }
}
