//! Memcached adapter (via rust-memcache, binary protocol).
//!
//! Connects over TCP or a UNIX domain socket with 1-second timeouts and
//! nodelay. Values travel as raw bytes; no serialization codec is involved.

use crate::backends::StorageClient;
use crate::{BenchConfig, BenchError, BenchResult};
use std::time::Duration;

pub struct MemcachedClient {
    client: memcache::Client,
}

impl MemcachedClient {
    pub fn connect(cfg: &BenchConfig) -> BenchResult<Self> {
        let addr = match &cfg.socket {
            Some(socket) => format!("memcache://{}?protocol=binary", socket),
            None => format!(
                "memcache+tcp://{}:{}?protocol=binary&tcp_nodelay=true&timeout=1",
                cfg.server, cfg.port
            ),
        };
        let client = memcache::connect(addr)
            .map_err(|e| BenchError::Backend(format!("memcached connect: {}", e)))?;
        client
            .set_read_timeout(Some(Duration::from_secs(1)))
            .map_err(|e| BenchError::Backend(format!("memcached read timeout: {}", e)))?;
        client
            .set_write_timeout(Some(Duration::from_secs(1)))
            .map_err(|e| BenchError::Backend(format!("memcached write timeout: {}", e)))?;
        Ok(Self { client })
    }
}

impl StorageClient for MemcachedClient {
    fn name(&self) -> &'static str {
        "memcached"
    }

    fn get(&mut self, key: &str) -> BenchResult<Option<Vec<u8>>> {
        self.client
            .get::<Vec<u8>>(key)
            .map_err(|e| BenchError::Backend(format!("memcached get: {}", e)))
    }

    fn set(&mut self, key: &str, value: &[u8], ttl: Option<u32>) -> BenchResult<()> {
        self.client
            .set(key, value, ttl.unwrap_or(0))
            .map_err(|e| BenchError::Backend(format!("memcached set: {}", e)))
    }

    fn delete(&mut self, key: &str) -> BenchResult<()> {
        // Returns false for an absent key, which is fine here.
        self.client
            .delete(key)
            .map(|_| ())
            .map_err(|e| BenchError::Backend(format!("memcached delete: {}", e)))
    }
}
