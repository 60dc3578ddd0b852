//! Embedded LMDB adapter (via heed).
//!
//! Every operation runs in its own implicit transaction. Durability is
//! disabled (NO_SYNC | NO_META_SYNC) to measure raw engine throughput rather
//! than persistence cost. The storage directory is wiped on open so the
//! benchmark always starts from an empty store.

use crate::backends::StorageClient;
use crate::{BenchError, BenchResult};
use heed::types::Bytes;
use heed::{Database, Env, EnvFlags, EnvOpenOptions};
use std::fs;
use std::path::Path;

const MAP_SIZE: usize = 2 * 1024 * 1024 * 1024;

pub struct LmdbClient {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl LmdbClient {
    pub fn open(dir: &Path) -> BenchResult<Self> {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(MAP_SIZE)
                .max_dbs(1)
                .flags(EnvFlags::NO_SYNC | EnvFlags::NO_META_SYNC)
                .open(dir)
                .map_err(|e| BenchError::Backend(format!("lmdb open: {}", e)))?
        };

        let mut wtxn = env
            .write_txn()
            .map_err(|e| BenchError::Backend(format!("lmdb txn: {}", e)))?;
        let db = env
            .create_database(&mut wtxn, Some("db"))
            .map_err(|e| BenchError::Backend(format!("lmdb create db: {}", e)))?;
        wtxn.commit()
            .map_err(|e| BenchError::Backend(format!("lmdb commit: {}", e)))?;

        Ok(Self { env, db })
    }
}

impl StorageClient for LmdbClient {
    fn name(&self) -> &'static str {
        "lmdb"
    }

    fn get(&mut self, key: &str) -> BenchResult<Option<Vec<u8>>> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| BenchError::Backend(format!("lmdb txn: {}", e)))?;
        let value = self
            .db
            .get(&rtxn, key.as_bytes())
            .map_err(|e| BenchError::Backend(format!("lmdb get: {}", e)))?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn set(&mut self, key: &str, value: &[u8], _ttl: Option<u32>) -> BenchResult<()> {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| BenchError::Backend(format!("lmdb txn: {}", e)))?;
        self.db
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(|e| BenchError::Backend(format!("lmdb put: {}", e)))?;
        wtxn.commit()
            .map_err(|e| BenchError::Backend(format!("lmdb commit: {}", e)))?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> BenchResult<()> {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| BenchError::Backend(format!("lmdb txn: {}", e)))?;
        // Returns false for an absent key; delete-before-set must not fail.
        self.db
            .delete(&mut wtxn, key.as_bytes())
            .map_err(|e| BenchError::Backend(format!("lmdb delete: {}", e)))?;
        wtxn.commit()
            .map_err(|e| BenchError::Backend(format!("lmdb commit: {}", e)))?;
        Ok(())
    }
}
