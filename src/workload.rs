//! Workload generation: the sanity round trip and the timed request loop.

use crate::backends::StorageClient;
use crate::{BenchConfig, BenchError, BenchResult, LatencyRecorder, OpKind};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::time::Instant;

/// Single shared key: the workload measures raw per-operation latency, not
/// key-space scaling or cache pressure.
pub const BENCH_KEY: &str = "foo";

pub struct WorkloadGenerator {
    ratio: f64,
    requests: u64,
    payload: Vec<u8>,
    rng: ChaCha8Rng,
}

impl WorkloadGenerator {
    pub fn new(cfg: &BenchConfig) -> Self {
        Self::with_rng(cfg, ChaCha8Rng::from_entropy())
    }

    pub fn with_rng(cfg: &BenchConfig, rng: ChaCha8Rng) -> Self {
        Self {
            ratio: cfg.ratio,
            requests: cfg.requests,
            payload: cfg.payload.clone(),
            rng,
        }
    }

    /// Round-trip the payload once before any timing begins. A byte-level
    /// mismatch would invalidate every subsequent measurement, so it aborts
    /// the whole benchmark.
    pub fn sanity_check(&self, client: &mut dyn StorageClient) -> BenchResult<()> {
        client.delete(BENCH_KEY)?;
        client.set(BENCH_KEY, &self.payload, None)?;
        let roundtrip = client.get(BENCH_KEY)?;
        match roundtrip {
            Some(v) if v == self.payload => Ok(()),
            Some(v) => Err(BenchError::SanityCheck(format!(
                "payload mismatch on {}: sent {} bytes, got {} bytes back",
                client.name(),
                self.payload.len(),
                v.len()
            ))),
            None => Err(BenchError::SanityCheck(format!(
                "{} returned no value for key {:?}",
                client.name(),
                BENCH_KEY
            ))),
        }
    }

    /// Issue the configured number of requests sequentially, timing each
    /// operation with the monotonic clock. Only the client call itself is
    /// inside the measured window.
    pub fn run(
        &mut self,
        client: &mut dyn StorageClient,
    ) -> BenchResult<HashMap<OpKind, LatencyRecorder>> {
        let mut recorders: HashMap<OpKind, LatencyRecorder> = HashMap::new();
        for _ in 0..self.requests {
            let r: f64 = self.rng.gen();
            if r < self.ratio {
                let start = Instant::now();
                client.set(BENCH_KEY, &self.payload, None)?;
                recorders
                    .entry(OpKind::Set)
                    .or_default()
                    .record(start.elapsed());
            } else {
                let start = Instant::now();
                client.get(BENCH_KEY)?;
                recorders
                    .entry(OpKind::Get)
                    .or_default()
                    .record(start.elapsed());
            }
        }
        Ok(recorders)
    }
}
