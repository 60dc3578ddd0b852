//! Shared types, configuration and latency recording for kvbench.

pub mod backends;
pub mod report;
pub mod runner;
pub mod workload;

use hdrhistogram::Histogram;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::backends::BackendKind;

// ────────────────────────────────────────────────────────────────────────────────
// Error type
// ────────────────────────────────────────────────────────────────────────────────

pub type BenchResult<T> = std::result::Result<T, BenchError>;

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("sanity check failed: {0}")]
    SanityCheck(String),
}

// ────────────────────────────────────────────────────────────────────────────────
// Histogram bounds
// ────────────────────────────────────────────────────────────────────────────────

/// Smallest latency (µs) the histogram discerns; lower samples clamp here.
pub const LATENCY_HDR_MIN_VALUE: u64 = 10;
/// Largest trackable latency (µs); higher samples saturate here.
pub const LATENCY_HDR_MAX_VALUE: u64 = 60_000_000;
/// Significant decimal digits of histogram precision.
pub const LATENCY_HDR_SIGDIGITS: u8 = 3;

/// Bucket layout implied by the bounds above, reported in the footer so
/// readers can reproduce the precision claims.
pub const HDR_BUCKETS: u32 = 13;
pub const HDR_SUB_BUCKETS: u32 = 2048;

// ────────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────────

/// Validated benchmark configuration. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of full benchmark runs.
    pub runs: u32,
    /// Number of requests per run.
    pub requests: u64,
    /// Payload size in bytes.
    pub data: usize,
    /// Probability of a SET per request; the rest are GETs.
    pub ratio: f64,
    /// Which storage backend to drive.
    pub backend: BackendKind,
    /// Memcached server address.
    pub server: String,
    /// Memcached server port.
    pub port: u16,
    /// UNIX domain socket path, overrides server/port when set.
    pub socket: Option<String>,
    /// Directory for the embedded store; wiped on every invocation.
    pub store_dir: PathBuf,
    /// Output prefix for percentile report files.
    pub out_prefix: Option<String>,
    /// Fixed payload written by every SET, `data` repeated bytes.
    pub payload: Vec<u8>,
}

impl BenchConfig {
    /// Check the numeric arguments before any backend connection is made.
    pub fn validate(&self) -> BenchResult<()> {
        if self.runs == 0 {
            return Err(BenchError::Config(
                "runs must be a positive integer".into(),
            ));
        }
        if self.requests == 0 {
            return Err(BenchError::Config(
                "requests must be a positive integer".into(),
            ));
        }
        if self.data == 0 {
            return Err(BenchError::Config(
                "data must be a positive integer".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ratio) {
            return Err(BenchError::Config(format!(
                "ratio must be within [0, 1], got {}",
                self.ratio
            )));
        }
        Ok(())
    }

    /// Derive the fixed payload from the configured size.
    pub fn make_payload(data: usize) -> Vec<u8> {
        vec![b'x'; data]
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Operation kinds
// ────────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Set,
    Get,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Set => "SET",
            OpKind::Get => "GET",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Latency recorder (HDR histogram)
// ────────────────────────────────────────────────────────────────────────────────

/// One histogram per operation kind per run. Samples land in microseconds;
/// out-of-range values clamp to the bounds rather than being dropped.
pub struct LatencyRecorder {
    hist: Histogram<u64>,
    total_us: u64,
    ops: u64,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self {
            hist: Histogram::<u64>::new_with_bounds(
                LATENCY_HDR_MIN_VALUE,
                LATENCY_HDR_MAX_VALUE,
                LATENCY_HDR_SIGDIGITS,
            )
            .unwrap(),
            total_us: 0,
            ops: 0,
        }
    }

    /// Record one completed operation.
    #[inline(always)]
    pub fn record(&mut self, elapsed: Duration) {
        let us = elapsed.as_micros() as u64;
        self.hist.saturating_record(us.max(LATENCY_HDR_MIN_VALUE));
        self.total_us += us;
        self.ops += 1;
    }

    pub fn ops(&self) -> u64 {
        self.ops
    }

    pub fn total_us(&self) -> u64 {
        self.total_us
    }

    pub fn histogram(&self) -> &Histogram<u64> {
        &self.hist
    }
}

impl Default for LatencyRecorder {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Per-run statistics
// ────────────────────────────────────────────────────────────────────────────────

/// Aggregated result for one operation kind within one run.
///
/// KB/s and Gb/s are derived from ops/sec and the configured payload size,
/// never measured directly.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub ops: u64,
    pub total_us: u64,
    pub ops_per_sec: f64,
    pub kb_per_sec: f64,
    pub gb_per_sec: f64,
    pub p99_us: u64,
    pub histogram: Histogram<u64>,
}

impl RunResult {
    pub fn from_recorder(rec: &LatencyRecorder, payload_bytes: usize) -> Self {
        let total_secs = rec.total_us() as f64 / 1_000_000.0;
        let ops_per_sec = if rec.total_us() > 0 {
            rec.ops() as f64 / total_secs
        } else {
            0.0
        };
        Self {
            ops: rec.ops(),
            total_us: rec.total_us(),
            ops_per_sec,
            kb_per_sec: payload_bytes as f64 * ops_per_sec / 1000.0,
            gb_per_sec: payload_bytes as f64 * 8.0 * ops_per_sec / 1_000_000_000.0,
            p99_us: rec.histogram().value_at_quantile(0.99),
            histogram: rec.histogram().clone(),
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ops {}; total {}ms; ops/sec {:.2}; p99: {}µs, KBps {:.2}; Gbps {:.2}",
            self.ops,
            self.total_us / 1000,
            self.ops_per_sec,
            self.p99_us,
            self.kb_per_sec,
            self.gb_per_sec
        )
    }
}
