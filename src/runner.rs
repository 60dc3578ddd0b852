//! Multi-run driver: repeats the workload and folds per-kind best/worst
//! throughput across runs.

use crate::backends::StorageClient;
use crate::workload::WorkloadGenerator;
use crate::{BenchConfig, BenchResult, OpKind, RunResult};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::{thread, time::Duration};

/// Per operation kind, the run with the lowest and the highest ops/sec seen
/// so far. After k observed runs, `worst ≤ every run's ops/sec ≤ best`.
#[derive(Debug, Default)]
pub struct BestWorstTracker {
    worst: HashMap<OpKind, RunResult>,
    best: HashMap<OpKind, RunResult>,
}

impl BestWorstTracker {
    pub fn observe(&mut self, kind: OpKind, result: RunResult) {
        match self.worst.entry(kind) {
            Entry::Occupied(mut e) => {
                if result.ops_per_sec < e.get().ops_per_sec {
                    e.insert(result.clone());
                }
            }
            Entry::Vacant(e) => {
                e.insert(result.clone());
            }
        }
        match self.best.entry(kind) {
            Entry::Occupied(mut e) => {
                if result.ops_per_sec > e.get().ops_per_sec {
                    e.insert(result);
                }
            }
            Entry::Vacant(e) => {
                e.insert(result);
            }
        }
    }

    pub fn worst(&self) -> &HashMap<OpKind, RunResult> {
        &self.worst
    }

    pub fn best(&self) -> &HashMap<OpKind, RunResult> {
        &self.best
    }
}

/// Execute the configured number of runs sequentially against one client.
///
/// Each run starts with the sanity round trip, then the timed loop. A fixed
/// one-second pause separates consecutive runs so backend-side transient
/// state settles before the next measurement.
pub fn run_benchmark(
    cfg: &BenchConfig,
    client: &mut dyn StorageClient,
) -> BenchResult<BestWorstTracker> {
    let mut tracker = BestWorstTracker::default();
    let mut gen = WorkloadGenerator::new(cfg);

    for i in 1..=cfg.runs {
        println!("RUN: {i}");
        gen.sanity_check(client)?;
        let recorders = gen.run(client)?;
        for (kind, rec) in recorders {
            tracker.observe(kind, RunResult::from_recorder(&rec, cfg.data));
        }
        if i < cfg.runs {
            thread::sleep(Duration::from_secs(1));
        }
    }

    Ok(tracker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LatencyRecorder;
    use std::time::Duration as StdDuration;

    fn result_with_ops_per_sec(us_per_op: u64, ops: u64) -> RunResult {
        let mut rec = LatencyRecorder::new();
        for _ in 0..ops {
            rec.record(StdDuration::from_micros(us_per_op));
        }
        RunResult::from_recorder(&rec, 16)
    }

    #[test]
    fn single_run_yields_identical_best_and_worst() {
        let mut tracker = BestWorstTracker::default();
        tracker.observe(OpKind::Get, result_with_ops_per_sec(100, 50));

        let worst = &tracker.worst()[&OpKind::Get];
        let best = &tracker.best()[&OpKind::Get];
        assert_eq!(worst.ops, best.ops);
        assert_eq!(worst.ops_per_sec, best.ops_per_sec);
    }

    #[test]
    fn tracker_bounds_are_monotonic() {
        let runs = [
            result_with_ops_per_sec(1000, 10), // 1000 ops/sec
            result_with_ops_per_sec(100, 10),  // 10000 ops/sec
            result_with_ops_per_sec(500, 10),  // 2000 ops/sec
        ];
        let mut tracker = BestWorstTracker::default();
        for r in &runs {
            tracker.observe(OpKind::Set, r.clone());
        }

        let worst = tracker.worst()[&OpKind::Set].ops_per_sec;
        let best = tracker.best()[&OpKind::Set].ops_per_sec;
        for r in &runs {
            assert!(worst <= r.ops_per_sec);
            assert!(best >= r.ops_per_sec);
        }
    }

    #[test]
    fn kinds_are_tracked_independently() {
        let mut tracker = BestWorstTracker::default();
        tracker.observe(OpKind::Set, result_with_ops_per_sec(100, 10));
        tracker.observe(OpKind::Get, result_with_ops_per_sec(200, 10));

        assert_eq!(tracker.worst().len(), 2);
        assert_eq!(tracker.best().len(), 2);
        assert!(
            tracker.best()[&OpKind::Set].ops_per_sec > tracker.best()[&OpKind::Get].ops_per_sec
        );
    }
}
