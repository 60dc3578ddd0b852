//! End-to-end scenarios against the embedded LMDB backend.

use kvbench::backends::lmdb::LmdbClient;
use kvbench::backends::{BackendKind, StorageClient};
use kvbench::{runner, BenchConfig, OpKind};
use std::path::Path;
use tempfile::TempDir;

fn config(ratio: f64, requests: u64, runs: u32, store_dir: &Path) -> BenchConfig {
    BenchConfig {
        runs,
        requests,
        data: 16,
        ratio,
        backend: BackendKind::Lmdb,
        server: "127.0.0.1".into(),
        port: 11211,
        socket: None,
        store_dir: store_dir.to_path_buf(),
        out_prefix: None,
        payload: BenchConfig::make_payload(16),
    }
}

#[test]
fn lmdb_round_trip_and_absent_key_semantics() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("store");
    let mut client = LmdbClient::open(&dir).unwrap();

    // Absent key is None, and deleting it is a no-op success.
    assert_eq!(client.get("missing").unwrap(), None);
    client.delete("missing").unwrap();

    client.set("k", b"value", None).unwrap();
    assert_eq!(client.get("k").unwrap().as_deref(), Some(&b"value"[..]));

    client.delete("k").unwrap();
    assert_eq!(client.get("k").unwrap(), None);
}

#[test]
fn lmdb_open_starts_from_an_empty_store() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("store");

    {
        let mut client = LmdbClient::open(&dir).unwrap();
        client.set("persisted", b"old", None).unwrap();
    }

    // Reopening wipes the directory.
    let mut client = LmdbClient::open(&dir).unwrap();
    assert_eq!(client.get("persisted").unwrap(), None);
}

#[test]
fn read_only_workload_records_exactly_the_requested_gets() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("store");
    let cfg = config(0.0, 100, 1, &dir);
    let mut client = LmdbClient::open(&dir).unwrap();

    let tracker = runner::run_benchmark(&cfg, &mut client).unwrap();

    let best: Vec<_> = tracker.best().keys().collect();
    let worst: Vec<_> = tracker.worst().keys().collect();
    assert_eq!(best, vec![&OpKind::Get]);
    assert_eq!(worst, vec![&OpKind::Get]);
    assert_eq!(tracker.best()[&OpKind::Get].ops, 100);
    assert_eq!(tracker.worst()[&OpKind::Get].ops, 100);
}

#[test]
fn write_only_workload_over_two_runs_orders_best_and_worst() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("store");
    let cfg = config(1.0, 50, 2, &dir);
    let mut client = LmdbClient::open(&dir).unwrap();

    let tracker = runner::run_benchmark(&cfg, &mut client).unwrap();

    assert_eq!(tracker.best().len(), 1);
    let best = &tracker.best()[&OpKind::Set];
    let worst = &tracker.worst()[&OpKind::Set];
    assert_eq!(best.ops, 50);
    assert_eq!(worst.ops, 50);
    assert!(best.ops_per_sec >= worst.ops_per_sec);
}
