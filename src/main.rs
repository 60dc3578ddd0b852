//! kvbench — latency/throughput benchmark for key-value storage backends.
//!
//! Usage:
//!   kvbench -t memcached -s 127.0.0.1 -p 11211     # network cache
//!   kvbench -t lmdb --store-dir ./data/lmdb        # embedded store
//!   kvbench -r 0.1 -n 10000 -x 3 -o hdr            # 10% sets, report files

use clap::Parser;
use colored::Colorize;
use kvbench::backends::{self, BackendKind};
use kvbench::{report, runner, BenchConfig, BenchResult};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kvbench", about = "Key-value storage benchmark harness")]
struct Cli {
    /// Number of full test iterations.
    #[arg(short = 'x', long, default_value_t = 3)]
    runs: u32,

    /// Number of requests per run.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    requests: u64,

    /// Size of the data payload in bytes.
    #[arg(short = 'd', long, default_value_t = 100_000)]
    data: usize,

    /// Ratio of ops (eg. 0.1 == 10% sets && 90% gets).
    #[arg(short = 'r', long, default_value_t = 0.1)]
    ratio: f64,

    /// Storage backend to benchmark.
    #[arg(short = 't', long, value_enum, default_value_t = BackendKind::Memcached)]
    backend: BackendKind,

    /// Output prefix for percentile report files.
    #[arg(short = 'o', long)]
    out: Option<String>,

    /// Server address.
    #[arg(short = 's', long, default_value = "127.0.0.1")]
    server: String,

    /// Server port.
    #[arg(short = 'p', long, default_value_t = 11211)]
    port: u16,

    /// UNIX domain socket path, overrides server/port.
    #[arg(short = 'S', long)]
    socket: Option<String>,

    /// Directory for the embedded store; wiped on startup.
    #[arg(long, default_value = "./data/lmdb")]
    store_dir: PathBuf,
}

impl Cli {
    fn into_config(self) -> BenchResult<BenchConfig> {
        let payload = BenchConfig::make_payload(self.data);
        let cfg = BenchConfig {
            runs: self.runs,
            requests: self.requests,
            data: self.data,
            ratio: self.ratio,
            backend: self.backend,
            server: self.server,
            port: self.port,
            socket: self.socket,
            store_dir: self.store_dir,
            out_prefix: self.out,
            payload,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> BenchResult<()> {
    let cfg = Cli::parse().into_config()?;
    let mut client = backends::connect(&cfg)?;

    let tracker = runner::run_benchmark(&cfg, client.as_mut())?;

    println!("{}", "~~~~~~~~~~~~~~~~~~~RESULTS~~~~~~~~~~~~~~~~".bold());

    println!("\n{}", "WORST RESULT:".bold());
    for (op, r) in tracker.worst() {
        println!("OP: {op} \n {r}");
    }

    println!("\n{}", "BEST RESULT:".bold());
    for (op, r) in tracker.best() {
        println!("OP: {op} \n {r}");
        if let Some(prefix) = &cfg.out_prefix {
            let mut file = File::create(format!("{prefix}_{op}"))?;
            file.write_all(report::render(&r.histogram).as_bytes())?;
        }
    }

    Ok(())
}
