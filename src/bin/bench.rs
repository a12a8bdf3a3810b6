//! logkv Measurement Harness
//!
//! Writes random unique key-value pairs to a fresh log file, reads every one
//! back and reports timings.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use logkv::config::DEFAULT_BATCH_SYNC_BYTES;
use logkv::{Config, LogStore};
use rand::distr::{Alphanumeric, SampleString};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{fmt, EnvFilter};

/// logkv benchmark
#[derive(Parser, Debug)]
#[command(name = "logkv-bench")]
#[command(about = "Measure logkv write and read times")]
#[command(version)]
struct Args {
    /// Log file to create (must not exist yet)
    #[arg(short, long, global = true, default_value = "./tmp/logkv-bench.db")]
    file: PathBuf,

    /// Number of unique key-value pairs to write
    #[arg(short = 'n', long, global = true, default_value = "10000")]
    count: usize,

    /// Seed for data generation (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Keep the log file after the run
    #[arg(long, global = true)]
    keep: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Mode {
    /// One synced `set` per pair
    Set,

    /// A single `set_many` over all pairs
    SetMany {
        /// Appended bytes between syncs
        #[arg(long, default_value_t = DEFAULT_BATCH_SYNC_BYTES)]
        batch_bytes: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,logkv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("logkv-bench v{}", logkv::VERSION);
    tracing::info!("Log file: {}", args.file.display());

    if let Err(e) = run(&args) {
        tracing::error!("Benchmark failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> logkv::Result<()> {
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!("Generating {} pairs (seed {})", args.count, seed);
    let data = gen_data(args.count, seed);

    let batch_bytes = match args.mode {
        Mode::Set => DEFAULT_BATCH_SYNC_BYTES,
        Mode::SetMany { batch_bytes } => batch_bytes,
    };
    let config = Config::builder()
        .path(&args.file)
        .batch_sync_bytes(batch_bytes)
        .build();
    let mut store = LogStore::open(config)?;

    match args.mode {
        Mode::Set => {
            let mut times = Vec::with_capacity(data.len());
            let start = Instant::now();
            for (key, value) in &data {
                let one = Instant::now();
                store.set(key, value)?;
                times.push(one.elapsed());
            }
            tracing::info!("AVG TIME TO WRITE PER ENTRY: {:?}", average(&times));
            tracing::info!("TOTAL WRITE TIME: {:?}", start.elapsed());
        }
        Mode::SetMany { .. } => {
            let start = Instant::now();
            store.set_many(data.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
            let total = start.elapsed();
            tracing::info!("AVG TIME TO WRITE PER ENTRY: {:?}", per_entry(total, data.len()));
            tracing::info!("TOTAL WRITE TIME: {:?}", total);
        }
    }

    let mut times = Vec::with_capacity(data.len());
    let mut mismatches = 0usize;
    let start = Instant::now();
    for (key, value) in &data {
        let one = Instant::now();
        if store.get(key)?.as_deref() != Some(value.as_str()) {
            mismatches += 1;
        }
        times.push(one.elapsed());
    }
    tracing::info!("AVG GET TIME PER ENTRY: {:?}", average(&times));
    tracing::info!("TOTAL GET TIME: {:?}", start.elapsed());

    let stats = store.stats();
    tracing::info!(
        "Appended {} records ({} bytes) with {} syncs; {} mismatches",
        stats.records_appended,
        stats.bytes_appended,
        stats.syncs,
        mismatches
    );

    store.close()?;
    if !args.keep {
        std::fs::remove_file(&args.file)?;
    }

    if mismatches > 0 {
        tracing::warn!("{} values did not read back as written", mismatches);
    }
    Ok(())
}

/// Generate `count` pairs with unique, commit-hash-like keys
fn gen_data(count: usize, seed: u64) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(count);
    let mut data = Vec::with_capacity(count);

    while data.len() < count {
        let key = format!(
            "{:016x}{:016x}{:08x}",
            rng.random::<u64>(),
            rng.random::<u64>(),
            rng.random::<u32>()
        );
        if !seen.insert(key.clone()) {
            continue;
        }
        let value = format!("{} Account", Alphanumeric.sample_string(&mut rng, 10));
        data.push((key, value));
    }

    data
}

fn average(times: &[Duration]) -> Duration {
    per_entry(times.iter().sum(), times.len())
}

fn per_entry(total: Duration, count: usize) -> Duration {
    match u32::try_from(count) {
        Ok(0) | Err(_) => Duration::ZERO,
        Ok(n) => total / n,
    }
}
