//! SafeMap Stress Binary
//!
//! Hammers one store from many threads and reports what it saw.

use std::process;
use std::thread;
use std::time::Instant;

use clap::Parser;
use safemap::{Config, InboxCapacity, SafeMap};
use tracing_subscriber::{fmt, EnvFilter};

/// SafeMap stress run
#[derive(Parser, Debug)]
#[command(name = "safemap-stress")]
#[command(about = "Concurrent load against a single SafeMap coordinator")]
#[command(version)]
struct Args {
    /// Number of writer threads
    #[arg(short, long, default_value = "4")]
    writers: usize,

    /// Number of reader threads
    #[arg(short, long, default_value = "4")]
    readers: usize,

    /// Distinct keys written by each writer
    #[arg(short, long, default_value = "10000")]
    keys_per_writer: usize,

    /// Inbox capacity per request kind (0 = rendezvous)
    #[arg(short, long, default_value = "0")]
    inbox_capacity: usize,

    /// Use unbounded inboxes (overrides --inbox-capacity)
    #[arg(short, long)]
    unbounded: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,safemap=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SafeMap stress v{}", safemap::VERSION);
    tracing::info!(
        writers = args.writers,
        readers = args.readers,
        keys_per_writer = args.keys_per_writer,
        "Starting run"
    );

    let capacity = if args.unbounded {
        InboxCapacity::Unbounded
    } else if args.inbox_capacity == 0 {
        InboxCapacity::Rendezvous
    } else {
        InboxCapacity::Bounded {
            capacity: args.inbox_capacity,
        }
    };
    let config = Config::builder().inbox_capacity(capacity).build();

    let map: SafeMap<u64, u64> = match SafeMap::with_config(config) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("Failed to start store: {}", e);
            process::exit(1);
        }
    };

    let started = Instant::now();
    if let Err(e) = run(&map, &args) {
        tracing::error!("Stress run failed: {}", e);
        process::exit(1);
    }
    let elapsed = started.elapsed();

    let size = map.size().unwrap_or_else(|e| {
        tracing::error!("Failed to read size: {}", e);
        process::exit(1);
    });
    let requests = (args.writers + args.readers) * args.keys_per_writer;
    tracing::info!(
        size,
        elapsed_ms = elapsed.as_millis() as u64,
        requests_per_sec = (requests as f64 / elapsed.as_secs_f64()) as u64,
        "Run finished"
    );

    if let Err(e) = map.terminate() {
        tracing::error!("Failed to terminate store: {}", e);
        process::exit(1);
    }
}

/// Spawn writers and readers, wait for all of them
fn run(map: &SafeMap<u64, u64>, args: &Args) -> safemap::Result<()> {
    let total_keys = (args.writers * args.keys_per_writer) as u64;
    let mut writers = Vec::with_capacity(args.writers);
    let mut readers = Vec::with_capacity(args.readers);

    for w in 0..args.writers {
        let map = map.clone();
        let keys = args.keys_per_writer as u64;
        writers.push(thread::spawn(move || -> safemap::Result<()> {
            let base = w as u64 * keys;
            for k in base..base + keys {
                map.set(k, k * 2)?;
            }
            Ok(())
        }));
    }

    for r in 0..args.readers {
        let map = map.clone();
        let lookups = args.keys_per_writer as u64;
        readers.push(thread::spawn(move || -> safemap::Result<u64> {
            let mut hits = 0;
            for i in 0..lookups {
                let key = (i * 7 + r as u64) % total_keys.max(1);
                if map.get(key)?.is_some() {
                    hits += 1;
                }
            }
            Ok(hits)
        }));
    }

    for writer in writers {
        writer.join().map_err(|_| safemap::SafeMapError::Closed)??;
    }
    for (r, reader) in readers.into_iter().enumerate() {
        let hits = reader.join().map_err(|_| safemap::SafeMapError::Closed)??;
        tracing::debug!(reader = r, hits, "Reader finished");
    }
    Ok(())
}
