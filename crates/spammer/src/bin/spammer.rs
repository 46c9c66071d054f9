//! Threadmill Spammer CLI
//!
//! Runs a self-contained soak: provisions users and a seeded board in an
//! in-memory content store, then generates randomized posting, deleting,
//! and voting activity against it until the duration elapses (or Ctrl-C).

use clap::Parser;
use std::sync::Arc;
use threadmill_spammer::{Spammer, SpammerConfig};
use threadmill_store_memory::MemoryStore;

#[derive(Parser)]
#[command(name = "threadmill-spammer")]
#[command(about = "Synthetic multi-user workload generator for threaded content stores")]
#[command(version)]
struct Cli {
    /// Number of threads to create on the test board
    #[arg(long, default_value = "5")]
    threads: usize,

    /// Number of simulated users
    #[arg(long, default_value = "5")]
    users: usize,

    /// Maximum number of posts to create (negative disables the cap)
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    post_cap: i64,

    /// Minimum pause between actions, in seconds
    #[arg(long, default_value = "1")]
    min_interval: u64,

    /// Maximum pause between actions, in seconds
    #[arg(long, default_value = "10")]
    max_interval: u64,

    /// Duration to run (e.g., "30s", "5m", "1h")
    #[arg(short, long, default_value = "60s")]
    duration: humantime::Duration,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = SpammerConfig::new()
        .with_thread_count(cli.threads)
        .with_user_count(cli.users)
        .with_post_cap(cli.post_cap)
        .with_intervals(cli.min_interval, cli.max_interval)
        .with_timeout(cli.duration.as_secs() as i64);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let store = Arc::new(MemoryStore::new());
    let spammer = Spammer::new(config, store)?;

    println!("Starting spammer for {}...", cli.duration);
    let handle = spammer.start();

    let stop = handle.stop_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Interrupted; requesting stop...");
            stop.stop().await;
        }
    });

    let stats = handle.join().await;
    interrupt.abort();
    stats.print();

    Ok(())
}
