//! Threadmill workload generator.
//!
//! A soak-testing tool that simulates realistic multi-user activity
//! against a threaded content store: it provisions a pool of simulated
//! users and a seeded board, then runs an autonomous scheduler loop
//! that creates, deletes, and votes on content at randomized intervals
//! until it is stopped or times out.
//!
//! # Architecture
//!
//! - **Setup phase** ([`Spammer::new`]): tops up the user registry and
//!   seeds a board with the configured number of threads.
//! - **Scheduler** ([`Spammer::start`]): one background task; each
//!   cycle sleeps a random `[min, max]` interval, switches the acting
//!   user, and dispatches one weighted-random action.
//! - **Action dispatcher** ([`Action`]): an explicit outcome table
//!   mapping 11 equally likely draws onto four actions.
//! - **Shutdown coordinator** ([`StopHandle`]): a single-slot stop
//!   channel; requests are bounded by `max_interval` and never retried.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use threadmill_spammer::{Spammer, SpammerConfig};
//! use threadmill_store_memory::MemoryStore;
//!
//! let config = SpammerConfig::new()
//!     .with_thread_count(5)
//!     .with_user_count(5)
//!     .with_intervals(1, 10)
//!     .with_timeout(60);
//!
//! let spammer = Spammer::new(config, Arc::new(MemoryStore::new()))?;
//! let handle = spammer.start();
//! let stats = handle.join().await;
//! stats.print();
//! ```

pub mod actions;
pub mod config;
pub mod random;
pub mod runner;
pub mod shutdown;

pub use actions::Action;
pub use config::{ConfigError, SpammerConfig};
pub use random::{Entropy, RangeError};
pub use runner::{RunStats, Spammer, SpammerError, SpammerHandle};
pub use shutdown::StopHandle;
