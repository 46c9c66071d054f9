//! Fallible randomness provider for the generator.
//!
//! All random choices in the scheduler go through [`Entropy`], whose
//! `int_between` reports an empty domain as an error instead of
//! panicking. The scheduler treats those errors as fail-soft: log,
//! default, keep looping.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const ALIAS_FIRST: [&str; 12] = [
    "amber", "brisk", "cobalt", "dusty", "ember", "frosty", "gilded", "hazel", "ivory", "jade",
    "mellow", "silent",
];

const ALIAS_SECOND: [&str; 12] = [
    "falcon", "badger", "cedar", "dingo", "egret", "ferret", "gannet", "heron", "ibis", "jackal",
    "lynx", "otter",
];

/// Seeded randomness source.
pub struct Entropy {
    rng: ChaCha8Rng,
}

impl Entropy {
    /// Create a source from an explicit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from the system clock.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        Self::seeded(seed)
    }

    /// Draw a uniform integer in the inclusive range `[low, high]`.
    ///
    /// Fails if the domain is empty (`low > high`).
    pub fn int_between(&mut self, low: i64, high: i64) -> Result<i64, RangeError> {
        if low > high {
            return Err(RangeError { low, high });
        }
        Ok(self.rng.gen_range(low..=high))
    }

    /// Generate a readable random alias for a simulated user.
    pub fn alias(&mut self) -> String {
        let first = ALIAS_FIRST[self.rng.gen_range(0..ALIAS_FIRST.len())];
        let second = ALIAS_SECOND[self.rng.gen_range(0..ALIAS_SECOND.len())];
        let number: u16 = self.rng.gen_range(0..100);
        format!("{first}_{second}_{number:02}")
    }

    /// Generate a time-stamped random seed string for key derivation.
    pub fn seed_phrase(&mut self) -> String {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut noise = [0u8; 16];
        self.rng.fill(&mut noise);
        format!("{stamp:x}-{}", hex::encode(noise))
    }
}

/// Error produced when a random draw is requested over an empty domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("empty range: low {low} exceeds high {high}")]
pub struct RangeError {
    /// Requested lower bound.
    pub low: i64,
    /// Requested upper bound.
    pub high: i64,
}
