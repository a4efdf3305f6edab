use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, Utc};

use super::domain::HankeTunnus;

pub const DEFAULT_TUNNUS_PREFIX: &str = "HAI";

/// Source of new, unique project codes.
pub trait TunnusGenerator: Send + Sync {
    fn next_tunnus(&self) -> HankeTunnus;
}

/// Produces `{prefix}{yy}-{sequence}` codes, e.g. `HAI24-1`.
pub struct SequenceTunnusGenerator {
    prefix: String,
    sequence: AtomicU64,
}

impl SequenceTunnusGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: AtomicU64::new(first),
        }
    }
}

impl Default for SequenceTunnusGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TUNNUS_PREFIX)
    }
}

impl TunnusGenerator for SequenceTunnusGenerator {
    fn next_tunnus(&self) -> HankeTunnus {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let year = Utc::now().year() % 100;
        HankeTunnus(format!("{}{year:02}-{sequence}", self.prefix))
    }
}
