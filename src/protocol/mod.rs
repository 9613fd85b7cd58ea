pub mod client_record;
pub mod fields;
pub mod master;
pub mod qtv;
pub mod status;
pub mod text;
pub mod transport;

use client_record::{BotDetector, BotPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Knobs shared by every query in a polling cycle.
#[derive(Clone)]
pub struct QueryOptions {
    /// Attempts per target.
    pub retries: u32,
    /// Deadline for each send and each receive.
    pub timeout: Duration,
    /// Upper bound on in-flight server queries; 0 means unbounded.
    pub max_concurrency: usize,
    pub bots: Arc<dyn BotDetector>,
}

impl QueryOptions {
    pub fn new(retries: u32, timeout: Duration) -> Self {
        Self {
            retries,
            timeout,
            ..Self::default()
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_bots(mut self, bots: Arc<dyn BotDetector>) -> Self {
        self.bots = bots;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout: Duration::from_millis(500),
            max_concurrency: 1024,
            bots: Arc::new(BotPolicy::default()),
        }
    }
}
