use rand::Rng;

use crate::prelude::*;

/// Exponential backoff with a random jitter of up to the current delay.
pub struct Backoff {
    delay_millis: u64,
    max_delay_millis: u64,
    n_attempts: u32,
}

impl Backoff {
    pub fn new(initial_delay_millis: u64, max_delay_millis: u64) -> Self {
        Self {
            delay_millis: initial_delay_millis.max(1),
            max_delay_millis,
            n_attempts: 1,
        }
    }

    /// Retrieves the upcoming delay.
    pub fn next(&mut self) -> StdDuration {
        let delay_millis = self.delay_millis;
        self.delay_millis = self.max_delay_millis.min(delay_millis * 2).max(1);
        self.n_attempts += 1;
        StdDuration::from_millis(delay_millis + rand::thread_rng().gen_range(0..delay_millis))
    }

    /// Number of the upcoming attempt, starting from `1`.
    pub const fn n_attempts(&self) -> u32 {
        self.n_attempts
    }
}
