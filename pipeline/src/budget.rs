//! Cooperative time budget for batch processing.

use std::time::{Duration, Instant};

/// Remaining execution budget before the processing context is forcibly
/// terminated by the host.
///
/// The consumer checks the budget before starting each record and treats
/// "insufficient time" as a retriable failure rather than attempting
/// partial work.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant,
}

impl TimeBudget {
    /// Budget ending at the given deadline.
    pub fn until(deadline: Instant) -> Self {
        Self { deadline }
    }

    /// Budget of `duration` starting now.
    pub fn starting_now(duration: Duration) -> Self {
        Self {
            deadline: Instant::now() + duration,
        }
    }

    /// Time left before the deadline, zero once passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}
