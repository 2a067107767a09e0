use std::time::Duration;
use tokio::time::Instant;

/// The single deadline shared by every tier of one resolution call.
///
/// Created once at call entry; tiers read their remaining time from it and
/// never extend or reset it.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionBudget {
    deadline: Instant,
}

impl ResolutionBudget {
    /// Starts a budget that expires `timeout` from now.
    pub fn new(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// Budget ending at an absolute instant.
    pub fn until(deadline: Instant) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
