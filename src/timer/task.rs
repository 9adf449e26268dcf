//! Timer Task Module
//!
//! Defines the structure for one logical timeout or interval multiplexed
//! onto the shared poll loop.

use std::time::{Duration, Instant};

// == Callback Type ==
/// Callback invoked when a task comes due.
pub type TaskCallback = Box<dyn FnMut() + Send>;

// == Timer Task ==
/// One registered timeout or interval.
pub struct TimerTask {
    /// Unique task id; re-registering an id replaces the task
    pub id: String,
    /// Time that must elapse between executions
    pub duration: Duration,
    /// Function to execute when due.
    ///
    /// Taken (`None`) while the callback is mid-invocation on the current
    /// tick, so the table lock is not held across the call; a `None` slot
    /// therefore marks an in-flight task.
    pub callback: Option<TaskCallback>,
    /// Monotonic instant of the last execution (or of registration)
    pub last_execution: Instant,
    /// Execution bound; `None` repeats forever, `Some(1)` is a one-shot
    pub max_executions: Option<u32>,
    /// Number of executions so far
    pub execution_count: u32,
}

impl TimerTask {
    // == Constructor ==
    /// Creates a task whose clock starts now.
    pub fn new(
        id: &str,
        duration: Duration,
        callback: TaskCallback,
        max_executions: Option<u32>,
    ) -> Self {
        Self {
            id: id.to_string(),
            duration,
            callback: Some(callback),
            last_execution: Instant::now(),
            max_executions,
            execution_count: 0,
        }
    }

    // == Is Due ==
    /// True once `now` is at least one full duration past the last execution.
    pub fn is_due(&self, now: Instant) -> bool {
        now.duration_since(self.last_execution) >= self.duration
    }

    // == Is Exhausted ==
    /// True once the execution bound has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.max_executions
            .map_or(false, |max| self.execution_count >= max)
    }

    // == Remaining ==
    /// Time until the next execution, clamped at zero when overdue.
    pub fn remaining(&self, now: Instant) -> Duration {
        (self.last_execution + self.duration).saturating_duration_since(now)
    }
}
