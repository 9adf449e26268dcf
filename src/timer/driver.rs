//! Timer Driver Module
//!
//! The shared poll loop and its public handle. One background task ticks at
//! a fixed period and checks every registered task against elapsed
//! wall-clock time; an overdue task fires exactly once per tick and resets
//! its clock from "now", so a long stall catches up with a single firing
//! rather than a retroactive burst.
//!
//! The poll loop exists only while at least one task is registered.
//!
//! Registration must happen inside a tokio runtime. Callbacks are invoked
//! with the task table unlocked, so a callback may cancel its own task (or
//! any other) and register new tasks; a self-cancel takes effect after the
//! current firing.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::timer::task::{TaskCallback, TimerTask};

// == Public Constants ==
/// Default poll tick. Granularity is a tunable, not a contract.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Smallest accepted poll tick; a zero tick would spin the loop.
const MIN_TICK: Duration = Duration::from_millis(1);

// == Inner State ==
struct TimerInner {
    /// Registered tasks by id
    tasks: HashMap<String, TimerTask>,
    /// Handle of the running poll loop, if any
    poll: Option<JoinHandle<()>>,
}

/// Locks the task table, recovering the guard if a previous holder panicked.
fn lock_inner(inner: &Mutex<TimerInner>) -> MutexGuard<'_, TimerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Drift Timer ==
/// Drift-corrected timeout/interval multiplexer.
pub struct DriftTimer {
    inner: Arc<Mutex<TimerInner>>,
    tick: Duration,
}

impl DriftTimer {
    // == Constructor ==
    /// Creates a timer whose poll loop ticks at the given period,
    /// clamped to a 1ms minimum.
    pub fn new(tick: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                tasks: HashMap::new(),
                poll: None,
            })),
            tick: tick.max(MIN_TICK),
        }
    }

    /// Creates a DriftTimer from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Duration::from_millis(config.timer_tick_ms))
    }

    /// Poll tick in effect.
    pub fn tick(&self) -> Duration {
        self.tick
    }

    // == Set Timeout ==
    /// Registers a one-shot task executing `callback` once after `duration`.
    ///
    /// Re-registering an existing id replaces the task. Starts the shared
    /// poll loop if it is not already running.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidTimerId`] for an empty id and
    /// [`CoreError::InvalidDuration`] for a zero duration.
    pub fn set_timeout(
        &self,
        id: &str,
        duration: Duration,
        callback: TaskCallback,
    ) -> Result<CancelHandle> {
        self.register(id, duration, callback, Some(1))
    }

    // == Set Interval ==
    /// Registers a repeating task executing `callback` every `duration`,
    /// at most `max_executions` times (`None` = unbounded).
    ///
    /// Same validation and replacement semantics as [`set_timeout`](Self::set_timeout).
    pub fn set_interval(
        &self,
        id: &str,
        duration: Duration,
        callback: TaskCallback,
        max_executions: Option<u32>,
    ) -> Result<CancelHandle> {
        self.register(id, duration, callback, max_executions)
    }

    // == Clear ==
    /// Removes the task registered under `id`; no-op when absent.
    /// Stops the poll loop once no tasks remain.
    pub fn clear_timeout(&self, id: &str) {
        self.clear(id);
    }

    /// Alias of [`clear_timeout`](Self::clear_timeout).
    pub fn clear_interval(&self, id: &str) {
        self.clear(id);
    }

    // == Remaining Time ==
    /// Time until the task's next execution, clamped at zero.
    ///
    /// # Errors
    /// Returns [`CoreError::TimerNotFound`] if no task is registered under `id`.
    pub fn get_remaining_time(&self, id: &str) -> Result<Duration> {
        let inner = lock_inner(&self.inner);
        inner
            .tasks
            .get(id)
            .map(|task| task.remaining(Instant::now()))
            .ok_or_else(|| CoreError::TimerNotFound(id.to_string()))
    }

    // == Task Count ==
    /// Number of currently registered tasks.
    pub fn task_count(&self) -> usize {
        lock_inner(&self.inner).tasks.len()
    }

    // == Dispose ==
    /// Stops the poll loop and clears all tasks.
    pub fn dispose(&self) {
        let mut inner = lock_inner(&self.inner);
        inner.tasks.clear();
        stop_poll_if_idle(&mut inner);
    }

    // == Register ==
    fn register(
        &self,
        id: &str,
        duration: Duration,
        callback: TaskCallback,
        max_executions: Option<u32>,
    ) -> Result<CancelHandle> {
        if id.is_empty() {
            return Err(CoreError::InvalidTimerId(
                "id must be a non-empty string".to_string(),
            ));
        }
        if duration.is_zero() {
            return Err(CoreError::InvalidDuration(duration));
        }

        let mut inner = lock_inner(&self.inner);
        inner
            .tasks
            .insert(id.to_string(), TimerTask::new(id, duration, callback, max_executions));
        self.start_poll_if_needed(&mut inner);

        Ok(CancelHandle {
            inner: Arc::clone(&self.inner),
            id: id.to_string(),
        })
    }

    // == Poll Loop ==
    fn start_poll_if_needed(&self, inner: &mut TimerInner) {
        if inner.poll.is_some() {
            return;
        }

        debug!("Timer poll loop started ({}ms tick)", self.tick.as_millis());

        let shared = Arc::clone(&self.inner);
        let tick = self.tick;
        inner.poll = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;

                run_due(&shared, Instant::now());

                let mut inner = lock_inner(&shared);
                if inner.tasks.is_empty() {
                    // Dropping our own handle detaches it; the loop simply ends
                    inner.poll = None;
                    debug!("Timer poll loop stopped");
                    break;
                }
            }
        }));
    }

    fn clear(&self, id: &str) {
        let mut inner = lock_inner(&self.inner);
        inner.tasks.remove(id);
        stop_poll_if_idle(&mut inner);
    }
}

impl Default for DriftTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

/// Aborts the poll loop once no tasks remain.
fn stop_poll_if_idle(inner: &mut TimerInner) {
    if inner.tasks.is_empty() {
        if let Some(handle) = inner.poll.take() {
            handle.abort();
            debug!("Timer poll loop stopped");
        }
    }
}

// == Tick ==
/// Fires every task whose elapsed time since its last execution has reached
/// its duration, exactly once per call, then prunes exhausted tasks.
///
/// The table lock is released while each callback runs: the callback slot is
/// taken under the lock, the call happens unlocked, and the slot is restored
/// afterwards. A task cancelled while its callback runs stays removed, and a
/// task replaced by a fresh registration keeps the new registration's clock
/// and callback.
///
/// Each callback is guarded so one panicking task cannot starve the rest of
/// the tick.
fn run_due(inner: &Mutex<TimerInner>, now: Instant) {
    loop {
        let (id, mut callback) = {
            let mut guard = lock_inner(inner);
            let due = guard.tasks.values_mut().find_map(|task| {
                if task.is_due(now) {
                    task.callback.take().map(|cb| (task.id.clone(), cb))
                } else {
                    None
                }
            });
            match due {
                Some(found) => found,
                None => break,
            }
        };

        if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
            error!("Timer task '{}' panicked", id);
        }

        let mut guard = lock_inner(inner);
        let exhausted = match guard.tasks.get_mut(&id) {
            // Slot still empty: the task is ours, restore and advance its clock.
            // Advancing past `now` drops it out of this tick's due scan.
            Some(task) if task.callback.is_none() => {
                task.callback = Some(callback);
                task.last_execution = now;
                task.execution_count += 1;
                task.is_exhausted()
            }
            // Replaced by a fresh registration mid-callback (the new task
            // keeps its own callback and clock), or cancelled mid-callback
            _ => false,
        };
        if exhausted {
            debug!("Timer task '{}' reached its execution bound, removed", id);
            guard.tasks.remove(&id);
        }
    }
}

// == Cancel Handle ==
/// Cancels the task it was returned for. Cancelling an already-removed
/// task is a silent no-op. Safe to call from within the task's own
/// callback; the current firing completes.
pub struct CancelHandle {
    inner: Arc<Mutex<TimerInner>>,
    id: String,
}

impl CancelHandle {
    /// Removes the task; the poll loop stops if no tasks remain.
    pub fn cancel(self) {
        let mut inner = lock_inner(&self.inner);
        inner.tasks.remove(&self.id);
        stop_poll_if_idle(&mut inner);
    }
}
