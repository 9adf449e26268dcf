//! Timer Module
//!
//! A single shared polling loop multiplexing many logical timeout/interval
//! tasks. Due-ness is computed from elapsed wall-clock time since the last
//! execution rather than counted ticks, so a throttled or suspended host
//! catches up instead of silently losing scheduled work.

mod driver;
mod task;

// Re-export public types
pub use driver::{CancelHandle, DriftTimer, DEFAULT_TICK};
pub use task::{TaskCallback, TimerTask};
