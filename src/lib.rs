//! Portal Core - in-process coordination services for a member-portal client
//!
//! Three independent services compose the core:
//! - [`cache::CacheStore`] - bounded, expiring memoization of API responses
//! - [`bus::EventBus`] - typed publish/subscribe backbone between components
//! - [`timer::DriftTimer`] - drift-corrected timeout/interval multiplexer
//!
//! None of the three depends on the others. Construct each once at process
//! start and pass it down by reference; call `dispose()` at teardown.

pub mod bus;
pub mod cache;
pub mod config;
pub mod error;
pub mod timer;

pub use bus::{Event, EventBus, EventCallback, EventKind};
pub use cache::{cache_key, CacheEntry, CacheStats, CacheStore};
pub use config::Config;
pub use error::{CoreError, Result};
pub use timer::{CancelHandle, DriftTimer};
