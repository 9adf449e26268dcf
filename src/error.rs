//! Error types for the portal core services
//!
//! Provides unified error handling using thiserror.
//!
//! Only programmer errors surface here: bad arguments and lookups of
//! unregistered timers. Degradable failures (size computation, value
//! decoding) are logged and absorbed by the cache, never returned.

use std::time::Duration;

use thiserror::Error;

// == Core Error Enum ==
/// Unified error type for the core services.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Subscriber id was empty; bulk unsubscribe is keyed on it
    #[error("Subscriber id must not be empty")]
    EmptySubscriberId,

    /// Timer id was empty
    #[error("Invalid timer id: {0}")]
    InvalidTimerId(String),

    /// Timer duration must be positive
    #[error("Invalid timer duration: {0:?}")]
    InvalidDuration(Duration),

    /// No timer registered under the given id
    #[error("Timer with id '{0}' not found")]
    TimerNotFound(String),
}

// == Result Type Alias ==
/// Convenience Result type for the core services.
pub type Result<T> = std::result::Result<T, CoreError>;
