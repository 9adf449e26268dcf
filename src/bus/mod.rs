//! Event Bus Module
//!
//! Publish/subscribe backbone decoupling producers and consumers of
//! application signals (session lifecycle, navigation, loader, modals, API
//! request lifecycle) without a central dispatcher or ownership graph.

mod event;
mod registry;

// Re-export public types
pub use event::{Event, EventKind};
pub use registry::{EventBus, EventCallback};
