//! Event Registry Module
//!
//! Named-subscriber publish/subscribe registry with duplicate-registration
//! suppression and bulk unsubscribe.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::bus::{Event, EventKind};
use crate::error::{CoreError, Result};

// == Callback Type ==
/// Shared callback handle.
///
/// Duplicate detection compares handles with `Arc::ptr_eq`: registering a
/// clone of the same handle twice is a no-op, while two closures with
/// identical bodies remain distinct subscriptions.
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

// == Subscription ==
struct Subscription {
    subscriber: String,
    callback: EventCallback,
}

// == Event Bus ==
/// Decouples producers and consumers of application signals.
///
/// A subscriber id is a logical owner string (typically a component name),
/// not an object reference; this allows bulk cleanup on unmount without the
/// caller tracking individual subscription handles.
///
/// Callbacks are invoked synchronously in registration order. A panicking
/// subscriber is not isolated from the emitter; propagation is the
/// caller's responsibility.
#[derive(Default)]
pub struct EventBus {
    registry: HashMap<EventKind, Vec<Subscription>>,
}

impl EventBus {
    // == Constructor ==
    /// Creates a new bus with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == Subscribe ==
    /// Subscribes `subscriber` to each of the given event kinds.
    ///
    /// A pairing that is already registered with the same subscriber and
    /// the same callback handle is a silent no-op.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptySubscriberId`] if `subscriber` is empty.
    pub fn on(&mut self, subscriber: &str, kinds: &[EventKind], callback: EventCallback) -> Result<()> {
        if subscriber.is_empty() {
            return Err(CoreError::EmptySubscriberId);
        }

        for &kind in kinds {
            if self.already_registered(subscriber, kind, &callback) {
                continue;
            }

            self.registry.entry(kind).or_default().push(Subscription {
                subscriber: subscriber.to_string(),
                callback: Arc::clone(&callback),
            });
        }

        Ok(())
    }

    // == Unsubscribe ==
    /// Removes exactly the subscription matching subscriber, kind, and
    /// callback handle. No-op when nothing matches.
    pub fn off(&mut self, subscriber: &str, kind: EventKind, callback: &EventCallback) {
        if let Some(subs) = self.registry.get_mut(&kind) {
            subs.retain(|s| s.subscriber != subscriber || !Arc::ptr_eq(&s.callback, callback));
            if subs.is_empty() {
                self.registry.remove(&kind);
            }
        }
    }

    /// Removes every subscription by `subscriber` on `kind`.
    pub fn off_event(&mut self, subscriber: &str, kind: EventKind) {
        if let Some(subs) = self.registry.get_mut(&kind) {
            subs.retain(|s| s.subscriber != subscriber);
            if subs.is_empty() {
                self.registry.remove(&kind);
            }
        }
    }

    /// Removes every subscription owned by `subscriber` across all kinds
    /// (component-unmount cleanup).
    pub fn off_all(&mut self, subscriber: &str) {
        self.registry.retain(|_, subs| {
            subs.retain(|s| s.subscriber != subscriber);
            !subs.is_empty()
        });
    }

    // == Publish ==
    /// Publishes `event` to every current subscriber of its kind,
    /// synchronously, in registration order.
    ///
    /// An emit with zero subscribers is a logged no-op, not an error.
    pub fn emit(&self, event: &Event) {
        match self.registry.get(&event.kind()) {
            Some(subs) => {
                for sub in subs {
                    (sub.callback)(event);
                }
            }
            None => {
                warn!("No subscribers for the published event '{}'.", event.kind());
            }
        }
    }

    // == Subscriber Count ==
    /// Number of subscriptions currently registered for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.registry.get(&kind).map_or(0, Vec::len)
    }

    // == Dispose ==
    /// Clears the entire registry.
    pub fn dispose(&mut self) {
        self.registry.clear();
    }

    // == Already Registered ==
    /// Checks whether the exact (subscriber, kind, callback handle) triple
    /// is already present.
    fn already_registered(&self, subscriber: &str, kind: EventKind, callback: &EventCallback) -> bool {
        self.registry.get(&kind).map_or(false, |subs| {
            subs.iter()
                .any(|s| s.subscriber == subscriber && Arc::ptr_eq(&s.callback, callback))
        })
    }
}
