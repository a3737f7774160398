//! In-process event fan-out
//!
//! [`EventBus`] is the only way internal consumers learn about
//! companion-originated activity. Subscribers for a given event kind are
//! invoked synchronously, in registration order. Fan-out isolates callbacks
//! from one another: a panicking subscriber is caught and logged, and
//! delivery continues to later subscribers, so the router's transport-channel
//! handler always runs to completion.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::events::{WatchEvent, WatchEventKind};

type Callback = Arc<dyn Fn(&WatchEvent) + Send + Sync>;

struct Registration {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    subscribers: HashMap<WatchEventKind, Vec<Registration>>,
    next_id: u64,
}

/// Ordered publish/subscribe registry for [`WatchEvent`]s.
///
/// Registrations live until explicitly unsubscribed; dropping a
/// [`Subscription`] handle does not remove the callback.
#[derive(Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

/// Handle returned by [`EventBus::on`].
///
/// Unsubscribing removes exactly the registration that produced this handle,
/// by identity. Calling [`unsubscribe`](Subscription::unsubscribe) more than
/// once is a safe no-op.
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    kind: WatchEventKind,
    id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for events of `kind`.
    ///
    /// The callback is appended to the ordered list for that kind and will be
    /// invoked after every callback registered before it.
    pub fn on<F>(&self, kind: WatchEventKind, callback: F) -> Subscription
    where
        F: Fn(&WatchEvent) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.entry(kind).or_default().push(Registration {
            id,
            callback: Arc::new(callback),
        });

        Subscription {
            registry: Arc::downgrade(&self.registry),
            kind,
            id,
        }
    }

    /// Deliver `event` to every subscriber of its kind, in registration order.
    ///
    /// The subscriber snapshot is taken under the lock and invoked outside
    /// it, so callbacks may subscribe or unsubscribe reentrantly; such changes
    /// take effect from the next emit.
    pub(crate) fn emit(&self, event: &WatchEvent) {
        let callbacks: Vec<Callback> = {
            let registry = lock(&self.registry);
            registry
                .subscribers
                .get(&event.kind())
                .map(|registrations| {
                    registrations
                        .iter()
                        .map(|registration| Arc::clone(&registration.callback))
                        .collect()
                })
                .unwrap_or_default()
        };

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                tracing::error!(
                    event = event.kind().as_str(),
                    "subscriber panicked during fan-out; continuing with remaining subscribers"
                );
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self, kind: WatchEventKind) -> usize {
        lock(&self.registry)
            .subscribers
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl Subscription {
    /// Remove this registration from the bus.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = lock(&registry);
            if let Some(registrations) = registry.subscribers.get_mut(&self.kind) {
                registrations.retain(|registration| registration.id != self.id);
            }
        }
    }
}

/// A poisoned registry lock only means a caller panicked while holding it;
/// the map itself is never left mid-mutation, so recover the guard.
fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorder(bus: &EventBus, kind: WatchEventKind, log: &Arc<Mutex<Vec<String>>>, tag: &str) -> Subscription {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        bus.on(kind, move |_event| {
            log.lock().unwrap().push(tag.clone());
        })
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let _a = recorder(&bus, WatchEventKind::SyncRequested, &log, "first");
        let _b = recorder(&bus, WatchEventKind::SyncRequested, &log, "second");

        bus.emit(&WatchEvent::SyncRequested);

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribed_callback_is_not_invoked() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let subscription = recorder(&bus, WatchEventKind::SyncRequested, &log, "gone");
        subscription.unsubscribe();

        bus.emit(&WatchEvent::SyncRequested);

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_double_unsubscribe_is_a_noop() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let keep = recorder(&bus, WatchEventKind::SyncRequested, &log, "kept");
        let gone = recorder(&bus, WatchEventKind::SyncRequested, &log, "gone");
        gone.unsubscribe();
        gone.unsubscribe();

        bus.emit(&WatchEvent::SyncRequested);

        assert_eq!(*log.lock().unwrap(), vec!["kept"]);
        keep.unsubscribe();
    }

    #[test]
    fn test_unsubscribe_removes_only_that_registration() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let _a = recorder(&bus, WatchEventKind::SyncRequested, &log, "a");
        let b = recorder(&bus, WatchEventKind::SyncRequested, &log, "b");
        let _c = recorder(&bus, WatchEventKind::SyncRequested, &log, "c");
        b.unsubscribe();

        bus.emit(&WatchEvent::SyncRequested);

        assert_eq!(*log.lock().unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn test_emit_with_no_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.emit(&WatchEvent::SyncRequested);
    }

    #[test]
    fn test_events_are_filtered_by_kind() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let _sync = recorder(&bus, WatchEventKind::SyncRequested, &log, "sync");
        let _reach = recorder(&bus, WatchEventKind::ReachabilityChanged, &log, "reach");

        bus.emit(&WatchEvent::ReachabilityChanged { is_reachable: true });

        assert_eq!(*log.lock().unwrap(), vec!["reach"]);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_fanout() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let _bad = bus.on(WatchEventKind::SyncRequested, |_event| {
            panic!("subscriber defect");
        });
        let _good = recorder(&bus, WatchEventKind::SyncRequested, &log, "still delivered");

        bus.emit(&WatchEvent::SyncRequested);

        assert_eq!(*log.lock().unwrap(), vec!["still delivered"]);
    }

    #[test]
    fn test_subscriber_receives_payload() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let _sub = bus.on(WatchEventKind::ExerciseCompleted, move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let event = WatchEvent::ExerciseCompleted {
            exercise_id: "e1".to_string(),
            workout_id: "w1".to_string(),
        };
        bus.emit(&event);

        assert_eq!(*seen.lock().unwrap(), vec![event]);
    }
}
