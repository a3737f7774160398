//! Phone-side synchronization engine
//!
//! [`WatchLink`] is the long-lived instance the host application constructs
//! at its composition root, handing it the platform transport (or nothing,
//! on platforms without one). It owns the lifecycle of the transport-channel
//! listeners, exposes the best-effort push functions for each synchronizable
//! state category, and lets the rest of the application subscribe to
//! companion-originated events.
//!
//! Push functions follow the best-effort contract deliberately: no retries,
//! no delivery acknowledgement, no merging with prior values. The companion
//! re-requests a fresh snapshot (`request_sync`) whenever it suspects
//! staleness, so the phone never tracks per-field delivery confirmation.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;

use crate::bus::{EventBus, Subscription};
use crate::events::{WatchEvent, WatchEventKind};
use crate::outbound::{OutboundMessage, PushKind};
use crate::router;
use crate::transport::{CompanionTransport, TransportChannel, TransportSubscription};
use crate::types::{
    ComplicationData, MenstrualPhaseInfo, WatchAuthState, WatchDailyLog, WatchWorkout,
};

/// Workout-identity-only payload for start/end notifications
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutRef<'a> {
    workout_id: &'a str,
}

#[derive(Default)]
struct Lifecycle {
    initialized: bool,
    transport_subscriptions: Vec<TransportSubscription>,
}

/// The companion-device synchronization layer.
///
/// One instance per process; construct it once with [`WatchLink::new`] (or
/// [`WatchLink::detached`] where the platform has no companion facility) and
/// share it from the composition root.
pub struct WatchLink {
    transport: Option<Arc<dyn CompanionTransport>>,
    bus: Arc<EventBus>,
    lifecycle: Mutex<Lifecycle>,
}

impl WatchLink {
    /// Create a link backed by the platform transport.
    pub fn new(transport: Arc<dyn CompanionTransport>) -> Self {
        Self {
            transport: Some(transport),
            bus: Arc::new(EventBus::new()),
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    /// Create a link for platforms without a companion facility.
    ///
    /// Every operation on a detached link is a documented neutral no-op:
    /// boolean queries return `false`, pushes return silently, and nothing
    /// ever panics.
    pub fn detached() -> Self {
        Self {
            transport: None,
            bus: Arc::new(EventBus::new()),
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle guard
    // ------------------------------------------------------------------

    /// Activate the companion session and register the transport listeners.
    ///
    /// Idempotent: the first call activates the session and registers exactly
    /// one handler per notification channel; subsequent calls are no-ops
    /// until [`cleanup`](WatchLink::cleanup) resets the guard.
    pub fn initialize(&self) {
        let Some(transport) = &self.transport else {
            return;
        };
        let mut lifecycle = self.lock_lifecycle();
        if lifecycle.initialized {
            return;
        }

        transport.activate_session();

        let bus = Arc::clone(&self.bus);
        let message = transport.subscribe(
            TransportChannel::Message,
            Box::new(move |payload| router::route(&bus, payload)),
        );

        let bus = Arc::clone(&self.bus);
        let reachability = transport.subscribe(
            TransportChannel::Reachability,
            Box::new(move |payload| {
                let is_reachable = payload
                    .get("isReachable")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                bus.emit(&WatchEvent::ReachabilityChanged { is_reachable });
            }),
        );

        let bus = Arc::clone(&self.bus);
        let session_state = transport.subscribe(
            TransportChannel::SessionState,
            Box::new(move |state| {
                bus.emit(&WatchEvent::SessionStateChanged { state });
            }),
        );

        lifecycle.transport_subscriptions = vec![message, reachability, session_state];
        lifecycle.initialized = true;
        tracing::debug!("companion session activated, channel listeners registered");
    }

    /// Tear down every transport-level registration made by `initialize` and
    /// reset the guard so a future `initialize` can run again.
    ///
    /// Safe to call repeatedly and before `initialize`. Application
    /// subscribers on the event bus are untouched.
    pub fn cleanup(&self) {
        let mut lifecycle = self.lock_lifecycle();
        for subscription in lifecycle.transport_subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        lifecycle.initialized = false;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether a companion device is paired. `false` when detached.
    pub async fn is_watch_paired(&self) -> bool {
        match &self.transport {
            Some(transport) => transport.is_paired().await,
            None => false,
        }
    }

    /// Whether the companion is currently reachable. `false` when detached.
    pub async fn is_watch_reachable(&self) -> bool {
        match &self.transport {
            Some(transport) => transport.is_reachable().await,
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // State pusher (best-effort push contract)
    // ------------------------------------------------------------------

    /// Push the authentication snapshot.
    pub async fn sync_auth(&self, auth: &WatchAuthState) {
        self.push(PushKind::SyncAuth, auth).await;
    }

    /// Push today's workout, exercises included, wholesale.
    pub async fn sync_workout(&self, workout: &WatchWorkout) {
        self.push(PushKind::SyncWorkout, workout).await;
    }

    /// Push one calendar day's log entry.
    pub async fn sync_daily_log(&self, log: &WatchDailyLog) {
        self.push(PushKind::SyncDailyLog, log).await;
    }

    /// Push the current wellness score as a bare number.
    pub async fn sync_wellness_score(&self, score: f64) {
        self.push(PushKind::SyncWellnessScore, &score).await;
    }

    /// Push the reproductive-cycle phase snapshot.
    pub async fn sync_menstrual_phase(&self, phase: &MenstrualPhaseInfo) {
        self.push(PushKind::SyncMenstrualPhase, phase).await;
    }

    /// Tell the companion a workout started on the phone.
    pub async fn notify_workout_started(&self, workout_id: &str) {
        self.push(PushKind::WorkoutStarted, &WorkoutRef { workout_id })
            .await;
    }

    /// Tell the companion a workout ended on the phone.
    pub async fn notify_workout_ended(&self, workout_id: &str) {
        self.push(PushKind::WorkoutEnded, &WorkoutRef { workout_id })
            .await;
    }

    /// Push the glanceable complication projection.
    pub async fn update_complication(&self, data: &ComplicationData) {
        self.push(PushKind::UpdateComplication, data).await;
    }

    /// Send an arbitrary payload, reporting immediacy.
    ///
    /// The one outbound operation that returns a result: `true` only when
    /// the transport handed the payload off for immediate transit, `false`
    /// when it was queued for later delivery or no transport is present.
    pub async fn send_message(&self, payload: Value) -> bool {
        let Some(transport) = &self.transport else {
            return false;
        };
        let outcome = transport.send(payload).await;
        !outcome.queued
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Subscribe to companion-originated events.
    ///
    /// Delegates to the event bus: callbacks for a kind run in registration
    /// order, and the returned handle removes exactly this registration.
    pub fn on<F>(&self, kind: WatchEventKind, callback: F) -> Subscription
    where
        F: Fn(&WatchEvent) + Send + Sync + 'static,
    {
        self.bus.on(kind, callback)
    }

    /// Best-effort push: encode `value`, hand it to the transport, ignore the
    /// outcome beyond a debug log.
    async fn push<T: Serialize + ?Sized>(&self, kind: PushKind, value: &T) {
        let Some(transport) = &self.transport else {
            return;
        };
        let message = match OutboundMessage::new(kind, value) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(kind = kind.as_str(), %err, "dropping push that failed to encode");
                return;
            }
        };
        let outcome = transport.send(message.into_value()).await;
        tracing::debug!(
            kind = kind.as_str(),
            queued = outcome.queued,
            "pushed state to companion"
        );
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    fn bus(&self) -> &EventBus {
        &self.bus
    }
}
