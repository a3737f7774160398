//! Companion transport facade
//!
//! The narrow interface the synchronization core requires from the
//! platform's companion-communication facility. This crate only consumes the
//! trait; the platform binding (or a test double) implements it.
//!
//! A platform where no such facility exists is modeled one level up: the
//! [`WatchLink`](crate::link::WatchLink) simply holds no transport, and every
//! public operation degrades to its documented neutral result.

use async_trait::async_trait;
use serde_json::Value;

/// Outcome of a transport send.
///
/// Sends never fail at this interface: when the companion is unreachable the
/// transport accepts the payload for eventual delivery and reports
/// `queued: true` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendOutcome {
    /// True when the payload was accepted for later delivery rather than
    /// handed off for immediate transit.
    pub queued: bool,
}

/// The three notification channels the transport drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportChannel {
    /// An inbound payload arrived from the companion
    Message,
    /// Reachability flipped; payload is `{"isReachable": bool}`
    Reachability,
    /// The underlying session state changed; payload is opaque
    SessionState,
}

impl TransportChannel {
    pub fn name(&self) -> &'static str {
        match self {
            TransportChannel::Message => "message",
            TransportChannel::Reachability => "reachabilityChanged",
            TransportChannel::SessionState => "sessionStateChanged",
        }
    }
}

/// Handler invoked by the transport whenever its channel fires.
///
/// Handlers run on the transport's notification context and must not block.
pub type ChannelHandler = Box<dyn Fn(Value) + Send + Sync>;

/// Teardown handle for one channel registration.
///
/// Consuming it removes exactly the registration that produced it; dropping
/// it without unsubscribing leaves the registration live.
pub struct TransportSubscription {
    teardown: Box<dyn FnOnce() + Send>,
}

impl TransportSubscription {
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Box::new(teardown),
        }
    }

    /// Remove the registration this handle refers to.
    pub fn unsubscribe(self) {
        (self.teardown)();
    }
}

/// Platform facility for talking to the paired companion device.
///
/// Pairing and reachability queries, and `send`, are asynchronous and must
/// not block the caller. Implementations are expected to be cheap to share
/// behind an `Arc`.
#[async_trait]
pub trait CompanionTransport: Send + Sync {
    /// Begin or resume the cross-device session. Fire-and-forget.
    fn activate_session(&self);

    /// Whether a companion device is associated with this phone, independent
    /// of current connectivity.
    async fn is_paired(&self) -> bool;

    /// Whether a live, low-latency channel to the companion is available
    /// right now.
    async fn is_reachable(&self) -> bool;

    /// Attempt delivery of `payload`.
    ///
    /// Must not fail: an unreachable companion yields `queued: true` and the
    /// transport owns eventual delivery once reachability returns.
    async fn send(&self, payload: Value) -> SendOutcome;

    /// Register `handler` on `channel`, returning its teardown handle.
    fn subscribe(&self, channel: TransportChannel, handler: ChannelHandler)
        -> TransportSubscription;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names_are_fixed() {
        assert_eq!(TransportChannel::Message.name(), "message");
        assert_eq!(TransportChannel::Reachability.name(), "reachabilityChanged");
        assert_eq!(TransportChannel::SessionState.name(), "sessionStateChanged");
    }

    #[test]
    fn test_send_outcome_defaults_to_delivered_now() {
        assert!(!SendOutcome::default().queued);
    }
}
