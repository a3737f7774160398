//! Inbound message routing
//!
//! One handler, registered by the lifecycle guard on the transport's message
//! channel, turns untrusted payloads into typed events: the raw payload is
//! re-emitted first, then the decoded message (if any) maps to its
//! subscriber-facing event. Classification is pure; only the emit step
//! touches the bus.

use serde_json::Value;

use crate::bus::EventBus;
use crate::events::WatchEvent;
use crate::message::WatchMessage;

/// Map a decoded message to the typed event it fans out, if any.
///
/// The match is exhaustive over the closed message enumeration; adding a
/// variant forces a decision here.
pub(crate) fn classify(message: WatchMessage) -> Option<WatchEvent> {
    match message {
        WatchMessage::RequestSync => Some(WatchEvent::SyncRequested),
        WatchMessage::ExerciseCompleted {
            exercise_id,
            workout_id,
        } => Some(WatchEvent::ExerciseCompleted {
            exercise_id,
            workout_id,
        }),
        WatchMessage::WorkoutStartedFromWatch { workout_id } => {
            Some(WatchEvent::WorkoutStartedFromWatch { workout_id })
        }
        WatchMessage::WorkoutEndedFromWatch {
            workout_id,
            metrics,
        } => Some(WatchEvent::WorkoutEndedFromWatch {
            workout_id,
            health_data: metrics,
        }),
        WatchMessage::VoiceLogSubmitted { text } => {
            Some(WatchEvent::VoiceLogSubmitted { text })
        }
        WatchMessage::HealthDataCaptured { metrics } => {
            Some(WatchEvent::HealthDataCaptured {
                health_data: metrics,
            })
        }
        // Part of the protocol enumeration, but no subscriber-facing event is
        // defined for it; the phone applies status through explicit
        // start/end notifications instead.
        WatchMessage::WorkoutStatusChanged { .. } => None,
    }
}

/// Handle one payload from the transport's message channel.
///
/// Never raises: unknown or malformed payloads fan out only the raw
/// `Message` event.
pub(crate) fn route(bus: &EventBus, payload: Value) {
    bus.emit(&WatchEvent::Message {
        payload: payload.clone(),
    });

    match WatchMessage::decode(&payload) {
        Some(message) => {
            if let Some(event) = classify(message) {
                tracing::debug!(event = event.kind().as_str(), "routing companion message");
                bus.emit(&event);
            } else {
                tracing::debug!("companion message carries no subscriber-facing event");
            }
        }
        None => {
            tracing::debug!("ignoring unrecognized companion payload");
        }
    }
}
