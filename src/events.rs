//! Typed event model
//!
//! Companion-originated activity reaches the rest of the application as
//! [`WatchEvent`] values fanned out by the [`EventBus`](crate::bus::EventBus).
//! The closed sum type replaces a stringly-keyed event map: a subscriber and
//! the router agree on each payload's shape at compile time, because both
//! sides go through the same enum variant.

use serde_json::Value;

use crate::types::HealthMetrics;

/// An event delivered to in-process subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// Raw inbound payload, re-emitted before classification. Subscribers
    /// that want the undecoded wire shape (diagnostics, logging) listen here.
    Message { payload: Value },
    /// The live channel to the companion appeared or disappeared
    ReachabilityChanged { is_reachable: bool },
    /// Opaque session-state change from the platform transport
    SessionStateChanged { state: Value },
    /// The companion suspects staleness and asks for a fresh snapshot push
    SyncRequested,
    /// An exercise was marked complete on the companion
    ExerciseCompleted {
        exercise_id: String,
        workout_id: String,
    },
    WorkoutStartedFromWatch {
        workout_id: String,
    },
    /// Workout finished on the companion, with the session's derived metrics
    WorkoutEndedFromWatch {
        workout_id: String,
        health_data: HealthMetrics,
    },
    /// Transcribed text of a voice log recorded on the companion
    VoiceLogSubmitted { text: String },
    /// Ambient health capture, independent of any workout lifecycle
    HealthDataCaptured { health_data: HealthMetrics },
}

/// Fieldless discriminant of [`WatchEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchEventKind {
    Message,
    ReachabilityChanged,
    SessionStateChanged,
    SyncRequested,
    ExerciseCompleted,
    WorkoutStartedFromWatch,
    WorkoutEndedFromWatch,
    VoiceLogSubmitted,
    HealthDataCaptured,
}

impl WatchEvent {
    pub fn kind(&self) -> WatchEventKind {
        match self {
            WatchEvent::Message { .. } => WatchEventKind::Message,
            WatchEvent::ReachabilityChanged { .. } => WatchEventKind::ReachabilityChanged,
            WatchEvent::SessionStateChanged { .. } => WatchEventKind::SessionStateChanged,
            WatchEvent::SyncRequested => WatchEventKind::SyncRequested,
            WatchEvent::ExerciseCompleted { .. } => WatchEventKind::ExerciseCompleted,
            WatchEvent::WorkoutStartedFromWatch { .. } => WatchEventKind::WorkoutStartedFromWatch,
            WatchEvent::WorkoutEndedFromWatch { .. } => WatchEventKind::WorkoutEndedFromWatch,
            WatchEvent::VoiceLogSubmitted { .. } => WatchEventKind::VoiceLogSubmitted,
            WatchEvent::HealthDataCaptured { .. } => WatchEventKind::HealthDataCaptured,
        }
    }
}

impl WatchEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchEventKind::Message => "message",
            WatchEventKind::ReachabilityChanged => "reachabilityChanged",
            WatchEventKind::SessionStateChanged => "sessionStateChanged",
            WatchEventKind::SyncRequested => "syncRequested",
            WatchEventKind::ExerciseCompleted => "exerciseCompleted",
            WatchEventKind::WorkoutStartedFromWatch => "workoutStartedFromWatch",
            WatchEventKind::WorkoutEndedFromWatch => "workoutEndedFromWatch",
            WatchEventKind::VoiceLogSubmitted => "voiceLogSubmitted",
            WatchEventKind::HealthDataCaptured => "healthDataCaptured",
        }
    }
}
