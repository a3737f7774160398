//! Outbound push protocol
//!
//! State flows phone-to-companion as `{type, timestamp, data}` envelopes,
//! symmetric with the inbound wire shape, so the companion parses one
//! envelope in both directions. Encoding the `data` value is the single
//! fallible seam of the whole layer.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::error::SyncError;

/// Kinds of state pushed from the phone to the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    SyncAuth,
    SyncWorkout,
    SyncDailyLog,
    SyncWellnessScore,
    SyncMenstrualPhase,
    WorkoutStarted,
    WorkoutEnded,
    UpdateComplication,
}

impl PushKind {
    /// Wire tag for this push kind
    pub fn as_str(&self) -> &'static str {
        match self {
            PushKind::SyncAuth => "sync_auth",
            PushKind::SyncWorkout => "sync_workout",
            PushKind::SyncDailyLog => "sync_daily_log",
            PushKind::SyncWellnessScore => "sync_wellness_score",
            PushKind::SyncMenstrualPhase => "sync_menstrual_phase",
            PushKind::WorkoutStarted => "workout_started",
            PushKind::WorkoutEnded => "workout_ended",
            PushKind::UpdateComplication => "update_complication",
        }
    }
}

/// One outbound push envelope
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub kind: PushKind,
    /// Milliseconds since the Unix epoch, set at build time
    pub timestamp: i64,
    pub data: Value,
}

impl OutboundMessage {
    /// Build an envelope around the serialized `data` value.
    pub fn new<T: Serialize + ?Sized>(kind: PushKind, data: &T) -> Result<Self, SyncError> {
        Ok(Self {
            kind,
            timestamp: Utc::now().timestamp_millis(),
            data: serde_json::to_value(data)?,
        })
    }

    /// Flatten into the JSON value handed to the transport.
    pub fn into_value(self) -> Value {
        serde_json::json!({
            "type": self.kind.as_str(),
            "timestamp": self.timestamp,
            "data": self.data,
        })
    }
}
