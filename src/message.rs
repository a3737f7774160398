//! Inbound message protocol
//!
//! Every payload arriving on the transport's message channel is untrusted
//! input. Decoding is tolerant by contract: an unknown type tag, or malformed
//! `data` under a known tag, yields `None` rather than an error, so future
//! companion-app message types are forward-compatible no-ops on the phone.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{HealthMetrics, WorkoutStatus};

/// Wire envelope shared by every inbound payload
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEnvelope {
    /// Type tag; the closed enumeration is [`WatchMessage`]
    #[serde(rename = "type")]
    pub kind: String,
    /// Milliseconds since the Unix epoch, set by the sender
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub data: Value,
}

/// Closed enumeration of messages the companion device can send.
///
/// Each variant carries only the fields relevant to its tag; the envelope
/// timestamp stays on [`MessageEnvelope`].
#[derive(Debug, Clone, PartialEq)]
pub enum WatchMessage {
    /// The companion wants a fresh snapshot of all pushed state
    RequestSync,
    ExerciseCompleted {
        exercise_id: String,
        workout_id: String,
    },
    WorkoutStatusChanged {
        workout_id: String,
        status: WorkoutStatus,
    },
    VoiceLogSubmitted {
        text: String,
    },
    HealthDataCaptured {
        metrics: HealthMetrics,
    },
    WorkoutStartedFromWatch {
        workout_id: String,
    },
    WorkoutEndedFromWatch {
        workout_id: String,
        metrics: HealthMetrics,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseCompletedData {
    exercise_id: String,
    workout_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutRefData {
    workout_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutStatusData {
    workout_id: String,
    status: WorkoutStatus,
}

#[derive(Deserialize)]
struct VoiceLogData {
    #[serde(alias = "transcription")]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutEndedData {
    workout_id: String,
    #[serde(flatten)]
    metrics: HealthMetrics,
}

impl WatchMessage {
    /// Decode an untrusted inbound payload.
    ///
    /// Returns `None` for anything that is not a well-formed envelope with a
    /// known tag and matching `data` fields. Never panics.
    pub fn decode(payload: &Value) -> Option<WatchMessage> {
        let envelope: MessageEnvelope = serde_json::from_value(payload.clone()).ok()?;
        Self::from_envelope(&envelope)
    }

    /// Classify an already-parsed envelope by its type tag.
    pub fn from_envelope(envelope: &MessageEnvelope) -> Option<WatchMessage> {
        match envelope.kind.as_str() {
            "request_sync" => Some(WatchMessage::RequestSync),
            "exercise_completed" => {
                let data: ExerciseCompletedData = parse_data(&envelope.data)?;
                Some(WatchMessage::ExerciseCompleted {
                    exercise_id: data.exercise_id,
                    workout_id: data.workout_id,
                })
            }
            "workout_status_changed" => {
                let data: WorkoutStatusData = parse_data(&envelope.data)?;
                Some(WatchMessage::WorkoutStatusChanged {
                    workout_id: data.workout_id,
                    status: data.status,
                })
            }
            "voice_log_submitted" => {
                let data: VoiceLogData = parse_data(&envelope.data)?;
                Some(WatchMessage::VoiceLogSubmitted { text: data.text })
            }
            "health_data_captured" => {
                let metrics: HealthMetrics = parse_data(&envelope.data)?;
                Some(WatchMessage::HealthDataCaptured { metrics })
            }
            "workout_started_from_watch" => {
                let data: WorkoutRefData = parse_data(&envelope.data)?;
                Some(WatchMessage::WorkoutStartedFromWatch {
                    workout_id: data.workout_id,
                })
            }
            "workout_ended_from_watch" => {
                let data: WorkoutEndedData = parse_data(&envelope.data)?;
                Some(WatchMessage::WorkoutEndedFromWatch {
                    workout_id: data.workout_id,
                    metrics: data.metrics,
                })
            }
            // Unknown tags are inert: the companion may be a newer build.
            _ => None,
        }
    }
}

fn parse_data<T: DeserializeOwned>(data: &Value) -> Option<T> {
    serde_json::from_value(data.clone()).ok()
}
