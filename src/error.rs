//! Error types for wristlink
//!
//! The synchronization layer has no fatal paths: degraded transports and
//! unrecognized payloads resolve locally to neutral no-ops. The one fallible
//! internal seam is outbound payload encoding.

use thiserror::Error;

/// Errors raised while building outbound payloads
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to encode outbound payload: {0}")]
    Encode(#[from] serde_json::Error),
}
