//! Wristlink - phone-side synchronization layer for wrist companion devices
//!
//! Wristlink keeps a paired wrist-worn companion application consistent with
//! the phone's authoritative state over an unreliable, intermittently
//! reachable transport: it pushes state snapshots out (best-effort, fire and
//! forget), classifies events reported back by the companion, and fans those
//! events out to decoupled in-process subscribers.
//!
//! ## Modules
//!
//! - **types**: the synchronizable state model (workouts, daily logs,
//!   complication projections, health metrics)
//! - **message / router**: the inbound protocol and its classification into
//!   typed events
//! - **events / bus**: the typed event model and ordered publish/subscribe
//!   fan-out
//! - **outbound**: the `{type, timestamp, data}` push envelope
//! - **transport**: the narrow facade the platform binding implements
//! - **link**: [`WatchLink`], the single public entry point
//!
//! The layer has no fatal paths: on platforms without a companion facility
//! every operation degrades to a documented neutral no-op.

pub mod bus;
pub mod error;
pub mod events;
pub mod link;
pub mod message;
pub mod outbound;
mod router;
pub mod transport;
pub mod types;

pub use bus::{EventBus, Subscription};
pub use error::SyncError;
pub use events::{WatchEvent, WatchEventKind};
pub use link::WatchLink;
pub use message::{MessageEnvelope, WatchMessage};
pub use outbound::{OutboundMessage, PushKind};
pub use transport::{
    ChannelHandler, CompanionTransport, SendOutcome, TransportChannel, TransportSubscription,
};
pub use types::{
    ComplicationData, HealthMetrics, MenstrualPhaseInfo, WatchAuthState, WatchDailyLog,
    WatchExercise, WatchWorkout, WeightUnit, WorkoutStatus,
};
