//! Synchronization snapshots
//!
//! A snapshot is the partial state triple the controller broadcasts after
//! every transition and every tick. All fields are optional: a receiver
//! only overwrites the fields that are present and leaves the rest of its
//! local state alone.

use serde::{Deserialize, Serialize};

use crate::{TempoError, TempoResult};

/// Partial countdown state as exchanged between participants.
///
/// Wire format is JSON with the host platform's field naming, e.g.
/// `{"remainingSeconds":45,"running":true,"paused":false}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    /// Seconds left on the countdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Whether the countdown is running (true while paused as well).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    /// Whether the countdown is paused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
}

impl SyncSnapshot {
    /// Snapshot with every field present.
    pub fn full(remaining_seconds: u32, running: bool, paused: bool) -> Self {
        SyncSnapshot {
            remaining_seconds: Some(remaining_seconds),
            running: Some(running),
            paused: Some(paused),
        }
    }

    /// True when no field is present; applying it is always a no-op.
    pub fn is_empty(&self) -> bool {
        self.remaining_seconds.is_none() && self.running.is_none() && self.paused.is_none()
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> TempoResult<String> {
        serde_json::to_string(self).map_err(|e| TempoError::Codec(e.to_string()))
    }

    /// Parse from the JSON wire form. Unknown fields are ignored.
    pub fn from_json(raw: &str) -> TempoResult<Self> {
        serde_json::from_str(raw).map_err(|e| TempoError::Codec(e.to_string()))
    }
}
