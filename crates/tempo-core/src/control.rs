//! Roles, permission policy, and control resolution
//!
//! Exactly one participant at a time is expected to drive the countdown.
//! Whether the local participant may do so is a pure function of their
//! role and the meeting's permission policy - nothing a timer action can
//! ever change.

use serde::{Deserialize, Serialize};

/// Participant role as reported by the host meeting context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Organizer,
    Presenter,
    Coorganizer,
    Attendee,
}

impl ParticipantRole {
    /// Parse a host SDK role string, case-insensitively.
    ///
    /// Unknown strings map to `Attendee` - the least-privileged reading.
    pub fn from_sdk(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "organizer" => ParticipantRole::Organizer,
            "presenter" => ParticipantRole::Presenter,
            "coorganizer" | "co-organizer" => ParticipantRole::Coorganizer,
            _ => ParticipantRole::Attendee,
        }
    }
}

/// Who besides the organizer may drive the countdown.
///
/// Loaded once per session from the host settings snapshot; immutable
/// afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermissionPolicy {
    /// Only the organizer controls the countdown, whatever else is set.
    pub organizer_only: bool,
    /// Presenters may control the countdown.
    pub presenters_allowed: bool,
    /// Co-organizers may control the countdown.
    pub coorganizers_allowed: bool,
}

impl PermissionPolicy {
    /// Parse a settings snapshot. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> crate::TempoResult<Self> {
        serde_json::from_str(raw).map_err(|e| crate::TempoError::Codec(e.to_string()))
    }
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        PermissionPolicy {
            organizer_only: true,
            presenters_allowed: false,
            coorganizers_allowed: false,
        }
    }
}

/// Whether `role` may drive the countdown under `policy`.
pub fn resolve(role: ParticipantRole, policy: &PermissionPolicy) -> bool {
    match role {
        ParticipantRole::Organizer => true,
        _ if policy.organizer_only => false,
        ParticipantRole::Presenter => policy.presenters_allowed,
        ParticipantRole::Coorganizer => policy.coorganizers_allowed,
        ParticipantRole::Attendee => false,
    }
}

/// Where the control decision came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    /// Hosted: role and policy from the meeting context.
    Meeting,
    /// No host platform detected: standalone preview, unconditional
    /// control, no synchronization. A convenience fallback, not a
    /// security boundary.
    Local,
}

/// The resolved control decision for the local participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlDecision {
    pub mode: ControlMode,
    pub has_control: bool,
}

impl ControlDecision {
    /// Decision for a hosted session.
    pub fn from_policy(role: ParticipantRole, policy: &PermissionPolicy) -> Self {
        ControlDecision {
            mode: ControlMode::Meeting,
            has_control: resolve(role, policy),
        }
    }

    /// Fail-open decision for a standalone preview.
    pub fn local() -> Self {
        ControlDecision {
            mode: ControlMode::Local,
            has_control: true,
        }
    }
}
