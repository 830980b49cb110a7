//! Host platform contract

use async_trait::async_trait;
use tokio::sync::broadcast;

use tempo_core::{
    MeetingId, ParticipantId, ParticipantRole, PermissionPolicy, SyncSnapshot, TempoResult,
};

/// Everything the host platform knows about the local participant's
/// meeting, fetched once per session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeetingContext {
    /// The meeting this countdown is bound to.
    pub meeting: MeetingId,
    /// The local participant.
    pub local_participant: ParticipantId,
    /// The local participant's role.
    pub role: ParticipantRole,
    /// Every other participant in the meeting - the broadcast targets.
    pub roster: Vec<ParticipantId>,
    /// The countdown permission policy configured for this meeting.
    pub policy: PermissionPolicy,
}

/// Capability interface over the host conferencing platform.
///
/// Delivery through `send_to` is best-effort and unordered across
/// recipients; a failure concerns that one recipient only.
#[async_trait]
pub trait HostPlatform: Send + Sync {
    /// Fetch the meeting context.
    ///
    /// # Errors
    ///
    /// `TempoError::HostUnavailable` when no platform is present (e.g.
    /// standalone preview). Callers degrade to local-only mode.
    async fn fetch_context(&self) -> TempoResult<MeetingContext>;

    /// Deliver a snapshot to one participant, best-effort.
    ///
    /// # Errors
    ///
    /// `TempoError::Transport` when this recipient could not be reached.
    async fn send_to(&self, target: &ParticipantId, snapshot: &SyncSnapshot) -> TempoResult<()>;

    /// Subscribe to snapshots addressed to the local participant.
    fn subscribe(&self) -> broadcast::Receiver<SyncSnapshot>;
}
