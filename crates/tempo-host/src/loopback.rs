//! In-memory host platform
//!
//! A hub connecting any number of in-process participants, used by the
//! test harness and the demos. Snapshots make a real JSON round trip on
//! every delivery so the wire codec is exercised, and any recipient can
//! be switched to drop deliveries to simulate loss.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use tempo_core::{
    MeetingId, ParticipantId, ParticipantRole, PermissionPolicy, SyncSnapshot, TempoError,
    TempoResult,
};

use crate::{HostPlatform, MeetingContext};

/// Inbound channel depth per participant.
const INBOX_CAPACITY: usize = 64;

struct Registration {
    role: ParticipantRole,
    inbox: broadcast::Sender<SyncSnapshot>,
    dropping: bool,
}

struct HubInner {
    meeting: MeetingId,
    policy: PermissionPolicy,
    participants: HashMap<ParticipantId, Registration>,
    offline: bool,
}

/// In-memory meeting hub.
#[derive(Clone)]
pub struct LoopbackHub {
    inner: Arc<Mutex<HubInner>>,
}

impl LoopbackHub {
    pub fn new(meeting: MeetingId, policy: PermissionPolicy) -> Self {
        LoopbackHub {
            inner: Arc::new(Mutex::new(HubInner {
                meeting,
                policy,
                participants: HashMap::new(),
                offline: false,
            })),
        }
    }

    /// Register a participant and hand back their platform endpoint.
    ///
    /// Re-joining under the same id replaces the previous registration.
    pub fn join(&self, id: ParticipantId, role: ParticipantRole) -> LoopbackHost {
        let (inbox, _) = broadcast::channel(INBOX_CAPACITY);
        let mut inner = self.inner.lock();
        inner.participants.insert(
            id.clone(),
            Registration {
                role,
                inbox: inbox.clone(),
                dropping: false,
            },
        );
        LoopbackHost {
            hub: Arc::clone(&self.inner),
            local: id,
            inbox,
        }
    }

    /// Take the whole platform down or bring it back: while offline,
    /// context fetches and sends fail as an undetected host would.
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    /// Make deliveries to `id` fail until switched back.
    pub fn set_dropping(&self, id: &ParticipantId, dropping: bool) {
        if let Some(reg) = self.inner.lock().participants.get_mut(id) {
            reg.dropping = dropping;
        }
    }

    /// Number of registered participants.
    pub fn participant_count(&self) -> usize {
        self.inner.lock().participants.len()
    }
}

/// One participant's endpoint on a [`LoopbackHub`].
pub struct LoopbackHost {
    hub: Arc<Mutex<HubInner>>,
    local: ParticipantId,
    inbox: broadcast::Sender<SyncSnapshot>,
}

#[async_trait]
impl HostPlatform for LoopbackHost {
    async fn fetch_context(&self) -> TempoResult<MeetingContext> {
        let inner = self.hub.lock();
        if inner.offline {
            return Err(TempoError::HostUnavailable(
                "meeting context not ready".into(),
            ));
        }
        let reg = inner
            .participants
            .get(&self.local)
            .ok_or_else(|| TempoError::HostUnavailable("participant left the meeting".into()))?;
        let roster = inner
            .participants
            .keys()
            .filter(|id| **id != self.local)
            .cloned()
            .collect();
        Ok(MeetingContext {
            meeting: inner.meeting.clone(),
            local_participant: self.local.clone(),
            role: reg.role,
            roster,
            policy: inner.policy,
        })
    }

    async fn send_to(&self, target: &ParticipantId, snapshot: &SyncSnapshot) -> TempoResult<()> {
        // Round-trip through the JSON wire form, as a real SDK send would.
        let wire = snapshot.to_json()?;
        let delivered = SyncSnapshot::from_json(&wire)?;

        let inner = self.hub.lock();
        if inner.offline {
            return Err(TempoError::Transport("platform offline".into()));
        }
        let reg = inner
            .participants
            .get(target)
            .ok_or_else(|| TempoError::UnknownParticipant(target.to_string()))?;
        if reg.dropping {
            return Err(TempoError::Transport(format!(
                "recipient {target} unreachable"
            )));
        }
        // A closed inbox just means nobody is listening yet.
        let _ = reg.inbox.send(delivered);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SyncSnapshot> {
        self.inbox.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> LoopbackHub {
        LoopbackHub::new(MeetingId::new("m-1"), PermissionPolicy::default())
    }

    #[tokio::test]
    async fn test_context_lists_other_participants() {
        let hub = hub();
        let alice = hub.join(ParticipantId::new("alice"), ParticipantRole::Organizer);
        let _bob = hub.join(ParticipantId::new("bob"), ParticipantRole::Attendee);

        let ctx = alice.fetch_context().await.unwrap();
        assert_eq!(ctx.local_participant, ParticipantId::new("alice"));
        assert_eq!(ctx.role, ParticipantRole::Organizer);
        assert_eq!(ctx.roster, vec![ParticipantId::new("bob")]);
    }

    #[tokio::test]
    async fn test_send_reaches_subscriber() {
        let hub = hub();
        let alice = hub.join(ParticipantId::new("alice"), ParticipantRole::Organizer);
        let bob = hub.join(ParticipantId::new("bob"), ParticipantRole::Attendee);

        let mut rx = bob.subscribe();
        let snap = SyncSnapshot::full(45, true, false);
        alice
            .send_to(&ParticipantId::new("bob"), &snap)
            .await
            .unwrap();
        assert_eq!(rx.recv().await.unwrap(), snap);
    }

    #[tokio::test]
    async fn test_dropping_recipient_errors() {
        let hub = hub();
        let alice = hub.join(ParticipantId::new("alice"), ParticipantRole::Organizer);
        let _bob = hub.join(ParticipantId::new("bob"), ParticipantRole::Attendee);

        hub.set_dropping(&ParticipantId::new("bob"), true);
        let err = alice
            .send_to(&ParticipantId::new("bob"), &SyncSnapshot::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TempoError::Transport(_)));
    }

    #[tokio::test]
    async fn test_unknown_recipient_errors() {
        let hub = hub();
        let alice = hub.join(ParticipantId::new("alice"), ParticipantRole::Organizer);
        let err = alice
            .send_to(&ParticipantId::new("ghost"), &SyncSnapshot::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TempoError::UnknownParticipant(_)));
    }
}
