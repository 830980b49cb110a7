//! Detached host - standalone preview mode

use async_trait::async_trait;
use tokio::sync::broadcast;

use tempo_core::{ParticipantId, SyncSnapshot, TempoError, TempoResult};

use crate::{HostPlatform, MeetingContext};

/// Host platform stand-in for when no conferencing platform is detected.
///
/// Context fetch always fails, sends are swallowed, the subscription never
/// yields. The runtime reacts by granting unconditional local control.
pub struct DetachedHost {
    // Held so subscriptions stay open instead of erroring out.
    inbox: broadcast::Sender<SyncSnapshot>,
}

impl DetachedHost {
    pub fn new() -> Self {
        let (inbox, _) = broadcast::channel(1);
        DetachedHost { inbox }
    }
}

impl Default for DetachedHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostPlatform for DetachedHost {
    async fn fetch_context(&self) -> TempoResult<MeetingContext> {
        Err(TempoError::HostUnavailable(
            "no meeting platform detected".into(),
        ))
    }

    async fn send_to(&self, _target: &ParticipantId, _snapshot: &SyncSnapshot) -> TempoResult<()> {
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SyncSnapshot> {
        self.inbox.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_unavailable() {
        let host = DetachedHost::new();
        let err = host.fetch_context().await.unwrap_err();
        assert!(matches!(err, TempoError::HostUnavailable(_)));
    }

    #[tokio::test]
    async fn test_send_is_swallowed() {
        let host = DetachedHost::new();
        host.send_to(&ParticipantId::new("anyone"), &SyncSnapshot::default())
            .await
            .unwrap();
    }
}
