//! TEMPO Harness - simulated meetings for end-to-end testing
//!
//! Builds a loopback meeting with any mix of roles, one runtime node per
//! participant, and helpers to step simulated time. Used by the
//! convergence tests; handy for interactive experiments too.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tempo_core::{MeetingId, ParticipantId, ParticipantRole, PermissionPolicy};
use tempo_host::LoopbackHub;
use tempo_runtime::{NodeConfig, TimerNode};

/// A simulated meeting: a loopback hub plus one node per participant.
pub struct MeetingSim {
    hub: LoopbackHub,
    nodes: HashMap<ParticipantId, TimerNode>,
}

impl MeetingSim {
    /// Build a meeting: register every participant first (so each node
    /// sees the full roster), then connect their nodes.
    pub async fn build(
        policy: PermissionPolicy,
        participants: &[(&str, ParticipantRole)],
    ) -> Self {
        let hub = LoopbackHub::new(MeetingId::new("sim-meeting"), policy);
        let endpoints: Vec<_> = participants
            .iter()
            .map(|(name, role)| {
                let id = ParticipantId::new(*name);
                let host = hub.join(id.clone(), *role);
                (id, host)
            })
            .collect();

        let mut nodes = HashMap::new();
        for (id, host) in endpoints {
            let node = TimerNode::connect(Arc::new(host), NodeConfig::default()).await;
            nodes.insert(id, node);
        }
        MeetingSim { hub, nodes }
    }

    /// Add a participant to an already-running meeting.
    pub async fn join_late(&mut self, name: &str, role: ParticipantRole) -> ParticipantId {
        let id = ParticipantId::new(name);
        let host = self.hub.join(id.clone(), role);
        let node = TimerNode::connect(Arc::new(host), NodeConfig::default()).await;
        self.nodes.insert(id.clone(), node);
        id
    }

    /// The node of one participant.
    ///
    /// # Panics
    ///
    /// Panics when `name` was never registered - a harness misuse.
    pub fn node(&self, name: &str) -> &TimerNode {
        self.nodes
            .get(&ParticipantId::new(name))
            .unwrap_or_else(|| panic!("unknown sim participant: {name}"))
    }

    /// The underlying hub, for loss injection.
    pub fn hub(&self) -> &LoopbackHub {
        &self.hub
    }

    /// Stop deliveries to one participant.
    pub fn drop_recipient(&self, name: &str, dropping: bool) {
        self.hub
            .set_dropping(&ParticipantId::new(name), dropping);
    }
}

/// Let spawned tasks (fan-out, inbound application) run to completion.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused test clock by `n` one-second ticks, settling after
/// each so every node observes every broadcast in order.
pub async fn advance_ticks(n: u32) {
    for _ in 0..n {
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }
}
