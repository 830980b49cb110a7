//! Timer node - runtime wiring for one participant
//!
//! The node owns the shared state behind one mutex, never held across an
//! await. Outbound snapshots go through one ordered queue drained by a
//! single broadcaster task, so two rapid transitions can never reach a
//! viewer out of order and delivery latency never blocks a control
//! action. The tick schedule carries a generation stamp so a callback
//! racing a cancellation is a no-op.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use tempo_core::{
    parse_time_field, ControlDecision, ControlMode, SyncSnapshot, TickOutcome, TimerPhase,
    TimerState,
};
use tempo_host::{HostPlatform, MeetingContext};

use crate::NodeConfig;

struct Inner {
    timer: TimerState,
    decision: ControlDecision,
    context: Option<MeetingContext>,
    last_host_error: Option<String>,
    /// Live schedule task, present exactly while the countdown runs.
    schedule: Option<JoinHandle<()>>,
    /// Bumped on every schedule arm/cancel; stale callbacks check it.
    generation: u64,
}

struct Shared {
    platform: Arc<dyn HostPlatform>,
    config: NodeConfig,
    /// Ordered outbound queue; the broadcaster drains it sequentially.
    outbound: mpsc::UnboundedSender<SyncSnapshot>,
    inner: Mutex<Inner>,
}

/// Diagnostic snapshot of a node, for display and debug areas.
#[derive(Clone, Debug)]
pub struct NodeStatus {
    pub clock_face: String,
    pub phase: TimerPhase,
    pub remaining: u32,
    pub low_time: bool,
    pub mode: ControlMode,
    pub has_control: bool,
    /// Host initialization failure, surfaced passively.
    pub last_host_error: Option<String>,
}

/// The per-participant countdown node.
///
/// Construct with [`TimerNode::connect`]; all control-surface methods are
/// cheap and non-blocking and must be called from within a tokio runtime.
pub struct TimerNode {
    shared: Arc<Shared>,
    inbound: JoinHandle<()>,
    broadcaster: JoinHandle<()>,
}

impl TimerNode {
    /// Connect to the host platform and start the inbound loop.
    ///
    /// When the platform cannot supply a meeting context the node runs in
    /// local-only mode: unconditional control, no synchronization, and the
    /// failure message retained in [`NodeStatus::last_host_error`].
    pub async fn connect(platform: Arc<dyn HostPlatform>, config: NodeConfig) -> Self {
        let (context, decision, last_host_error) = match platform.fetch_context().await {
            Ok(ctx) => {
                let decision = ControlDecision::from_policy(ctx.role, &ctx.policy);
                tracing::info!(
                    meeting = %ctx.meeting,
                    role = ?ctx.role,
                    has_control = decision.has_control,
                    "joined meeting"
                );
                (Some(ctx), decision, None)
            }
            Err(e) => {
                tracing::info!(error = %e, "no meeting context, running local-only");
                (None, ControlDecision::local(), Some(e.to_string()))
            }
        };

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            platform: Arc::clone(&platform),
            config,
            outbound,
            inner: Mutex::new(Inner {
                timer: TimerState::new(),
                decision,
                context,
                last_host_error,
                schedule: None,
                generation: 0,
            }),
        });
        let inbound = tokio::spawn(Shared::inbound_loop(Arc::clone(&shared)));
        let broadcaster = tokio::spawn(broadcast_loop(platform, outbound_rx));
        TimerNode {
            shared,
            inbound,
            broadcaster,
        }
    }

    /// Arm the countdown from the two numeric fields.
    pub fn set(&self, minutes: u32, seconds: u32) -> bool {
        self.mutate(|t| t.set(minutes, seconds))
    }

    /// Arm the countdown from raw control-surface text.
    pub fn set_from_fields(&self, minutes: &str, seconds: &str) -> bool {
        self.set(parse_time_field(minutes), parse_time_field(seconds))
    }

    /// Start an armed countdown.
    pub fn start(&self) -> bool {
        self.mutate(TimerState::start)
    }

    /// Suspend a running countdown.
    pub fn pause(&self) -> bool {
        self.mutate(TimerState::pause)
    }

    /// Resume a paused countdown.
    pub fn resume(&self) -> bool {
        self.mutate(TimerState::resume)
    }

    /// Single pause/resume button.
    pub fn toggle_pause(&self) -> bool {
        self.mutate(TimerState::toggle_pause)
    }

    /// Discard the countdown from any state.
    pub fn reset(&self) -> bool {
        self.mutate(TimerState::reset)
    }

    /// Re-fetch the meeting context and recompute the control decision.
    ///
    /// Role and policy never change through timer actions; they only move
    /// when the host delivers a fresh context - e.g. when the platform
    /// comes up after a local-only start. Returns whether the decision
    /// changed. On failure the previous decision stands and the error is
    /// retained for diagnostics.
    pub async fn refresh_context(&self) -> bool {
        match self.shared.platform.fetch_context().await {
            Ok(ctx) => {
                let decision = ControlDecision::from_policy(ctx.role, &ctx.policy);
                let mut inner = self.shared.inner.lock();
                let changed = inner.decision != decision;
                if changed {
                    tracing::info!(
                        role = ?ctx.role,
                        has_control = decision.has_control,
                        "control decision refreshed"
                    );
                }
                inner.decision = decision;
                inner.context = Some(ctx);
                inner.last_host_error = None;
                changed
            }
            Err(e) => {
                self.shared.inner.lock().last_host_error = Some(e.to_string());
                false
            }
        }
    }

    /// Copy of the current countdown state.
    pub fn state(&self) -> TimerState {
        self.shared.inner.lock().timer
    }

    /// Whether the local participant currently holds control.
    pub fn has_control(&self) -> bool {
        self.shared.inner.lock().decision.has_control
    }

    /// Diagnostic snapshot.
    pub fn status(&self) -> NodeStatus {
        let inner = self.shared.inner.lock();
        NodeStatus {
            clock_face: inner.timer.clock_face(),
            phase: inner.timer.phase(),
            remaining: inner.timer.remaining(),
            low_time: inner.timer.is_low_time(),
            mode: inner.decision.mode,
            has_control: inner.decision.has_control,
            last_host_error: inner.last_host_error.clone(),
        }
    }

    /// Gate, apply, re-sync the schedule, broadcast. Unauthorized or
    /// rejected actions fall through silently.
    fn mutate(&self, op: impl FnOnce(&mut TimerState) -> bool) -> bool {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if !inner.decision.has_control {
            tracing::debug!("control action ignored: no control");
            return false;
        }
        if !op(&mut inner.timer) {
            return false;
        }
        tracing::debug!(state = %inner.timer, "control action applied");
        Shared::sync_schedule(shared, &mut inner);
        if let Some(snapshot) = Shared::outbound_locked(&inner) {
            let _ = shared.outbound.send(snapshot);
        }
        true
    }
}

impl Drop for TimerNode {
    fn drop(&mut self) {
        self.inbound.abort();
        self.broadcaster.abort();
        let mut inner = self.shared.inner.lock();
        if let Some(task) = inner.schedule.take() {
            task.abort();
        }
        inner.generation = inner.generation.wrapping_add(1);
    }
}

impl Shared {
    /// Drain the platform subscription, applying snapshots as they come.
    async fn inbound_loop(shared: Arc<Shared>) {
        let mut rx = shared.platform.subscribe();
        loop {
            match rx.recv().await {
                Ok(snapshot) => Shared::apply_inbound(&shared, &snapshot),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "inbound snapshots dropped, latest state wins");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Receiver path: overwrite local state, no authorization, no
    /// re-emission.
    fn apply_inbound(shared: &Arc<Shared>, snapshot: &SyncSnapshot) {
        let mut inner = shared.inner.lock();
        if inner.timer.apply(snapshot) {
            tracing::debug!(state = %inner.timer, "inbound snapshot applied");
            Shared::sync_schedule(shared, &mut inner);
        }
    }

    /// Keep the schedule in lockstep with the phase: armed exactly while
    /// running, cancelled on any way out.
    fn sync_schedule(shared: &Arc<Shared>, inner: &mut Inner) {
        match (inner.schedule.is_some(), inner.timer.is_running()) {
            (false, true) => {
                inner.generation = inner.generation.wrapping_add(1);
                let task = tokio::spawn(Shared::run_schedule(
                    Arc::clone(shared),
                    inner.generation,
                ));
                inner.schedule = Some(task);
            }
            (true, false) => {
                if let Some(task) = inner.schedule.take() {
                    task.abort();
                }
                inner.generation = inner.generation.wrapping_add(1);
            }
            _ => {}
        }
    }

    /// The countdown schedule: one decrement per interval until expiry or
    /// cancellation. A stale generation means this schedule was cancelled
    /// between firing and locking - then the callback must change nothing.
    async fn run_schedule(shared: Arc<Shared>, generation: u64) {
        let period = shared.config.tick_interval;
        let mut interval = interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            let mut inner = shared.inner.lock();
            if inner.generation != generation {
                return;
            }
            let outcome = inner.timer.tick();
            let done = match outcome {
                TickOutcome::Ignored => return,
                TickOutcome::Decremented(_) => false,
                TickOutcome::Expired => {
                    tracing::debug!("countdown expired");
                    inner.schedule = None;
                    inner.generation = inner.generation.wrapping_add(1);
                    true
                }
            };
            if let Some(snapshot) = Shared::outbound_locked(&inner) {
                let _ = shared.outbound.send(snapshot);
            }
            if done {
                return;
            }
            drop(inner);
        }
    }

    /// Broadcast payload, only while this node holds control inside a
    /// hosted meeting.
    fn outbound_locked(inner: &Inner) -> Option<SyncSnapshot> {
        if !inner.decision.has_control || inner.context.is_none() {
            return None;
        }
        Some(inner.timer.snapshot())
    }
}

/// Drain the outbound queue in order, one snapshot at a time.
async fn broadcast_loop(
    platform: Arc<dyn HostPlatform>,
    mut rx: mpsc::UnboundedReceiver<SyncSnapshot>,
) {
    while let Some(snapshot) = rx.recv().await {
        fan_out(&platform, &snapshot).await;
    }
}

/// Per-recipient best-effort delivery. The roster is re-read at each
/// emission so late joiners catch the next broadcast; a failed recipient
/// is logged and skipped and the rest of the fan-out continues.
async fn fan_out(platform: &Arc<dyn HostPlatform>, snapshot: &SyncSnapshot) {
    let roster = match platform.fetch_context().await {
        Ok(ctx) => ctx.roster,
        Err(e) => {
            tracing::debug!(error = %e, "roster unavailable, skipping broadcast");
            return;
        }
    };
    for target in &roster {
        if let Err(e) = platform.send_to(target, snapshot).await {
            tracing::warn!(participant = %target, error = %e, "snapshot delivery failed");
        }
    }
}
