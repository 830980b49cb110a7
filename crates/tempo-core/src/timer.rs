//! Countdown state machine
//!
//! One countdown per meeting. The machine is a plain value: the runtime
//! decides who may mutate it and when snapshots go out, receivers apply
//! inbound snapshots straight onto it.
//!
//! INVARIANT: `Running` and `Paused` always carry `remaining > 0`;
//! `remaining == 0` is always `Idle`. An `Idle` state with `remaining > 0`
//! is *armed*: a value was set but the countdown has not started.

use std::fmt;

use crate::SyncSnapshot;

/// Display turns urgent at or below this many remaining seconds.
pub const LOW_TIME_THRESHOLD: u32 = 30;

/// Countdown run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerPhase {
    /// Not counting. `remaining` may be zero or an armed value.
    Idle,
    /// Counting down once per second.
    Running,
    /// Counting suspended, `remaining` frozen.
    Paused,
}

/// Outcome of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Decremented, countdown continues.
    Decremented(u32),
    /// Reached zero: natural expiry, now `Idle(0)`.
    Expired,
    /// Not running; nothing happened.
    Ignored,
}

/// The shared countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerState {
    remaining: u32,
    phase: TimerPhase,
}

impl TimerState {
    /// New countdown at zero, idle.
    pub fn new() -> Self {
        TimerState {
            remaining: 0,
            phase: TimerPhase::Idle,
        }
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == TimerPhase::Idle
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }

    /// Armed: a value is set but the countdown has not started.
    pub fn is_armed(&self) -> bool {
        self.phase == TimerPhase::Idle && self.remaining > 0
    }

    /// Arm the countdown with `minutes:seconds`.
    ///
    /// Only valid while idle; `0:00` is rejected. Returns whether state
    /// changed.
    pub fn set(&mut self, minutes: u32, seconds: u32) -> bool {
        if self.phase != TimerPhase::Idle {
            return false;
        }
        let total = minutes * 60 + seconds;
        if total == 0 {
            return false;
        }
        self.remaining = total;
        true
    }

    /// Start an armed countdown.
    pub fn start(&mut self) -> bool {
        if self.phase != TimerPhase::Idle || self.remaining == 0 {
            return false;
        }
        self.phase = TimerPhase::Running;
        true
    }

    /// Suspend a running countdown.
    pub fn pause(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.phase = TimerPhase::Paused;
        true
    }

    /// Resume a paused countdown.
    pub fn resume(&mut self) -> bool {
        if self.phase != TimerPhase::Paused {
            return false;
        }
        self.phase = TimerPhase::Running;
        true
    }

    /// Single pause/resume control, as exposed by a one-button surface.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            TimerPhase::Running => self.pause(),
            TimerPhase::Paused => self.resume(),
            TimerPhase::Idle => false,
        }
    }

    /// Back to `Idle(0)` from any state, discarding any armed value.
    pub fn reset(&mut self) -> bool {
        if self.phase == TimerPhase::Idle && self.remaining == 0 {
            return false;
        }
        self.remaining = 0;
        self.phase = TimerPhase::Idle;
        true
    }

    /// Advance the countdown by one second.
    ///
    /// Ignored outside `Running`, so a stale schedule callback firing after
    /// pause or reset cannot decrement.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != TimerPhase::Running {
            return TickOutcome::Ignored;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.phase = TimerPhase::Idle;
            TickOutcome::Expired
        } else {
            TickOutcome::Decremented(self.remaining)
        }
    }

    /// Apply an inbound snapshot, overwriting only the fields present.
    ///
    /// Receiver path: no authorization, no re-emission. The merged result is
    /// normalized back onto the machine invariants. Returns whether state
    /// changed.
    pub fn apply(&mut self, snap: &SyncSnapshot) -> bool {
        let remaining = snap.remaining_seconds.unwrap_or(self.remaining);
        let running = snap
            .running
            .unwrap_or(self.phase != TimerPhase::Idle);
        let paused = snap.paused.unwrap_or(self.phase == TimerPhase::Paused);

        let phase = if remaining == 0 || !running {
            TimerPhase::Idle
        } else if paused {
            TimerPhase::Paused
        } else {
            TimerPhase::Running
        };

        let next = TimerState { remaining, phase };
        let changed = next != *self;
        *self = next;
        changed
    }

    /// Full snapshot of the current state.
    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot::full(
            self.remaining,
            self.phase != TimerPhase::Idle,
            self.phase == TimerPhase::Paused,
        )
    }

    /// `m:ss` clock face, e.g. `1:30` or `0:05`.
    pub fn clock_face(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    /// Urgency flag: running at or below [`LOW_TIME_THRESHOLD`]. Not urgent
    /// while paused.
    pub fn is_low_time(&self) -> bool {
        self.phase == TimerPhase::Running && self.remaining <= LOW_TIME_THRESHOLD
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.phase, self.clock_face())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn running(t: u32) -> TimerState {
        let mut state = TimerState::new();
        assert!(state.set(t / 60, t % 60));
        assert!(state.start());
        state
    }

    #[test]
    fn test_new_is_idle_zero() {
        let state = TimerState::new();
        assert_eq!(state.phase(), TimerPhase::Idle);
        assert_eq!(state.remaining(), 0);
        assert!(!state.is_armed());
    }

    #[test]
    fn test_set_zero_rejected() {
        let mut state = TimerState::new();
        assert!(!state.set(0, 0));
        assert_eq!(state, TimerState::new());
    }

    #[test]
    fn test_set_only_while_idle() {
        let mut state = running(10);
        assert!(!state.set(2, 0));
        assert_eq!(state.remaining(), 10);

        assert!(state.pause());
        assert!(!state.set(2, 0));
        assert_eq!(state.remaining(), 10);
    }

    #[test]
    fn test_start_requires_armed_value() {
        let mut state = TimerState::new();
        assert!(!state.start());

        assert!(state.set(0, 5));
        assert!(state.is_armed());
        assert!(state.start());
        assert_eq!(state.phase(), TimerPhase::Running);
        assert_eq!(state.remaining(), 5);

        // Already running
        assert!(!state.start());
    }

    #[test]
    fn test_tick_expiry() {
        let mut state = running(2);
        assert_eq!(state.tick(), TickOutcome::Decremented(1));
        assert_eq!(state.tick(), TickOutcome::Expired);
        assert_eq!(state, TimerState::new());
        // Spurious tick after expiry
        assert_eq!(state.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_tick_ignored_while_paused() {
        let mut state = running(10);
        assert!(state.pause());
        assert_eq!(state.tick(), TickOutcome::Ignored);
        assert_eq!(state.remaining(), 10);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut armed = TimerState::new();
        assert!(armed.set(1, 0));
        assert!(armed.reset());
        assert_eq!(armed, TimerState::new());

        let mut run = running(30);
        assert!(run.reset());
        assert_eq!(run, TimerState::new());

        // Reset at idle zero is a no-op
        assert!(!run.reset());
    }

    #[test]
    fn test_full_scenario_one_thirty() {
        let mut state = TimerState::new();
        assert!(state.set(1, 30));
        assert!(state.start());
        assert_eq!(state.remaining(), 90);

        for _ in 0..89 {
            assert!(matches!(state.tick(), TickOutcome::Decremented(_)));
        }
        assert_eq!(state.tick(), TickOutcome::Expired);
        assert_eq!(state, TimerState::new());
        assert_eq!(state.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_apply_overwrites_without_emitting() {
        let mut state = TimerState::new();
        let changed = state.apply(&SyncSnapshot::full(45, true, false));
        assert!(changed);
        assert_eq!(state.phase(), TimerPhase::Running);
        assert_eq!(state.remaining(), 45);

        // Same snapshot again: no change
        assert!(!state.apply(&SyncSnapshot::full(45, true, false)));
    }

    #[test]
    fn test_apply_partial_fields() {
        let mut state = running(45);
        // Pause arrives as a lone flag
        assert!(state.apply(&SyncSnapshot {
            paused: Some(true),
            ..SyncSnapshot::default()
        }));
        assert_eq!(state.phase(), TimerPhase::Paused);
        assert_eq!(state.remaining(), 45);
    }

    #[test]
    fn test_apply_normalizes_invariants() {
        let mut state = running(10);
        // Zero remaining collapses to idle whatever the flags say
        assert!(state.apply(&SyncSnapshot::full(0, true, true)));
        assert_eq!(state, TimerState::new());

        // paused without running is not a countdown
        assert!(state.apply(&SyncSnapshot::full(7, false, true)));
        assert_eq!(state.phase(), TimerPhase::Idle);
        assert_eq!(state.remaining(), 7);
        assert!(state.is_armed());
    }

    #[test]
    fn test_clock_face() {
        let mut state = TimerState::new();
        assert_eq!(state.clock_face(), "0:00");
        state.set(1, 30);
        assert_eq!(state.clock_face(), "1:30");
        state.reset();
        state.set(0, 5);
        assert_eq!(state.clock_face(), "0:05");
    }

    #[test]
    fn test_low_time_only_while_running() {
        let mut state = running(30);
        assert!(state.is_low_time());
        state.pause();
        assert!(!state.is_low_time());
        state.resume();
        state.reset();
        assert!(!state.is_low_time());

        let high = running(31);
        assert!(!high.is_low_time());
    }

    proptest! {
        #[test]
        fn prop_set_then_start(m in 0u32..60, s in 0u32..60) {
            prop_assume!(m + s > 0);
            let mut state = TimerState::new();
            prop_assert!(state.set(m, s));
            prop_assert!(state.start());
            prop_assert_eq!(state.phase(), TimerPhase::Running);
            prop_assert_eq!(state.remaining(), m * 60 + s);
        }

        #[test]
        fn prop_tick_decrements(t in 1u32..3600) {
            let mut state = running(t);
            match state.tick() {
                TickOutcome::Decremented(left) => {
                    prop_assert_eq!(left, t - 1);
                    prop_assert_eq!(state.phase(), TimerPhase::Running);
                }
                TickOutcome::Expired => {
                    prop_assert_eq!(t, 1);
                    prop_assert_eq!(state, TimerState::new());
                }
                TickOutcome::Ignored => prop_assert!(false, "tick ignored while running"),
            }
        }

        #[test]
        fn prop_pause_resume_roundtrip(t in 1u32..3600) {
            let before = running(t);
            let mut state = before;
            prop_assert!(state.pause());
            prop_assert!(state.resume());
            prop_assert_eq!(state, before);
        }

        #[test]
        fn prop_snapshot_apply_identity(t in 0u32..3600, phase in 0u8..3) {
            let mut state = TimerState::new();
            state.remaining = t;
            state.phase = match phase {
                1 if t > 0 => TimerPhase::Running,
                2 if t > 0 => TimerPhase::Paused,
                _ => TimerPhase::Idle,
            };
            let mut other = TimerState::new();
            other.apply(&state.snapshot());
            prop_assert_eq!(other, state);
        }
    }
}
