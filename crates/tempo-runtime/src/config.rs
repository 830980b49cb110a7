//! Node configuration

use std::time::Duration;

/// Runtime knobs for a [`crate::TimerNode`].
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Cadence of the countdown schedule.
    pub tick_interval: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            tick_interval: Duration::from_secs(1),
        }
    }
}
