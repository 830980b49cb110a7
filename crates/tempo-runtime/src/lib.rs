//! TEMPO Runtime - the per-participant countdown node
//!
//! A [`TimerNode`] wires the pieces together on top of tokio:
//! control resolution gates the control surface, every applied transition
//! and every tick is broadcast to the roster while this node holds
//! control, and inbound snapshots are applied unconditionally. The
//! one-second schedule is armed exactly while the countdown is running
//! and cancelled on any way out of running.

pub mod config;
pub mod node;

pub use config::*;
pub use node::*;
