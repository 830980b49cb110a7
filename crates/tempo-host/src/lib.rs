//! TEMPO Host - the host-platform capability boundary
//!
//! The countdown core never talks to a conferencing SDK directly. It is
//! handed a [`HostPlatform`]: something that can fetch the meeting context,
//! deliver a snapshot to one participant, and hand out a subscription to
//! inbound snapshots. Two implementations ship here:
//!
//! - [`LoopbackHub`] wires any number of in-process participants together,
//!   for tests and demos.
//! - [`DetachedHost`] is the degraded mode when no platform is detected:
//!   context fetch fails, sends vanish, nothing ever arrives.

pub mod detached;
pub mod loopback;
pub mod platform;

pub use detached::*;
pub use loopback::*;
pub use platform::*;
