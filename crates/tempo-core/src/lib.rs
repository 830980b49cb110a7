//! TEMPO Core - Fundamental types for the shared meeting countdown
//!
//! This crate defines the pieces every other TEMPO crate builds on:
//! - Identifiers (ParticipantId, MeetingId)
//! - The countdown state machine
//! - Partial state snapshots exchanged between participants
//! - Roles, permission policy, and control resolution
//! - Control-surface input parsing
//!
//! Everything here is synchronous and I/O-free.

pub mod control;
pub mod error;
pub mod id;
pub mod input;
pub mod snapshot;
pub mod timer;

pub use control::*;
pub use error::*;
pub use id::*;
pub use input::*;
pub use snapshot::*;
pub use timer::*;
