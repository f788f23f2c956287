//! Debounce / press / click state machine for physical buttons.
//!
//! Pure timing logic with no clock access and no suspension points: callers
//! feed timestamped level samples into [`ButtonEngine`] and wake it once the
//! deadline it reports has elapsed. This crate is `no_std` by default; it
//! only uses `core`, `heapless` and `embassy-time` types.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod engine;
pub mod timing;

pub use engine::{ButtonEngine, Event, EventKind, Events};
pub use timing::Timing;
