//! Button input lifecycle for single-board computers.
//!
//! Turns raw electrical level changes on GPIO pins into semantic button
//! events — changed, pressed, released, clicked — while tolerating per-pin
//! hardware failures: a system with ten buttons and one faulty wire keeps
//! working for the other nine.
//!
//! # Architecture Layers
//!
//! ```text
//! ButtonManager (orchestration, fault isolation)
//!         ↓                    ↘
//! PinController (per-pin glue)   EventBus (pub/sub, pin-tagged events)
//!         ↓
//! ButtonEngine (pure debounce/press/click state machine)
//!         ↓
//! HardwareAdapter / ButtonInput (board GPIO — external collaborator)
//! ```
//!
//! # Features
//!
//! - `std`: compiles the [`mocks`] module for host testing
//! - `defmt`: defmt logging for hardware builds
//!
//! # Example
//!
//! ```no_run
//! use gpio_buttons::{
//!     ButtonManager, ButtonsConfig, EventBus, HardwareAdapter, PinSetting,
//! };
//!
//! async fn example<A: HardwareAdapter>(adapter: &A) {
//!     let mut config = ButtonsConfig::default();
//!     let _ = config.pins.push(PinSetting::Pin(4));
//!
//!     let bus = EventBus::new();
//!     let Ok(mut events) = bus.subscribe() else { return };
//!     let Ok(mut manager) = ButtonManager::new(&config, adapter, &bus) else { return };
//!     if manager.init().await.is_err() {
//!         return;
//!     }
//!     // Drive the pins and consume events concurrently; drop the run
//!     // future to stop, then call `manager.destroy().await`.
//!     embassy_futures::join::join(manager.run(), async {
//!         loop {
//!             let _event = events.next().await;
//!         }
//!     })
//!     .await;
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
mod controller;
pub mod error;
pub mod events;
pub mod hal;
pub mod manager;
pub mod mocks;

// Re-export the engine types callers see in events and configuration.
pub use button_engine::{EventKind, Timing};

pub use config::{ButtonsConfig, PinSetting, PinSpec, MAX_PINS};
pub use error::{ConfigError, InitError, SubscribeError, TimingField};
pub use events::{ButtonEvent, EventBus, EventFilter, EventStream, ManagerEvent, Message};
pub use hal::{ButtonInput, HardwareAdapter, Level, PinId, PullMode};
pub use manager::ButtonManager;
