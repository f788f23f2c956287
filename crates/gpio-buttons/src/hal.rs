//! Hardware seam: the capability this system needs from a board's GPIO.
//!
//! Everything electrical lives behind these two traits. The manager only
//! ever asks an adapter to bootstrap itself, configure a pin as a biased
//! digital input, read its level, and wait for the level to change.

use core::fmt;

/// Identity of a physical input pin (board-specific numbering scheme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Electrical bias of an input pin, determining its idle level.
///
/// Owned by this configuration layer; adapters map it to their own
/// representation internally, so the public API never depends on a
/// specific adapter's constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PullMode {
    /// Floating input (external biasing expected).
    None,
    /// Pulled low; a pressed button drives the line high.
    Down,
    /// Pulled high; a pressed button drives the line low.
    Up,
}

/// Electrical level of a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0.
    Low,
    /// Logic 1.
    High,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<Level> for bool {
    fn from(value: Level) -> Self {
        matches!(value, Level::High)
    }
}

/// One acquired button input line.
pub trait ButtonInput {
    /// Error type for input operations.
    type Error: fmt::Debug + fmt::Display;

    /// Read the current level (used once per pin to seed the state machine).
    fn level(&mut self) -> Result<Level, Self::Error>;

    /// Wait for the next level change and return the new level.
    ///
    /// Must be cancel safe: the controller races this future against its
    /// timer and drops the loser, so a change that fires while the future
    /// is not being polled must still be observed by the next call.
    fn wait_for_change(
        &mut self,
    ) -> impl core::future::Future<Output = Result<Level, Self::Error>>;
}

/// A board's GPIO capability.
///
/// Methods take `&self` so that pin registration can run concurrently
/// during init; implementations guard their own registration state.
pub trait HardwareAdapter {
    /// The input line handle this adapter hands out.
    type Input: ButtonInput;
    /// Error type for bootstrap and pin configuration.
    type Error: fmt::Debug + fmt::Display;

    /// One-time asynchronous bring-up of the GPIO subsystem.
    fn bootstrap(&self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Configure `pin` as a digital input with the given bias.
    fn configure_pin(
        &self,
        pin: PinId,
        pull: PullMode,
    ) -> impl core::future::Future<Output = Result<Self::Input, Self::Error>>;
}
