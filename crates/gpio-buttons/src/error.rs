//! Error taxonomy: fatal configuration and bootstrap failures.
//!
//! Per-pin setup and listener failures are deliberately absent here — they
//! are recovered locally and surface only as [`ManagerEvent::Error`]
//! messages, so one faulty wire never takes down the other buttons.
//!
//! [`ManagerEvent::Error`]: crate::events::ManagerEvent::Error

use core::fmt;

use crate::hal::PinId;

/// Which timing field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingField {
    /// The debounce window.
    Debounce,
    /// The press (hold) threshold.
    Pressed,
    /// The click window.
    Clicked,
}

impl fmt::Display for TimingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debounce => write!(f, "debounce"),
            Self::Pressed => write!(f, "pressed"),
            Self::Clicked => write!(f, "clicked"),
        }
    }
}

/// Invalid configuration, raised synchronously at resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A pin id appears more than once in the configured set.
    DuplicatePin(PinId),
    /// A timing duration is zero.
    ZeroDuration(TimingField),
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePin(pin) => write!(f, "button pin {pin} configured more than once"),
            Self::ZeroDuration(field) => write!(f, "{field} duration must be non-zero"),
        }
    }
}

/// Fatal `init` failure.
///
/// Per-pin failures never produce an `InitError`; they are published as
/// error events and the affected pin is simply absent from the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    /// The hardware adapter itself failed to bootstrap; no pin can
    /// function without it.
    Hardware(E),
    /// `init` was already called on this manager.
    AlreadyInitialized,
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for InitError<E> {}

impl<E: fmt::Display> fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware(err) => write!(f, "hardware adapter bootstrap failed: {err}"),
            Self::AlreadyInitialized => write!(f, "button manager already initialized"),
        }
    }
}

/// All subscriber slots on the event bus are in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubscribeError;

#[cfg(feature = "std")]
impl std::error::Error for SubscribeError {}

impl fmt::Display for SubscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event bus subscriber limit reached")
    }
}
