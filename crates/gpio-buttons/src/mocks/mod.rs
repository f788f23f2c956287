//! Mock hardware for testing.
//!
//! Provides a [`MockAdapter`] implementing the hardware seam so the whole
//! button stack can run on a host: levels are test-settable per pin and
//! delivered through a signal, with knobs for bootstrap and per-pin
//! failures.

#![cfg(any(test, feature = "std"))]
// Test support code: a poisoned lock is a test bug, not a recoverable state.
#![allow(clippy::unwrap_used)]

use core::fmt;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::hal::{ButtonInput, HardwareAdapter, Level, PinId, PullMode};

/// Simulated hardware failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockHardwareError {
    /// The adapter was built with [`MockAdapter::with_bootstrap_failure`].
    Bootstrap,
    /// The pin was marked failing with [`MockAdapter::with_failing_pin`].
    PinUnavailable(PinId),
}

impl fmt::Display for MockHardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => write!(f, "gpio subsystem unavailable"),
            Self::PinUnavailable(pin) => write!(f, "pin {pin} unavailable"),
        }
    }
}

/// One simulated input line.
struct MockLine {
    level: Mutex<Level>,
    changed: Signal<CriticalSectionRawMutex, Level>,
}

impl MockLine {
    fn new(level: Level) -> Self {
        Self {
            level: Mutex::new(level),
            changed: Signal::new(),
        }
    }
}

/// Mock hardware adapter.
///
/// Lines spring into existence on first touch, idle-high to match pull-up
/// wiring, so tests can set a pin's starting level before `init` pre-reads
/// it.
pub struct MockAdapter {
    lines: Mutex<BTreeMap<u8, Arc<MockLine>>>,
    failing_pins: Vec<u8>,
    fail_bootstrap: bool,
    configured: Mutex<Vec<(PinId, PullMode)>>,
}

impl MockAdapter {
    /// Create a healthy adapter with no lines yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BTreeMap::new()),
            failing_pins: Vec::new(),
            fail_bootstrap: false,
            configured: Mutex::new(Vec::new()),
        }
    }

    /// Make `bootstrap` fail.
    #[must_use]
    pub fn with_bootstrap_failure(mut self) -> Self {
        self.fail_bootstrap = true;
        self
    }

    /// Make `configure_pin` fail for `pin`.
    #[must_use]
    pub fn with_failing_pin(mut self, pin: u8) -> Self {
        self.failing_pins.push(pin);
        self
    }

    fn line(&self, pin: u8) -> Arc<MockLine> {
        Arc::clone(
            self.lines
                .lock()
                .unwrap()
                .entry(pin)
                .or_insert_with(|| Arc::new(MockLine::new(Level::High))),
        )
    }

    /// Drive the electrical level of `pin`, waking any waiting controller.
    pub fn set_level(&self, pin: u8, level: Level) {
        let line = self.line(pin);
        *line.level.lock().unwrap() = level;
        line.changed.signal(level);
    }

    /// Pin configurations requested via `configure_pin`, in call order.
    #[must_use]
    pub fn configured(&self) -> Vec<(PinId, PullMode)> {
        self.configured.lock().unwrap().clone()
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareAdapter for MockAdapter {
    type Input = MockInput;
    type Error = MockHardwareError;

    async fn bootstrap(&self) -> Result<(), Self::Error> {
        if self.fail_bootstrap {
            return Err(MockHardwareError::Bootstrap);
        }
        Ok(())
    }

    async fn configure_pin(&self, pin: PinId, pull: PullMode) -> Result<MockInput, Self::Error> {
        if self.failing_pins.contains(&pin.0) {
            return Err(MockHardwareError::PinUnavailable(pin));
        }
        self.configured.lock().unwrap().push((pin, pull));
        Ok(MockInput {
            line: self.line(pin.0),
        })
    }
}

/// Input line handle handed out by [`MockAdapter`].
pub struct MockInput {
    line: Arc<MockLine>,
}

impl ButtonInput for MockInput {
    type Error = core::convert::Infallible;

    fn level(&mut self) -> Result<Level, Self::Error> {
        Ok(*self.line.level.lock().unwrap())
    }

    async fn wait_for_change(&mut self) -> Result<Level, Self::Error> {
        // The signal latches, so a change fired while the controller was
        // busy is still observed by the next call (cancel safety).
        Ok(self.line.changed.wait().await)
    }
}
